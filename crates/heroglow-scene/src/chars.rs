//! Glyph ramps used by the terminal renderer.

/// Coverage ramp from faint to solid.
pub const INTENSITY_RAMP: &[char] = &['·', '░', '▒', '▓', '█'];

/// Thresholds matching [`INTENSITY_RAMP`]; below the first one a cell stays blank.
pub const INTENSITY_STEPS: &[f32] = &[0.05, 0.15, 0.35, 0.55, 0.75];

/// Glyphs for lattice lines in the geometric scene.
pub const LATTICE_H: char = '─';
pub const LATTICE_V: char = '│';
pub const LATTICE_CROSS: char = '┼';

/// Pick the ramp glyph for an intensity, or `None` for an empty cell.
pub fn glyph_for(intensity: f32) -> Option<char> {
    INTENSITY_STEPS
        .iter()
        .rposition(|&step| intensity >= step)
        .map(|i| INTENSITY_RAMP[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_ramp() {
        assert_eq!(glyph_for(0.0), None);
        assert_eq!(glyph_for(0.06), Some('·'));
        assert_eq!(glyph_for(0.5), Some('▒'));
        assert_eq!(glyph_for(1.0), Some('█'));
    }
}
