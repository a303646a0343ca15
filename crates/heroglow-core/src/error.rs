use thiserror::Error;

/// Failures the animation subsystem can report.
///
/// Neither variant is fatal: resource failures degrade the scene to flat
/// primitives and invalid configuration mounts a blank scene.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("could not create {what} canvas of {width}x{height}")]
    ResourceCreation {
        what: &'static str,
        width: u32,
        height: u32,
    },
    #[error("invalid scene configuration: {0}")]
    InvalidConfiguration(String),
}
