//! Scene archetypes: spawn rules, per-entity motion and drawing.

pub mod dataflow;
pub mod geometric;
pub mod particles;
