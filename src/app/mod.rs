// GlucosePlotter - app/mod.rs
//
// Application layer: pipeline orchestration and output naming.
// Dependencies: core, platform, util.

pub mod output;
pub mod pipeline;
