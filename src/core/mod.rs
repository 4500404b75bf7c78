// GlucosePlotter - core/mod.rs
//
// Core business logic layer: parsing, ordering, chart layout and encoding.
// Must NOT depend on: app or platform, and never opens files itself.

pub mod chart;
pub mod export;
pub mod model;
pub mod parser;
pub mod timeline;
