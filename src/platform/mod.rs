// GlucosePlotter - platform/mod.rs
//
// Platform abstraction layer: filesystem access and config file loading.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
