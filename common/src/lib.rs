//! Common utilities for the cannonball simulation
//!
//! This crate provides shared graphics setup, camera controls, and rendering utilities
//! used by the simulation binary.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
