//! Cannonball
//!
//! A ball launched from a cannon falls under constant gravity and is
//! relaunched whenever it leaves the bounding box. Sliders change the cannon,
//! the light and a set of static decorative boxes while the ball is in flight.
//!
//! - [`physics`]: per-frame ball update and bounds reset
//! - [`controls`]: slider state read by the update once per frame
//! - [`config`]: scene defaults and JSON config loading
//! - [`scene`]: camera and light placement
//! - [`renderer`]: wgpu pipelines for spheres, boxes, trail and grid
//! - [`controls_ui`]: egui slider panel editing [`Controls`]
//! - [`equations_ui`]: egui sidebar listing the update rules
//! - [`overlay`]: egui input, UI pass and painting over the scene

pub mod physics;
pub mod controls;
pub mod config;
pub mod scene;
pub mod renderer;
pub mod controls_ui;
pub mod equations_ui;
pub mod overlay;

pub use config::{ConfigError, SceneConfig};
pub use controls::Controls;
pub use physics::{Ball, Bounds, Cannon, Motion, Simulation, GRAVITY};
pub use scene::Scene;
