//! Systems for the camera engine.
//!
//! Organized by functionality:
//! - command: Command queue processing from the host
//! - input: Wheel, touch and pointer collection
//! - engine: Per-frame engine tick and message forwarding
//! - camera: Camera entity setup and pose application
//! - state_sync: Sync engine state to shared stores

pub mod camera;
pub mod command;
pub mod engine;
pub mod input;
pub mod state_sync;

pub use camera::*;
pub use command::*;
pub use engine::*;
pub use input::*;
pub use state_sync::*;
