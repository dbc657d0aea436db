//! Patrol and geofence motion control for the twin scene.
//!
//! [`PatrolController`] walks one agent along a [`PatrolPath`] and publishes
//! [`PatrolEvent`]s. [`GeofenceMonitor`] turns the watched agent's positions
//! into edge-triggered [`Transition`]s. [`TwinSession`] owns all of it and
//! applies the side effects: clips, fence color, notifications, dwell timers
//! and the camera.

pub mod camera;
pub mod camera_monitor;
pub mod controller;
pub mod error;
pub mod events;
pub mod geofence;
pub mod path;
pub mod session;

pub use camera::*;
pub use camera_monitor::*;
pub use controller::*;
pub use error::*;
pub use events::*;
pub use geofence::*;
pub use path::*;
pub use session::*;
