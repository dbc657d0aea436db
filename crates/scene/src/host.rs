use std::fmt;

use foundation::color::Color;
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::components::{LoopMode, Node, Transform};
use crate::entity::EntityId;

/// Severity of a user-facing notification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Capabilities the rendering layer lends to the twin.
///
/// Everything the patrol and assembly code does to the outside world goes
/// through this trait: inserting and finding nodes, mutating transforms,
/// visibility and color, triggering animation clips, driving the camera and
/// showing notifications. [`crate::World`] is the in-memory implementation.
pub trait SceneHost {
    fn add_node(&mut self, node: Node) -> EntityId;

    /// First node registered under `name`.
    fn lookup(&self, name: &str) -> Option<EntityId>;

    fn transform(&self, entity: EntityId) -> Option<Transform>;

    fn set_transform(&mut self, entity: EntityId, transform: Transform);

    fn is_visible(&self, entity: EntityId) -> Option<bool>;

    fn set_visibility(&mut self, entity: EntityId, visible: bool);

    fn set_color(&mut self, entity: EntityId, color: Color);

    /// Declares the clips an animated node owns.
    fn register_clips(&mut self, agent: &str, clips: &[String]);

    /// Starts (`play`) or stops a clip. Returns `false` when the agent has no
    /// such clip.
    fn play_clip(&mut self, agent: &str, clip: &str, play: bool, loop_mode: LoopMode) -> bool;

    fn camera(&self) -> Camera;

    fn set_camera_position(&mut self, position: Vec3);

    fn set_camera_look_at(&mut self, target: Vec3);

    fn notify_user(&mut self, message: &str, severity: Severity);
}
