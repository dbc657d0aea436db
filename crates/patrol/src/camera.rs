use formats::CameraPose;
use foundation::math::Vec3;
use scene::SceneHost;
use tracing::debug;

/// How far behind the agent the chase camera sits.
pub const CHASE_DISTANCE: f64 = 10.0;
/// How far above the agent the chase camera sits.
pub const CHASE_HEIGHT: f64 = 5.0;

/// Default duration of [`CameraTween`]s started without one.
pub const DEFAULT_TWEEN_MS: u64 = 3000;

/// First-person follow: keeps the camera behind and above a moving agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaseCamera {
    enabled: bool,
    restore: CameraPose,
    /// Last horizontal travel direction seen; reused while the agent turns
    /// in place.
    heading: Option<Vec3>,
}

impl ChaseCamera {
    pub fn new(enabled: bool, restore: CameraPose) -> Self {
        Self {
            enabled,
            restore,
            heading: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns follow on or off. Switching off puts the camera back at the
    /// restore pose. Returns whether anything changed.
    pub fn switch(&mut self, enabled: bool, host: &mut dyn SceneHost) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if !enabled {
            host.set_camera_position(self.restore.position);
            host.set_camera_look_at(self.restore.look_at);
        }
        debug!(enabled, "chase camera switched");
        true
    }

    /// Places the camera for an agent at `agent` that just moved along
    /// `travel`. Does nothing while disabled.
    pub fn follow(&mut self, host: &mut dyn SceneHost, agent: Vec3, travel: Vec3) {
        if let Some(dir) = travel.horizontal().normalized() {
            self.heading = Some(dir);
        }
        if !self.enabled {
            return;
        }
        let back = self.heading.unwrap_or(Vec3::new(0.0, 0.0, 1.0));
        host.set_camera_position(agent - back * CHASE_DISTANCE + Vec3::UP * CHASE_HEIGHT);
        host.set_camera_look_at(agent);
    }
}

/// Linear camera flight to a new position with a fixed look-at target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTween {
    from: Vec3,
    to: Vec3,
    look_at: Vec3,
    start_ms: u64,
    duration_ms: u64,
}

impl CameraTween {
    pub fn new(from: Vec3, to: Vec3, look_at: Vec3, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            look_at,
            start_ms,
            duration_ms,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.to
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Camera position at `now_ms`, and whether the flight is over.
    pub fn sample(&self, now_ms: u64) -> (Vec3, bool) {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        (self.from.lerp(self.to, t), false)
    }

    /// Moves the host camera to the pose at `now_ms`.
    pub fn apply(&self, host: &mut dyn SceneHost, now_ms: u64) -> bool {
        let (position, done) = self.sample(now_ms);
        host.set_camera_position(position);
        host.set_camera_look_at(self.look_at);
        done
    }
}
