use formats::{CameraPose, PatrolAssignment};
use foundation::math::Vec3;
use runtime::{EventBus, Frame};
use scene::SceneHost;
use scene::components::Transform;
use tracing::{debug, info, warn};

use crate::camera::ChaseCamera;
use crate::error::PatrolError;
use crate::events::PatrolEvent;
use crate::path::PatrolPath;

/// Distance covered per tick at speed factor 1, in world units.
pub const BASE_STEP: f64 = 0.1;

/// Distance under which the agent counts as standing on its target.
pub const ARRIVAL_EPSILON: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatrolState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatrolOptions {
    /// Multiplier on [`BASE_STEP`].
    pub speed_factor: f64,
    /// Euler offset (radians) added to the computed heading.
    pub heading_offset: Vec3,
    pub first_person: bool,
    /// Camera pose restored when first-person follow is switched off.
    pub follow_restore: CameraPose,
}

impl Default for PatrolOptions {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            heading_offset: Vec3::new(0.0, std::f64::consts::PI, 0.0),
            first_person: false,
            follow_restore: CameraPose::default(),
        }
    }
}

impl PatrolOptions {
    pub fn from_assignment(assignment: &PatrolAssignment, follow_restore: CameraPose) -> Self {
        Self {
            speed_factor: assignment.speed_factor,
            heading_offset: Vec3::new(0.0, assignment.heading_offset_deg.to_radians(), 0.0),
            first_person: assignment.first_person,
            follow_restore,
        }
    }
}

/// What a single [`PatrolController::tick`] did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TickOutcome {
    /// Stopped; nothing happened.
    Idle,
    /// Moved toward the target without reaching it.
    Moved(Vec3),
    /// Reached an intermediate waypoint and retargeted the next one.
    Reached(usize),
    /// Reached the last waypoint.
    Completed,
    /// The path is already walked; waiting for [`PatrolController::reset`].
    Finished,
}

/// Moves one named agent along a path, one step per tick.
///
/// The controller does not own the agent node. Each tick it looks the agent
/// up by name, moves it at most one step toward the current target waypoint,
/// turns it to face the direction of travel and writes the transform back.
/// A missing agent skips the tick.
#[derive(Debug)]
pub struct PatrolController {
    agent: String,
    path: PatrolPath,
    target: usize,
    state: PatrolState,
    step: f64,
    heading_offset: Vec3,
    chase: ChaseCamera,
    agent_missing: bool,
}

impl PatrolController {
    /// Builds a stopped controller; call [`Self::run`] to start it.
    pub fn new(
        agent: impl Into<String>,
        waypoints: Vec<Vec3>,
        options: PatrolOptions,
    ) -> Result<Self, PatrolError> {
        let path = PatrolPath::new(waypoints)?;
        let agent = agent.into();
        let speed_factor = if options.speed_factor.is_finite() && options.speed_factor > 0.0 {
            options.speed_factor
        } else {
            warn!(%agent, factor = options.speed_factor, "bad speed factor, using 1");
            1.0
        };
        Ok(Self {
            agent,
            path,
            target: 0,
            state: PatrolState::Stopped,
            step: BASE_STEP * speed_factor,
            heading_offset: options.heading_offset,
            chase: ChaseCamera::new(options.first_person, options.follow_restore),
            agent_missing: false,
        })
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn path(&self) -> &PatrolPath {
        &self.path
    }

    pub fn state(&self) -> PatrolState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PatrolState::Running
    }

    /// Index of the waypoint the agent is walking toward.
    pub fn target_index(&self) -> usize {
        self.target
    }

    /// The last waypoint has been reached and no reset happened since.
    pub fn is_finished(&self) -> bool {
        self.target >= self.path.len()
    }

    pub fn step_length(&self) -> f64 {
        self.step
    }

    pub fn is_first_person(&self) -> bool {
        self.chase.is_enabled()
    }

    pub fn run(&mut self) {
        if self.state != PatrolState::Running {
            self.state = PatrolState::Running;
            debug!(agent = %self.agent, target = self.target, "patrol running");
        }
    }

    /// Halts in place.
    pub fn stop(&mut self) {
        if self.state != PatrolState::Stopped {
            self.state = PatrolState::Stopped;
            debug!(agent = %self.agent, "patrol stopped");
        }
    }

    /// Retargets the first waypoint. State and position are untouched, so a
    /// running agent walks back from wherever it is.
    pub fn reset(&mut self) {
        self.target = 0;
    }

    /// Toggles the chase camera; see [`ChaseCamera::switch`].
    pub fn switch(&mut self, first_person: bool, host: &mut dyn SceneHost) -> bool {
        self.chase.switch(first_person, host)
    }

    pub fn tick(
        &mut self,
        host: &mut dyn SceneHost,
        frame: Frame,
        events: &mut EventBus<PatrolEvent>,
    ) -> Result<TickOutcome, PatrolError> {
        if self.state == PatrolState::Stopped {
            return Ok(TickOutcome::Idle);
        }
        let Some(target) = self.path.get(self.target) else {
            return Ok(TickOutcome::Finished);
        };

        let Some(entity) = host.lookup(&self.agent) else {
            if !self.agent_missing {
                warn!(agent = %self.agent, "patrol agent not in scene, skipping ticks");
                self.agent_missing = true;
            }
            return Err(PatrolError::MissingAgent(self.agent.clone()));
        };
        if self.agent_missing {
            info!(agent = %self.agent, "patrol agent found again");
            self.agent_missing = false;
        }

        let mut transform = host.transform(entity).unwrap_or_else(Transform::identity);
        let current = transform.position;
        let delta = target - current;
        let remaining = delta.length();
        let next = match delta.normalized() {
            Some(dir) if remaining > self.step => current + dir * self.step,
            _ => target,
        };

        if let Some(dir) = delta.horizontal().normalized() {
            let yaw = dir.x.atan2(dir.z) + self.heading_offset.y;
            transform.rotation = Vec3::new(self.heading_offset.x, yaw, self.heading_offset.z);
        }
        transform.position = next;
        host.set_transform(entity, transform);
        self.chase.follow(host, next, delta);

        if next.distance(target) > ARRIVAL_EPSILON {
            events.emit(
                frame,
                PatrolEvent::Moved {
                    agent: self.agent.clone(),
                    position: next,
                },
            );
            return Ok(TickOutcome::Moved(next));
        }

        let reached = self.target;
        self.target += 1;
        if self.target < self.path.len() {
            return Ok(TickOutcome::Reached(reached));
        }

        self.state = PatrolState::Stopped;
        debug!(agent = %self.agent, frame = frame.index, "patrol lap complete");
        events.emit(
            frame,
            PatrolEvent::Completed {
                agent: self.agent.clone(),
            },
        );
        Ok(TickOutcome::Completed)
    }
}
