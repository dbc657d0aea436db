use foundation::math::Vec3;

/// Published by a [`crate::PatrolController`] on each tick that does
/// something observable.
#[derive(Debug, Clone, PartialEq)]
pub enum PatrolEvent {
    /// The agent moved and has not reached its target yet.
    Moved { agent: String, position: Vec3 },
    /// The agent reached the last waypoint. The controller is stopped until
    /// it is reset and run again.
    Completed { agent: String },
}

impl PatrolEvent {
    pub fn agent(&self) -> &str {
        match self {
            PatrolEvent::Moved { agent, .. } | PatrolEvent::Completed { agent } => agent,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    Entered,
    Exited,
}

/// What a UI layer can react to after each session update.
#[derive(Debug, Clone, PartialEq)]
pub enum TwinEvent {
    Fence {
        agent: String,
        transition: Transition,
    },
    PatrolToggled {
        agent: String,
        running: bool,
    },
    LapCompleted {
        agent: String,
    },
    FirstPersonChanged {
        enabled: bool,
    },
    TracksVisibilityChanged {
        visible: bool,
    },
    CameraSampled {
        position: Option<Vec3>,
        look_at: Option<Vec3>,
    },
}
