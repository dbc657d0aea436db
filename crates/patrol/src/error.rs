use formats::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatrolError {
    #[error("patrol path needs at least 2 waypoints, got {0}")]
    InvalidPath(usize),
    #[error("patrol path has a non-finite waypoint at index {0}")]
    NonFiniteWaypoint(usize),
    #[error("agent {0:?} is not in the scene")]
    MissingAgent(String),
    #[error("fence needs at least 3 distinct points")]
    MissingFence,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no patrol agent in this session")]
    NoPatrol,
    #[error("no node named {0:?}")]
    UnknownNode(String),
    #[error(transparent)]
    Patrol(#[from] PatrolError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
