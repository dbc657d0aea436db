use serde::{Deserialize, Serialize};

/// How a clip wraps when it reaches its end.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    Once,
    #[default]
    Repeat,
    PingPong,
}

/// Playback state of one named clip on one node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ClipState {
    pub playing: bool,
    pub loop_mode: LoopMode,
}
