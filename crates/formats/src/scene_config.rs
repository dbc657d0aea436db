use foundation::color::Color;
use foundation::math::Vec3;
use scene::components::ModelFormat;
use serde::{Deserialize, Serialize};

/// Declarative description of a twin scene.
///
/// `camera`, `models` and `fence` are required; everything else falls back to
/// its default when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    #[serde(default)]
    pub skybox_filter: SkyboxFilterConfig,
    pub models: ModelLists,
    #[serde(default)]
    pub labels: Vec<LabelConfig>,
    pub fence: FenceConfig,
    #[serde(default)]
    pub patrol_paths: Vec<PatrolPathConfig>,
    /// Fixed timestep of the frame clock (seconds).
    #[serde(default = "default_frame_dt_s")]
    pub frame_dt_s: f64,
}

fn default_frame_dt_s() -> f64 {
    1.0 / 60.0
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraPose {
    /// The overview the chase camera falls back to.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 150.0),
            look_at: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// View restored when first-person follow is switched off.
    #[serde(default)]
    pub follow_restore: CameraPose,
    #[serde(default)]
    pub monitor: CameraMonitorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraMonitorConfig {
    pub enabled: bool,
    pub interval_ms: u64,
    pub log_position: bool,
    pub log_look_at: bool,
}

impl Default for CameraMonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 1000,
            log_position: false,
            log_look_at: false,
        }
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Multiply,
    Screen,
    Overlay,
    Normal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyboxFilterConfig {
    pub enabled: bool,
    pub color: Color,
    pub intensity: f64,
    pub opacity: f64,
    pub blend_mode: BlendMode,
}

impl Default for SkyboxFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::from_hex(0x87ceeb),
            intensity: 0.8,
            opacity: 0.6,
            blend_mode: BlendMode::Multiply,
        }
    }
}

/// Partial update of a [`SkyboxFilterConfig`]; `None` fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyboxFilterPatch {
    pub enabled: Option<bool>,
    pub color: Option<Color>,
    pub intensity: Option<f64>,
    pub opacity: Option<f64>,
    pub blend_mode: Option<BlendMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelLists {
    /// Lightweight scene geometry loaded first.
    pub simple: Vec<ModelDescriptor>,
    pub detailed: Vec<ModelDescriptor>,
    /// Agents; entries with a `patrol` assignment get a controller.
    pub patrol: Vec<ModelDescriptor>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModelListKind {
    Simple,
    Detailed,
    Patrol,
}

impl ModelListKind {
    pub const ALL: [ModelListKind; 3] = [Self::Simple, Self::Detailed, Self::Patrol];
}

/// A model to load, tagged by its asset format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ModelDescriptor {
    Gltf(ModelSpec),
    Fbx(ModelSpec),
}

impl ModelDescriptor {
    pub fn spec(&self) -> &ModelSpec {
        match self {
            ModelDescriptor::Gltf(spec) | ModelDescriptor::Fbx(spec) => spec,
        }
    }

    pub fn spec_mut(&mut self) -> &mut ModelSpec {
        match self {
            ModelDescriptor::Gltf(spec) | ModelDescriptor::Fbx(spec) => spec,
        }
    }

    pub fn format(&self) -> ModelFormat {
        match self {
            ModelDescriptor::Gltf(_) => ModelFormat::Gltf,
            ModelDescriptor::Fbx(_) => ModelFormat::Fbx,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec().name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol: Option<PatrolAssignment>,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            url: url.into(),
            placement: Placement::default(),
            animation: None,
            patrol: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Placement {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Clips embedded in the asset.
    pub clips: Vec<String>,
    /// Clip started (looping) as soon as the model is placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<String>,
}

/// Binds an agent model to a patrol path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatrolAssignment {
    pub path: String,
    /// Multiplier on the base step per frame.
    pub speed_factor: f64,
    /// Added to the computed heading to correct the model's rest facing.
    pub heading_offset_deg: f64,
    /// Whether this agent drives fence transitions.
    pub watch_fence: bool,
    pub first_person: bool,
    pub loop_on_complete: bool,
    pub run_clip: String,
    pub idle_clip: String,
}

impl Default for PatrolAssignment {
    fn default() -> Self {
        Self {
            path: String::new(),
            speed_factor: 1.0,
            heading_offset_deg: 180.0,
            watch_fence: false,
            first_person: false,
            loop_on_complete: true,
            run_clip: "Run".to_string(),
            idle_clip: "Idle".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelConfig {
    pub name: String,
    pub text: String,
    #[serde(default = "default_label_color")]
    pub color: Color,
    pub position: Vec3,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_label_color() -> Color {
    Color::from_hex(0x3ac9b0)
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FenceConfig {
    #[serde(default = "default_true")]
    pub visible: bool,
    pub points: Vec<Vec3>,
    #[serde(default = "default_fence_color")]
    pub color: Color,
    /// Color while the watched agent is inside.
    #[serde(default = "default_fence_alert_color")]
    pub alert_color: Color,
    /// Automatic pause on entry (milliseconds).
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
}

impl FenceConfig {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            visible: true,
            points,
            color: default_fence_color(),
            alert_color: default_fence_alert_color(),
            dwell_ms: default_dwell_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fence_color() -> Color {
    Color::rgb(51, 188, 176)
}

fn default_fence_alert_color() -> Color {
    Color::rgb(255, 64, 95)
}

fn default_dwell_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatrolPathConfig {
    pub name: String,
    pub points: Vec<Vec3>,
}
