//! In-place edits of a loaded [`SceneConfig`].
//!
//! Setters clamp rather than reject: intensity and opacity are fractions and
//! anything outside `[0, 1]` is pulled back into range.

use foundation::color::Color;
use foundation::math::Vec3;
use tracing::debug;

use crate::config_file::ConfigError;
use crate::scene_config::{
    AnimationConfig, BlendMode, CameraMonitorConfig, ModelDescriptor, ModelListKind, PatrolPathConfig,
    Placement, SceneConfig, SkyboxFilterConfig, SkyboxFilterPatch,
};

/// Partial update of a model entry; `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelPatch {
    pub url: Option<String>,
    pub placement: Option<Placement>,
    pub animation: Option<AnimationConfig>,
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl SkyboxFilterConfig {
    pub fn apply(&mut self, patch: &SkyboxFilterPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(intensity) = patch.intensity {
            self.intensity = unit(intensity);
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = unit(opacity);
        }
        if let Some(mode) = patch.blend_mode {
            self.blend_mode = mode;
        }
    }
}

impl SceneConfig {
    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    pub fn set_camera_look_at(&mut self, look_at: Vec3) {
        self.camera.look_at = look_at;
    }

    pub fn set_camera_monitor(&mut self, monitor: CameraMonitorConfig) {
        debug!(?monitor, "camera monitor config updated");
        self.camera.monitor = monitor;
    }

    pub fn set_skybox_filter_enabled(&mut self, enabled: bool) {
        self.skybox_filter.enabled = enabled;
    }

    pub fn set_skybox_filter_color(&mut self, color: Color) {
        self.skybox_filter.color = color;
    }

    pub fn set_skybox_filter_intensity(&mut self, intensity: f64) {
        self.skybox_filter.intensity = unit(intensity);
    }

    pub fn set_skybox_filter_opacity(&mut self, opacity: f64) {
        self.skybox_filter.opacity = unit(opacity);
    }

    pub fn set_skybox_filter_blend_mode(&mut self, mode: BlendMode) {
        self.skybox_filter.blend_mode = mode;
    }

    pub fn update_skybox_filter(&mut self, patch: &SkyboxFilterPatch) {
        self.skybox_filter.apply(patch);
        debug!(filter = ?self.skybox_filter, "skybox filter updated");
    }

    pub fn models(&self, kind: ModelListKind) -> &[ModelDescriptor] {
        match kind {
            ModelListKind::Simple => &self.models.simple,
            ModelListKind::Detailed => &self.models.detailed,
            ModelListKind::Patrol => &self.models.patrol,
        }
    }

    fn models_mut(&mut self, kind: ModelListKind) -> &mut Vec<ModelDescriptor> {
        match kind {
            ModelListKind::Simple => &mut self.models.simple,
            ModelListKind::Detailed => &mut self.models.detailed,
            ModelListKind::Patrol => &mut self.models.patrol,
        }
    }

    pub fn model(&self, kind: ModelListKind, name: &str) -> Option<&ModelDescriptor> {
        self.models(kind).iter().find(|m| m.name() == name)
    }

    /// Searches every list, simple first.
    pub fn find_model(&self, name: &str) -> Option<&ModelDescriptor> {
        ModelListKind::ALL
            .iter()
            .find_map(|&kind| self.model(kind, name))
    }

    pub fn add_model(&mut self, kind: ModelListKind, model: ModelDescriptor) {
        debug!(?kind, name = model.name(), "model added");
        self.models_mut(kind).push(model);
    }

    pub fn update_model(
        &mut self,
        kind: ModelListKind,
        name: &str,
        patch: ModelPatch,
    ) -> Result<(), ConfigError> {
        let model = self
            .models_mut(kind)
            .iter_mut()
            .find(|m| m.name() == name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))?;
        let spec = model.spec_mut();
        if let Some(url) = patch.url {
            spec.url = url;
        }
        if let Some(placement) = patch.placement {
            spec.placement = placement;
        }
        if let Some(animation) = patch.animation {
            spec.animation = Some(animation);
        }
        debug!(?kind, name, "model updated");
        Ok(())
    }

    pub fn remove_model(
        &mut self,
        kind: ModelListKind,
        name: &str,
    ) -> Result<ModelDescriptor, ConfigError> {
        let list = self.models_mut(kind);
        let idx = list
            .iter()
            .position(|m| m.name() == name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))?;
        debug!(?kind, name, "model removed");
        Ok(list.remove(idx))
    }

    pub fn set_fence_visible(&mut self, visible: bool) {
        self.fence.visible = visible;
    }

    pub fn set_fence_color(&mut self, color: Color) {
        self.fence.color = color;
    }

    pub fn set_fence_points(&mut self, points: Vec<Vec3>) {
        debug!(count = points.len(), "fence points replaced");
        self.fence.points = points;
    }

    pub fn patrol_path(&self, name: &str) -> Option<&PatrolPathConfig> {
        self.patrol_paths.iter().find(|p| p.name == name)
    }
}
