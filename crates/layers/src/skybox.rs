use formats::{BlendMode, SkyboxFilterConfig, SkyboxFilterPatch};
use foundation::color::Color;
use tracing::debug;

/// Values handed to the renderer's skybox overlay material.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FilterUniforms {
    pub color: [f32; 4],
    pub intensity: f32,
    pub opacity: f32,
    pub blend_mode: i32,
}

pub fn blend_mode_index(mode: BlendMode) -> i32 {
    match mode {
        BlendMode::Multiply => 0,
        BlendMode::Screen => 1,
        BlendMode::Overlay => 2,
        BlendMode::Normal => 3,
    }
}

impl FilterUniforms {
    fn from_config(config: &SkyboxFilterConfig) -> Self {
        Self {
            color: config.color.to_f32_array(),
            intensity: config.intensity.clamp(0.0, 1.0) as f32,
            opacity: config.opacity.clamp(0.0, 1.0) as f32,
            blend_mode: blend_mode_index(config.blend_mode),
        }
    }
}

/// Tinted overlay on the sky dome. It never touches scene lighting.
///
/// The overlay exists (has uniforms) only while the filter is enabled;
/// disabling disposes it and re-enabling builds it again from the stored
/// config.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyboxFilter {
    config: SkyboxFilterConfig,
    uniforms: Option<FilterUniforms>,
}

impl SkyboxFilter {
    pub fn new(config: SkyboxFilterConfig) -> Self {
        let mut filter = Self {
            config,
            uniforms: None,
        };
        if filter.config.enabled {
            filter.create();
        }
        filter
    }

    pub fn config(&self) -> &SkyboxFilterConfig {
        &self.config
    }

    pub fn uniforms(&self) -> Option<&FilterUniforms> {
        self.uniforms.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.uniforms.is_some()
    }

    /// Builds the overlay, replacing any existing one.
    pub fn create(&mut self) {
        self.dispose();
        self.uniforms = Some(FilterUniforms::from_config(&self.config));
        debug!(mode = ?self.config.blend_mode, "skybox filter created");
    }

    pub fn dispose(&mut self) {
        if self.uniforms.take().is_some() {
            debug!("skybox filter disposed");
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        self.sync();
    }

    pub fn set_color(&mut self, color: Color) {
        self.config.color = color;
        self.refresh();
    }

    pub fn set_intensity(&mut self, intensity: f64) {
        self.config.intensity = intensity;
        self.refresh();
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.config.opacity = opacity;
        self.refresh();
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.config.blend_mode = mode;
        self.refresh();
    }

    /// Replaces the whole config, creating or disposing the overlay to match.
    pub fn update(&mut self, config: SkyboxFilterConfig) {
        self.config = config;
        self.sync();
    }

    pub fn apply(&mut self, patch: &SkyboxFilterPatch) {
        self.config.apply(patch);
        self.sync();
    }

    fn sync(&mut self) {
        match (self.config.enabled, self.is_active()) {
            (true, false) => self.create(),
            (true, true) => self.refresh(),
            (false, _) => self.dispose(),
        }
    }

    fn refresh(&mut self) {
        if let Some(uniforms) = self.uniforms.as_mut() {
            *uniforms = FilterUniforms::from_config(&self.config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SkyboxFilter, blend_mode_index};
    use formats::{BlendMode, SkyboxFilterConfig, SkyboxFilterPatch};
    use foundation::color::Color;

    #[test]
    fn disabled_filter_has_no_overlay() {
        let filter = SkyboxFilter::new(SkyboxFilterConfig::default());
        assert!(!filter.is_active());
        assert!(filter.uniforms().is_none());
    }

    #[test]
    fn setters_update_live_uniforms() {
        let mut filter = SkyboxFilter::new(SkyboxFilterConfig {
            enabled: true,
            ..SkyboxFilterConfig::default()
        });
        filter.set_intensity(3.0);
        filter.set_blend_mode(BlendMode::Overlay);
        let uniforms = filter.uniforms().expect("active");
        assert_eq!(uniforms.intensity, 1.0);
        assert_eq!(uniforms.blend_mode, 2);
    }

    #[test]
    fn setters_on_inactive_filter_only_store_config() {
        let mut filter = SkyboxFilter::new(SkyboxFilterConfig::default());
        filter.set_color(Color::rgb(255, 0, 0));
        assert!(!filter.is_active());
        filter.set_enabled(true);
        let uniforms = filter.uniforms().expect("created on enable");
        assert_eq!(uniforms.color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn patch_can_disable() {
        let mut filter = SkyboxFilter::new(SkyboxFilterConfig {
            enabled: true,
            ..SkyboxFilterConfig::default()
        });
        filter.apply(&SkyboxFilterPatch {
            enabled: Some(false),
            ..SkyboxFilterPatch::default()
        });
        assert!(!filter.is_active());
        assert!(!filter.config().enabled);
    }

    #[test]
    fn blend_mode_indices() {
        assert_eq!(blend_mode_index(BlendMode::Multiply), 0);
        assert_eq!(blend_mode_index(BlendMode::Normal), 3);
    }
}
