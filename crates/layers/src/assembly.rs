use std::collections::BTreeMap;

use formats::SceneConfig;
use scene::SceneHost;
use scene::entity::EntityId;
use tracing::info;

use crate::fence::FenceLayer;
use crate::labels::LabelsLayer;
use crate::layer::Layer;
use crate::lighting::LightingLayer;
use crate::models::ModelsLayer;
use crate::tracks::TracksLayer;

/// Handles to what [`assemble_scene`] inserted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneAssembly {
    pub lighting: Vec<EntityId>,
    pub models: Vec<EntityId>,
    pub labels: Vec<EntityId>,
    pub fence: Option<EntityId>,
    /// Track line per patrol path name.
    pub tracks: BTreeMap<String, EntityId>,
}

impl SceneAssembly {
    pub fn node_count(&self) -> usize {
        self.lighting.len()
            + self.models.len()
            + self.labels.len()
            + usize::from(self.fence.is_some())
            + self.tracks.len()
    }
}

/// Builds the whole static scene: lighting and floor, models, labels, the
/// fence and one hidden track line per patrol path.
pub fn assemble_scene(config: &SceneConfig, host: &mut dyn SceneHost) -> SceneAssembly {
    let lighting = LightingLayer::new(0).populate(host);
    let models = ModelsLayer::new(1, config.models.clone()).populate(host);
    let labels = LabelsLayer::new(2, config.labels.clone()).populate(host);
    let fence = FenceLayer::new(3, config.fence.clone())
        .populate(host)
        .into_iter()
        .next();
    let track_ids = TracksLayer::new(4, config.patrol_paths.clone()).populate(host);
    let tracks = config
        .patrol_paths
        .iter()
        .map(|p| p.name.clone())
        .zip(track_ids)
        .collect();

    let assembly = SceneAssembly {
        lighting,
        models,
        labels,
        fence,
        tracks,
    };
    info!(
        nodes = assembly.node_count(),
        fence = assembly.fence.is_some(),
        "scene assembled"
    );
    assembly
}
