use formats::{ModelDescriptor, ModelListKind, ModelLists};
use scene::SceneHost;
use scene::components::{LoopMode, Node, NodeKind, Transform};
use scene::entity::EntityId;
use tracing::{debug, warn};

use crate::layer::{Layer, LayerId};

/// Every configured model, list by list (simple, detailed, patrol).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelsLayer {
    id: LayerId,
    models: ModelLists,
}

impl ModelsLayer {
    pub fn new(id: u64, models: ModelLists) -> Self {
        Self {
            id: LayerId(id),
            models,
        }
    }

    fn list(&self, kind: ModelListKind) -> &[ModelDescriptor] {
        match kind {
            ModelListKind::Simple => &self.models.simple,
            ModelListKind::Detailed => &self.models.detailed,
            ModelListKind::Patrol => &self.models.patrol,
        }
    }
}

pub fn model_node(model: &ModelDescriptor) -> Node {
    let spec = model.spec();
    let transform = Transform::translate(spec.placement.position)
        .with_rotation(spec.placement.rotation)
        .with_uniform_scale(spec.placement.scale);
    Node::new(
        spec.name.clone(),
        NodeKind::Model {
            format: model.format(),
            url: spec.url.clone(),
        },
    )
    .with_transform(transform)
}

/// Adds the model and starts its autoplay clip, looping.
pub fn place_model(host: &mut dyn SceneHost, model: &ModelDescriptor) -> EntityId {
    let id = host.add_node(model_node(model));
    let name = model.name();
    if let Some(animation) = &model.spec().animation {
        host.register_clips(name, &animation.clips);
        if let Some(clip) = &animation.autoplay
            && !host.play_clip(name, clip, true, LoopMode::Repeat)
        {
            warn!(model = name, clip = %clip, "autoplay clip not found");
        }
    }
    debug!(model = name, format = ?model.format(), "model placed");
    id
}

impl Layer for ModelsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn populate(&self, host: &mut dyn SceneHost) -> Vec<EntityId> {
        let mut out = Vec::new();
        for kind in ModelListKind::ALL {
            for model in self.list(kind) {
                out.push(place_model(host, model));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelsLayer, model_node};
    use crate::layer::Layer;
    use formats::{AnimationConfig, ModelDescriptor, ModelSpec, SceneConfig};
    use foundation::math::Vec3;
    use scene::components::{ModelFormat, NodeKind};
    use scene::{SceneHost, World};

    #[test]
    fn placement_becomes_transform() {
        let config = SceneConfig::default();
        let node = model_node(&config.models.detailed[0]);
        assert_eq!(node.name, "greenhouse");
        assert_eq!(node.transform.scale, Vec3::new(0.01, 0.01, 0.01));
        assert!(matches!(
            node.kind,
            NodeKind::Model {
                format: ModelFormat::Fbx,
                ..
            }
        ));
    }

    #[test]
    fn places_all_lists_and_autoplays() {
        let mut world = World::new();
        let ids = ModelsLayer::new(3, SceneConfig::default().models).populate(&mut world);
        assert_eq!(ids.len(), 4);
        assert_eq!(world.name(ids[0]), Some("office-simple"));
        assert_eq!(world.name(ids[3]), Some("robot-1"));

        let run = world.clip_state("robot-0", "Run").expect("run clip");
        assert!(run.playing);
        assert!(!world.clip_state("robot-0", "Idle").expect("idle clip").playing);
        assert!(world.lookup("robot-1").is_some());
    }

    #[test]
    fn missing_autoplay_clip_is_tolerated() {
        let mut spec = ModelSpec::new("crate", "gltf/crate.glb");
        spec.animation = Some(AnimationConfig {
            clips: vec!["Spin".into()],
            autoplay: Some("Dance".into()),
        });
        let mut lists = formats::ModelLists::default();
        lists.simple.push(ModelDescriptor::Gltf(spec));
        let mut world = World::new();
        let ids = ModelsLayer::new(3, lists).populate(&mut world);
        assert_eq!(ids.len(), 1);
        assert!(!world.clip_state("crate", "Spin").expect("spin").playing);
    }
}
