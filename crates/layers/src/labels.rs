use formats::LabelConfig;
use scene::SceneHost;
use scene::components::{Node, NodeKind, Transform};
use scene::entity::EntityId;
use tracing::debug;

use crate::layer::{Layer, LayerId};

/// Text anchors from the config's label list.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsLayer {
    id: LayerId,
    labels: Vec<LabelConfig>,
}

impl LabelsLayer {
    pub fn new(id: u64, labels: Vec<LabelConfig>) -> Self {
        Self {
            id: LayerId(id),
            labels,
        }
    }

    pub fn build_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.labels.iter().filter_map(|label| {
            let text = label.text.trim();
            if text.is_empty() {
                debug!(name = %label.name, "empty label skipped");
                return None;
            }
            Some(
                Node::new(
                    label.name.clone(),
                    NodeKind::Label {
                        text: text.to_string(),
                    },
                )
                .with_transform(
                    Transform::translate(label.position).with_uniform_scale(label.scale),
                )
                .with_color(label.color),
            )
        })
    }
}

impl Layer for LabelsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn populate(&self, host: &mut dyn SceneHost) -> Vec<EntityId> {
        self.build_nodes().map(|node| host.add_node(node)).collect()
    }
}
