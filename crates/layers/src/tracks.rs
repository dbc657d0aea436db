use formats::PatrolPathConfig;
use foundation::math::Vec3;
use scene::SceneHost;
use scene::components::{Node, NodeKind};
use scene::entity::EntityId;

use crate::layer::{Layer, LayerId};
use crate::symbology::{LayerStyle, TRACK_STYLE};

pub fn track_node_name(path: &str) -> String {
    format!("track:{path}")
}

/// One line per patrol path, hidden until switched on.
#[derive(Debug, Clone, PartialEq)]
pub struct TracksLayer {
    id: LayerId,
    paths: Vec<PatrolPathConfig>,
    style: LayerStyle,
}

impl TracksLayer {
    pub fn new(id: u64, paths: Vec<PatrolPathConfig>) -> Self {
        Self {
            id: LayerId(id),
            paths,
            style: TRACK_STYLE,
        }
    }

    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }

    fn build_node(&self, path: &PatrolPathConfig) -> Node {
        let vertices = path
            .points
            .iter()
            .map(|p| Vec3::new(p.x, p.y.max(self.style.lift), p.z))
            .collect();
        let node = Node::new(track_node_name(&path.name), NodeKind::Line { vertices })
            .with_color(self.style.color);
        if self.style.visible { node } else { node.hidden() }
    }
}

impl Layer for TracksLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn populate(&self, host: &mut dyn SceneHost) -> Vec<EntityId> {
        self.paths
            .iter()
            .map(|path| host.add_node(self.build_node(path)))
            .collect()
    }
}
