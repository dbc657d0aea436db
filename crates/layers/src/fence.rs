use earcutr::earcut;
use formats::FenceConfig;
use foundation::math::Vec3;
use scene::SceneHost;
use scene::components::{Node, NodeKind};
use scene::entity::EntityId;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layer::{Layer, LayerId};
use crate::symbology::LayerStyle;

pub const FENCE_NODE_NAME: &str = "fence";

/// Fence surface height above the ground plane.
pub const FENCE_LIFT: f64 = 0.1;

#[derive(Debug, Error, PartialEq)]
pub enum FenceError {
    #[error("fence needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),
    #[error("fence outline could not be triangulated")]
    Triangulation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FenceLayer {
    id: LayerId,
    config: FenceConfig,
}

impl FenceLayer {
    pub fn new(id: u64, config: FenceConfig) -> Self {
        Self {
            id: LayerId(id),
            config,
        }
    }

    pub fn style(&self) -> LayerStyle {
        LayerStyle::new(self.config.visible, self.config.color, FENCE_LIFT)
    }

    pub fn build_node(&self) -> Result<Node, FenceError> {
        let style = self.style();
        let outline = lifted_outline(&self.config.points, style.lift);
        let triangles = triangulate_ground(&outline)?;
        let node = Node::new(FENCE_NODE_NAME, NodeKind::Area { outline, triangles })
            .with_color(style.color);
        Ok(if style.visible { node } else { node.hidden() })
    }
}

impl Layer for FenceLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn populate(&self, host: &mut dyn SceneHost) -> Vec<EntityId> {
        match self.build_node() {
            Ok(node) => {
                let id = host.add_node(node);
                debug!(points = self.config.points.len(), "fence placed");
                vec![id]
            }
            Err(err) => {
                warn!(%err, "fence skipped");
                Vec::new()
            }
        }
    }
}

/// Outline without its closing duplicate, moved to height `lift`.
fn lifted_outline(points: &[Vec3], lift: f64) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = points.iter().map(|p| Vec3::new(p.x, lift, p.z)).collect();
    drop_closing_duplicate(&mut out);
    out
}

fn drop_closing_duplicate(points: &mut Vec<Vec3>) {
    let closed = match points.as_slice() {
        [first, .., last] => {
            (first.x - last.x).abs() < 1e-9 && (first.z - last.z).abs() < 1e-9
        }
        _ => false,
    };
    if closed {
        points.pop();
    }
}

/// Triangulates an outline on the `(x, z)` plane.
pub fn triangulate_ground(outline: &[Vec3]) -> Result<Vec<[usize; 3]>, FenceError> {
    if outline.len() < 3 {
        return Err(FenceError::TooFewPoints(outline.len()));
    }

    let mut coords: Vec<f64> = Vec::with_capacity(outline.len() * 2);
    for p in outline {
        coords.push(p.x);
        coords.push(p.z);
    }

    let indices = earcut(&coords, &[], 2).map_err(|_| FenceError::Triangulation)?;
    if indices.is_empty() {
        return Err(FenceError::Triangulation);
    }
    Ok(indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect())
}
