use foundation::color::Color;
use foundation::math::Vec3;
use scene::SceneHost;
use scene::components::{LightKind, Node, NodeKind, Transform};
use scene::entity::EntityId;

use crate::layer::{Layer, LayerId};

pub const FLOOR_RADIUS: f64 = 500.0;
pub const FLOOR_COLOR: Color = Color::from_hex(0xbedaff);

/// Key and fill lights, ambient light and the floor disc.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LightingLayer {
    id: LayerId,
}

impl LightingLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    pub fn build_nodes(&self) -> [Node; 4] {
        [
            directional("key-light", 8.0, Vec3::new(15.0, 30.0, 30.0)),
            directional("fill-light", 2.0, Vec3::new(-15.0, 30.0, -30.0)),
            Node::new(
                "ambient-light",
                NodeKind::Light {
                    kind: LightKind::Ambient,
                    intensity: 2.0,
                },
            )
            .with_color(Color::WHITE),
            // Disc geometry faces +z; lay it flat.
            Node::new(
                "floor",
                NodeKind::Disc {
                    radius: FLOOR_RADIUS,
                },
            )
            .with_transform(
                Transform::identity()
                    .with_rotation(Vec3::new(-std::f64::consts::FRAC_PI_2, 0.0, 0.0)),
            )
            .with_color(FLOOR_COLOR),
        ]
    }
}

fn directional(name: &str, intensity: f64, position: Vec3) -> Node {
    Node::new(
        name,
        NodeKind::Light {
            kind: LightKind::Directional,
            intensity,
        },
    )
    .with_transform(Transform::translate(position))
    .with_color(Color::WHITE)
}

impl Layer for LightingLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn populate(&self, host: &mut dyn SceneHost) -> Vec<EntityId> {
        self.build_nodes()
            .into_iter()
            .map(|node| host.add_node(node))
            .collect()
    }
}
