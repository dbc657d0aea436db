use foundation::color::Color;
use foundation::math::Vec3;

use crate::components::Transform;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    Gltf,
    Fbx,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LightKind {
    Directional,
    Ambient,
}

/// What a node is. Geometry is carried only as far as the scene needs it for
/// queries; drawing is the host renderer's business.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Model { format: ModelFormat, url: String },
    Label { text: String },
    /// Flat polygon on the ground with its triangulation (indices into
    /// `outline`).
    Area { outline: Vec<Vec3>, triangles: Vec<[usize; 3]> },
    Line { vertices: Vec<Vec3> },
    Light { kind: LightKind, intensity: f64 },
    Disc { radius: f64 },
}

/// A node ready to be inserted into a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    pub color: Option<Color>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::identity(),
            visible: true,
            color: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
