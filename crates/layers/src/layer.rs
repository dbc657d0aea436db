use scene::SceneHost;
use scene::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// A slice of the scene built from one section of the config.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Inserts this layer's nodes and returns them in insertion order.
    fn populate(&self, host: &mut dyn SceneHost) -> Vec<EntityId>;
}
