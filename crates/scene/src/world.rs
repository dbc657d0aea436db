use std::collections::{BTreeMap, HashMap};

use foundation::color::Color;
use foundation::handles::Handle;
use foundation::math::Vec3;
use tracing::{debug, info, trace};

use crate::camera::Camera;
use crate::components::{ClipState, LoopMode, Node, NodeKind, Transform, Visibility};
use crate::entity::EntityId;
use crate::host::{SceneHost, Severity};

/// A notification the world has been asked to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Headless scene graph.
///
/// Components are stored in parallel columns indexed by entity; names map to
/// the first entity registered under them.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    names: Vec<String>,
    kinds: Vec<Option<NodeKind>>,
    transforms: Vec<Option<Transform>>,
    visibility: Vec<Option<Visibility>>,
    colors: Vec<Option<Color>>,
    by_name: HashMap<String, EntityId>,
    clips: BTreeMap<String, BTreeMap<String, ClipState>>,
    camera: Camera,
    notifications: Vec<Notification>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.next_index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn name(&self, entity: EntityId) -> Option<&str> {
        self.names.get(entity.index() as usize).map(String::as_str)
    }

    pub fn kind(&self, entity: EntityId) -> Option<&NodeKind> {
        self.kinds.get(entity.index() as usize).and_then(|k| k.as_ref())
    }

    pub fn color(&self, entity: EntityId) -> Option<Color> {
        self.colors.get(entity.index() as usize).and_then(|c| *c)
    }

    pub fn clip_state(&self, agent: &str, clip: &str) -> Option<ClipState> {
        self.clips.get(agent).and_then(|c| c.get(clip)).copied()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Entities whose kind matches `pred`, in insertion order.
    pub fn entities_where(&self, pred: impl Fn(&NodeKind) -> bool) -> Vec<EntityId> {
        self.kinds
            .iter()
            .enumerate()
            .filter_map(|(idx, kind)| match kind {
                Some(k) if pred(k) => Some(EntityId(Handle::new(idx as u32, 0))),
                _ => None,
            })
            .collect()
    }

    fn spawn(&mut self, name: &str) -> EntityId {
        let id = EntityId(Handle::new(self.next_index, 0));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        self.names[id.index() as usize] = name.to_string();
        self.by_name.entry(name.to_string()).or_insert(id);
        id
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.names.resize(new_len, String::new());
            self.kinds.resize(new_len, None);
            self.transforms.resize(new_len, None);
            self.visibility.resize(new_len, None);
            self.colors.resize(new_len, None);
        }
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        let idx = entity.index() as usize;
        (idx < self.next_index as usize).then_some(idx)
    }
}

impl SceneHost for World {
    fn add_node(&mut self, node: Node) -> EntityId {
        let id = self.spawn(&node.name);
        let idx = id.index() as usize;
        self.kinds[idx] = Some(node.kind);
        self.transforms[idx] = Some(node.transform);
        self.visibility[idx] = Some(Visibility::from(node.visible));
        self.colors[idx] = node.color;
        trace!(name = %node.name, index = idx, "node added");
        id
    }

    fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        if let Some(idx) = self.slot(entity) {
            self.transforms[idx] = Some(transform);
        }
    }

    fn is_visible(&self, entity: EntityId) -> Option<bool> {
        self.visibility
            .get(entity.index() as usize)
            .and_then(|v| *v)
            .map(|v| v.visible)
    }

    fn set_visibility(&mut self, entity: EntityId, visible: bool) {
        if let Some(idx) = self.slot(entity) {
            self.visibility[idx] = Some(Visibility::from(visible));
        }
    }

    fn set_color(&mut self, entity: EntityId, color: Color) {
        if let Some(idx) = self.slot(entity) {
            self.colors[idx] = Some(color);
        }
    }

    fn register_clips(&mut self, agent: &str, clips: &[String]) {
        let set = self.clips.entry(agent.to_string()).or_default();
        for clip in clips {
            set.entry(clip.clone()).or_default();
        }
        debug!(agent, count = clips.len(), "clips registered");
    }

    fn play_clip(&mut self, agent: &str, clip: &str, play: bool, loop_mode: LoopMode) -> bool {
        let Some(state) = self.clips.get_mut(agent).and_then(|c| c.get_mut(clip)) else {
            debug!(agent, clip, "no such clip");
            return false;
        };
        *state = ClipState {
            playing: play,
            loop_mode,
        };
        true
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    fn set_camera_look_at(&mut self, target: Vec3) {
        self.camera.look_at = target;
    }

    fn notify_user(&mut self, message: &str, severity: Severity) {
        info!(%severity, "{message}");
        self.notifications.push(Notification {
            message: message.to_string(),
            severity,
        });
    }
}
