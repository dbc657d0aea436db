use foundation::math::{Vec2, Vec3, open_ring, point_in_polygon};
use tracing::{debug, warn};

use crate::error::PatrolError;
use crate::events::Transition;

/// Fence outline projected onto the ground plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Fence {
    ring: Vec<Vec2>,
}

impl Fence {
    pub fn new(points: &[Vec3]) -> Result<Self, PatrolError> {
        let ring: Vec<Vec2> = points.iter().map(|p| p.ground()).collect();
        if open_ring(&ring).len() < 3 {
            return Err(PatrolError::MissingFence);
        }
        Ok(Self { ring })
    }

    /// Height is ignored; points on the outline count as inside.
    pub fn contains(&self, point: Vec3) -> bool {
        point_in_polygon(point.ground(), &self.ring)
    }
}

/// Edge-triggered containment: reports a [`Transition`] only when the
/// inside/outside flag changes. Without a fence nothing is ever reported.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceMonitor {
    fence: Option<Fence>,
    inside: bool,
}

impl GeofenceMonitor {
    pub fn new(points: &[Vec3]) -> Self {
        let fence = match Fence::new(points) {
            Ok(fence) => Some(fence),
            Err(err) => {
                warn!(%err, "geofence disabled");
                None
            }
        };
        Self {
            fence,
            inside: false,
        }
    }

    pub fn has_fence(&self) -> bool {
        self.fence.is_some()
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn observe(&mut self, position: Vec3) -> Option<Transition> {
        let fence = self.fence.as_ref()?;
        let inside = fence.contains(position);
        if inside == self.inside {
            return None;
        }
        self.inside = inside;
        let transition = if inside {
            Transition::Entered
        } else {
            Transition::Exited
        };
        debug!(?transition, x = position.x, z = position.z, "geofence transition");
        Some(transition)
    }
}
