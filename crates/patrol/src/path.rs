use foundation::math::{EDGE_EPSILON, Vec3};

use crate::error::PatrolError;

/// Ordered waypoints an agent walks through.
///
/// A path whose last waypoint repeats the first is a closed loop; the
/// duplicate is kept, so walking it ends where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolPath {
    waypoints: Vec<Vec3>,
}

impl PatrolPath {
    pub const MIN_WAYPOINTS: usize = 2;

    pub fn new(waypoints: Vec<Vec3>) -> Result<Self, PatrolError> {
        if waypoints.len() < Self::MIN_WAYPOINTS {
            return Err(PatrolError::InvalidPath(waypoints.len()));
        }
        if let Some(idx) = waypoints
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(PatrolError::NonFiniteWaypoint(idx));
        }
        Ok(Self { waypoints })
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(first), Some(last)) => first.distance(*last) <= EDGE_EPSILON,
            _ => false,
        }
    }

    /// Polyline length through every waypoint.
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::PatrolPath;
    use crate::error::PatrolError;
    use foundation::math::Vec3;

    #[test]
    fn rejects_degenerate_paths() {
        assert_eq!(PatrolPath::new(vec![]), Err(PatrolError::InvalidPath(0)));
        assert_eq!(
            PatrolPath::new(vec![Vec3::ZERO]),
            Err(PatrolError::InvalidPath(1))
        );
        assert_eq!(
            PatrolPath::new(vec![Vec3::ZERO, Vec3::new(f64::NAN, 0.0, 0.0)]),
            Err(PatrolError::NonFiniteWaypoint(1))
        );
    }

    #[test]
    fn closed_loop_keeps_its_duplicate() {
        let path = PatrolPath::new(vec![
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 4.0),
            Vec3::ZERO,
        ])
        .expect("path");
        assert!(path.is_closed());
        assert_eq!(path.len(), 4);
        assert_eq!(path.length(), 12.0);
    }

    #[test]
    fn open_path() {
        let path = PatrolPath::new(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]).expect("path");
        assert!(!path.is_closed());
        assert_eq!(path.get(1), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(path.get(2), None);
    }
}
