//! Ground-plane polygon containment.
//!
//! Polygons are simple rings on the `(x, z)` plane. They may be concave, may or
//! may not repeat the first vertex at the end, and have no holes.
//!
//! Boundary contract: a point lying on an edge or a vertex (within
//! [`EDGE_EPSILON`]) is reported as inside. The crossing-number rule alone
//! would give an arbitrary answer there, so edges are checked explicitly first.

use super::Vec2;
use crate::bounds::Aabb2;

/// Distance under which a point counts as lying on a polygon edge.
pub const EDGE_EPSILON: f64 = 1e-9;

/// Even-odd (crossing number) containment test on the ground plane.
///
/// Fewer than three distinct vertices never contain anything.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let ring = open_ring(polygon);
    if ring.len() < 3 {
        return false;
    }

    let Some(bounds) = Aabb2::from_points(ring.iter().copied()) else {
        return false;
    };
    if !bounds.contains_with_margin(point, EDGE_EPSILON) {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if on_segment(point, a, b) {
            return true;
        }
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// The ring without a closing duplicate of its first vertex.
pub fn open_ring(polygon: &[Vec2]) -> &[Vec2] {
    match (polygon.first(), polygon.last()) {
        (Some(first), Some(last)) if polygon.len() >= 2 && same_point(*first, *last) => {
            &polygon[..polygon.len() - 1]
        }
        _ => polygon,
    }
}

fn same_point(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < EDGE_EPSILON && (a.y - b.y).abs() < EDGE_EPSILON
}

fn on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    let ab = b - a;
    let ap = p - a;
    let len = ab.length();
    if len <= EDGE_EPSILON {
        return ap.length() <= EDGE_EPSILON;
    }
    if (ab.perp_dot(ap) / len).abs() > EDGE_EPSILON {
        return false;
    }
    let t = ap.dot(ab) / (len * len);
    let slack = EDGE_EPSILON / len;
    (-slack..=1.0 + slack).contains(&t)
}

#[cfg(test)]
mod tests {
    use super::{open_ring, point_in_polygon};
    use crate::math::{Vec2, Vec3};

    fn on_ground(point: Vec3, vertices: &[Vec3]) -> bool {
        let ring: Vec<Vec2> = vertices.iter().map(|v| v.ground()).collect();
        point_in_polygon(point.ground(), &ring)
    }

    fn fence() -> Vec<Vec3> {
        vec![
            Vec3::new(-26.69, 0.1, 14.62),
            Vec3::new(-15.78, 0.1, 15.53),
            Vec3::new(-15.37, 0.1, 32.6),
            Vec3::new(-26.99, 0.1, 30.22),
            Vec3::new(-26.69, 0.1, 14.62),
        ]
    }

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn documented_fence_inside_and_outside() {
        assert!(on_ground(Vec3::new(-20.0, 0.0, 20.0), &fence()));
        assert!(!on_ground(Vec3::new(0.0, 0.0, 0.0), &fence()));
    }

    #[test]
    fn height_is_ignored() {
        assert!(on_ground(Vec3::new(-20.0, 500.0, 20.0), &fence()));
    }

    #[test]
    fn closing_duplicate_is_optional() {
        let mut closed = square();
        closed.push(Vec2::new(0.0, 0.0));
        assert_eq!(open_ring(&closed).len(), 4);
        for p in [Vec2::new(5.0, 5.0), Vec2::new(-1.0, 5.0), Vec2::new(9.9, 0.1)] {
            assert_eq!(point_in_polygon(p, &closed), point_in_polygon(p, &square()));
        }
    }

    #[test]
    fn concave_polygon() {
        // L-shape with the notch at the upper right.
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 4.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(4.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(2.0, 8.0), &l));
        assert!(point_in_polygon(Vec2::new(8.0, 2.0), &l));
        assert!(!point_in_polygon(Vec2::new(8.0, 8.0), &l));
    }

    #[test]
    fn boundary_points_are_inside() {
        assert!(point_in_polygon(Vec2::new(5.0, 0.0), &square()));
        assert!(point_in_polygon(Vec2::new(10.0, 5.0), &square()));
        assert!(point_in_polygon(Vec2::new(0.0, 10.0), &square()));
        assert!(point_in_polygon(Vec2::new(10.0, 10.0), &square()));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!point_in_polygon(Vec2::new(0.0, 0.0), &[]));
        let segment = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0)];
        assert!(!point_in_polygon(Vec2::new(0.5, 0.5), &segment));
    }
}
