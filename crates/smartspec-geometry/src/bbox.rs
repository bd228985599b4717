//! Axis-aligned bounding box reduction over a point cloud.

use crate::math::Point3;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any included point replaces.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest AABB containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(points.iter().fold(Self::empty(), |mut aabb, p| {
            aabb.include_point(p);
            aabb
        }))
    }

    /// Grow the box to cover `p`.
    pub fn include_point(&mut self, p: &Point3) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Size along each axis as `(x, y, z)`. Zero for a degenerate axis,
    /// `f64::MAX` where the difference of two finite extremes overflows.
    pub fn extent(&self) -> (f64, f64, f64) {
        (
            (self.max.x - self.min.x).clamp(0.0, f64::MAX),
            (self.max.y - self.min.y).clamp(0.0, f64::MAX),
            (self.max.z - self.min.z).clamp(0.0, f64::MAX),
        )
    }

    /// Test if a point lies inside the box (boundary included).
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// True if the box has zero extent along at least one axis.
    pub fn is_degenerate(&self) -> bool {
        let (x, y, z) = self.extent();
        x == 0.0 || y == 0.0 || z == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_point_is_degenerate() {
        let p = Point3::new(4.0, -2.0, 7.5);
        let bbox = Aabb3::from_points(&[p]).unwrap();
        assert_eq!(bbox.extent(), (0.0, 0.0, 0.0));
        assert!(bbox.is_degenerate());
        assert!(bbox.contains(&p));
    }

    #[test]
    fn test_flat_box_is_degenerate() {
        let bbox = Aabb3::from_points(&[Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)])
            .unwrap();
        assert_eq!(bbox.extent(), (3.0, 4.0, 0.0));
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn test_contains_rejects_outside() {
        let bbox = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(bbox.contains(&Point3::new(1.0, 0.5, 0.0)));
        assert!(!bbox.contains(&Point3::new(1.0001, 0.5, 0.0)));
    }

    fn coord() -> impl Strategy<Value = f64> {
        -1.0e6f64..1.0e6f64
    }

    proptest! {
        #[test]
        fn prop_bbox_contains_every_point(
            raw in prop::collection::vec((coord(), coord(), coord()), 1..64)
        ) {
            let points: Vec<Point3> = raw.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect();
            let bbox = Aabb3::from_points(&points).unwrap();
            for p in &points {
                prop_assert!(bbox.contains(p));
            }
            let (x, y, z) = bbox.extent();
            prop_assert!(x >= 0.0 && y >= 0.0 && z >= 0.0);
        }
    }
}
