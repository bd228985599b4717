//! Point types shared by every format parser.

use crate::bbox::Aabb3;

/// A point in 3D space, in the file's native length unit.
pub type Point3 = nalgebra::Point3<f64>;

/// Points harvested from one file.
///
/// Order carries no meaning. An empty cloud means the parser found no usable
/// geometry, which is different from a degenerate (zero-volume) shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point3>,
}

impl PointCloud {
    /// Create an empty point cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty point cloud with room for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Add a point.
    pub fn push(&mut self, point: Point3) {
        self.points.push(point);
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points were harvested.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the points.
    pub fn iter(&self) -> impl Iterator<Item = &Point3> {
        self.points.iter()
    }

    /// The points as a slice.
    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    /// Axis-aligned bounding box of the cloud, or `None` if it is empty.
    pub fn bounding_box(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.points)
    }
}

impl FromIterator<Point3> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<Point3> for PointCloud {
    fn extend<I: IntoIterator<Item = Point3>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cloud_has_no_bbox() {
        let cloud = PointCloud::new();
        assert!(cloud.is_empty());
        assert!(cloud.bounding_box().is_none());
    }

    #[test]
    fn test_collect_and_bbox() {
        let cloud: PointCloud = vec![Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 0.0, 5.0)]
            .into_iter()
            .collect();
        assert_eq!(cloud.len(), 2);
        let bbox = cloud.bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::new(-1.0, 0.0, 3.0));
        assert_eq!(bbox.max, Point3::new(1.0, 2.0, 5.0));
    }
}
