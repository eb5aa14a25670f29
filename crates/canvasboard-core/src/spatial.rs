use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Point};
use crate::shape::Shape;

/// An entry in the R-tree spatial index, referencing a shape by its z-index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the shape vector (higher = drawn later).
    pub z_index: usize,
    /// Bounding box of the shape.
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

/// Spatial index for pointer hit-testing and viewport culling.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build the index over a shape collection in z-order.
    pub fn build(shapes: &[Shape]) -> Self {
        let entries = shapes
            .iter()
            .enumerate()
            .map(|(z_index, shape)| SpatialEntry {
                z_index,
                bbox: shape.bbox(),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Find all entries whose bounding box contains the given point.
    pub fn query_point(&self, point: &Point) -> Vec<&SpatialEntry> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x, point.y]))
            .collect()
    }

    /// Find all entries that intersect with the given viewport bounding box.
    pub fn query_viewport(&self, viewport: &BBox) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners(
            [viewport.min.x, viewport.min.y],
            [viewport.max.x, viewport.max.y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    /// The topmost shape actually containing `point`.
    ///
    /// `shapes` must be the same collection the index was built from.
    pub fn topmost_at<'a>(&self, shapes: &'a [Shape], point: &Point) -> Option<&'a Shape> {
        self.query_point(point)
            .into_iter()
            .filter_map(|entry| shapes.get(entry.z_index).map(|s| (entry.z_index, s)))
            .filter(|(_, shape)| shape.contains_point(point))
            .max_by_key(|(z, _)| *z)
            .map(|(_, shape)| shape)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{default_shapes, ShapeKind};

    #[test]
    fn test_spatial_query() {
        let shapes = default_shapes();
        let index = SpatialIndex::build(&shapes);
        assert_eq!(index.len(), 2);

        // Inside r1 (100..220)
        let results = index.query_point(&Point::new(150.0, 150.0));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].z_index, 0);

        // Viewport covering only c1 (260..380, 140..260)
        let viewport = BBox::new(Point::new(300.0, 150.0), Point::new(400.0, 250.0));
        let results = index.query_viewport(&viewport);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].z_index, 1);
    }

    #[test]
    fn test_topmost_wins() {
        let shapes = vec![
            Shape::new("under", ShapeKind::Rect, 0.0, 0.0, 100.0, "#000"),
            Shape::new("over", ShapeKind::Rect, 50.0, 50.0, 100.0, "#fff"),
        ];
        let index = SpatialIndex::build(&shapes);
        let hit = index.topmost_at(&shapes, &Point::new(75.0, 75.0)).unwrap();
        assert_eq!(hit.id, "over");
        let hit = index.topmost_at(&shapes, &Point::new(10.0, 10.0)).unwrap();
        assert_eq!(hit.id, "under");
        assert!(index.topmost_at(&shapes, &Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_circle_corner_misses() {
        let shapes = vec![Shape::new("c", ShapeKind::Circle, 0.0, 0.0, 10.0, "#000")];
        let index = SpatialIndex::build(&shapes);
        assert!(index.topmost_at(&shapes, &Point::new(9.5, 9.5)).is_none());
        assert!(index.topmost_at(&shapes, &Point::new(0.0, 9.0)).is_some());
    }

    #[test]
    fn test_point_on_edge_hits() {
        let shapes = default_shapes();
        let index = SpatialIndex::build(&shapes);
        // r1 spans 100..220 on both axes.
        assert_eq!(index.query_point(&Point::new(100.0, 220.0)).len(), 1);
        assert!(index.query_point(&Point::new(99.0, 150.0)).is_empty());
    }
}
