//! Isometric cube geometry.
//!
//! Projects a cube onto three visible quadrilateral faces. All coordinates
//! are integer pixels; fractional offsets are floored so that edges line up
//! with the pixel grid.

/// Horizontal isometric factor, `cos(30°)` as pinned by the renderer.
///
/// Kept at the three-digit literal rather than the exact cosine: faces are
/// floored to whole pixels and the literal decides which sizes round down.
pub const ISO_COS_30: f64 = 0.866;

/// Vertical isometric factor, `sin(30°)`.
pub const ISO_SIN_30: f64 = 0.5;

/// Fraction of the cube size used for the vertical extent of the side faces.
pub const DEPTH_FACTOR: f64 = 0.6;

/// A pixel coordinate. May lie outside the canvas; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box with inclusive edges, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Width in pixels between the extreme edges (`max_x - min_x`).
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// Height in pixels between the extreme edges (`max_y - min_y`).
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }
}

/// Which of the three visible faces a polygon represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Left,
    Right,
}

/// A four-vertex face outline, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacePolygon {
    pub role: FaceRole,
    pub points: [Point; 4],
}

impl FacePolygon {
    pub fn new(role: FaceRole, points: [Point; 4]) -> Self {
        Self { role, points }
    }

    /// Smallest box containing every vertex.
    pub fn bounding_box(&self) -> BoundingBox {
        let xs = self.points.iter().map(|p| p.x);
        let ys = self.points.iter().map(|p| p.y);
        BoundingBox {
            min_x: xs.clone().min().unwrap_or(0),
            max_x: xs.max().unwrap_or(0),
            min_y: ys.clone().min().unwrap_or(0),
            max_y: ys.max().unwrap_or(0),
        }
    }
}

/// The three visible faces of one cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeFaces {
    pub top: FacePolygon,
    pub left: FacePolygon,
    pub right: FacePolygon,
}

impl CubeFaces {
    /// Faces in paint order: left, right, then top.
    ///
    /// The right face overlaps the left along the shared vertical edge and
    /// the top face overlaps both.
    pub fn paint_order(&self) -> [FacePolygon; 3] {
        [self.left, self.right, self.top]
    }
}

/// Floors `value / 2`, matching integer floor division on the projected length.
fn half_floor(value: f64) -> i32 {
    (value / 2.0).floor() as i32
}

/// Computes the top, left and right faces of a cube centred at `center`.
///
/// `size` must be at least 1 for a non-degenerate result. `depth_offset`
/// stretches the side faces downwards without affecting paint order.
pub fn faces_for_cube(center: Point, size: i32, depth_offset: i32) -> CubeFaces {
    let Point { x: cx, y: cy } = center;
    let size_f = size as f64;

    let dx = half_floor(size_f * ISO_COS_30);
    let dy = half_floor(size_f * ISO_SIN_30);
    let depth = half_floor(size_f * DEPTH_FACTOR + depth_offset as f64);
    let apex = size.div_euclid(2);

    let top_left = Point::new(cx - dx, cy - dy);
    let top_right = Point::new(cx + dx, cy - dy);
    let middle = Point::new(cx, cy);
    let bottom_middle = Point::new(cx, cy + depth);

    let top = FacePolygon::new(
        FaceRole::Top,
        [Point::new(cx, cy - apex), top_right, middle, top_left],
    );
    let left = FacePolygon::new(
        FaceRole::Left,
        [top_left, middle, bottom_middle, Point::new(cx - dx, cy - dy + depth)],
    );
    let right = FacePolygon::new(
        FaceRole::Right,
        [middle, top_right, Point::new(cx + dx, cy - dy + depth), bottom_middle],
    );

    CubeFaces { top, left, right }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(face: &FacePolygon) -> Vec<(i32, i32)> {
        face.points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn unit_cube_at_origin_offsets() {
        // size 21: dx = floor(18.186 / 2) = 9, dy = floor(10.5 / 2) = 5,
        // depth = floor(12.6 / 2) = 6, apex = 10.
        let faces = faces_for_cube(Point::new(32, 32), 21, 0);
        assert_eq!(pts(&faces.top), vec![(32, 22), (41, 27), (32, 32), (23, 27)]);
        assert_eq!(pts(&faces.left), vec![(23, 27), (32, 32), (32, 38), (23, 33)]);
        assert_eq!(pts(&faces.right), vec![(32, 32), (41, 27), (41, 33), (32, 38)]);
    }

    #[test]
    fn projection_floors_fractional_offsets() {
        // 10 * 0.866 = 8.66 -> 4.33 -> 4 ; 10 * 0.5 = 5 -> 2.5 -> 2
        let faces = faces_for_cube(Point::new(0, 0), 10, 0);
        assert_eq!(faces.top.points[1], Point::new(4, -2));
        assert_eq!(faces.top.points[3], Point::new(-4, -2));
    }

    #[test]
    fn depth_offset_only_stretches_side_faces() {
        let flat = faces_for_cube(Point::new(50, 50), 20, 0);
        let deep = faces_for_cube(Point::new(50, 50), 20, 10);

        assert_eq!(flat.top, deep.top);
        // depth grows from floor(12/2)=6 to floor(22/2)=11
        assert_eq!(flat.left.points[2], Point::new(50, 56));
        assert_eq!(deep.left.points[2], Point::new(50, 61));
        assert_eq!(deep.right.points[3], deep.left.points[2]);
    }

    #[test]
    fn faces_share_edges() {
        let faces = faces_for_cube(Point::new(40, 40), 17, 4);
        // top-left corner is shared by top and left
        assert_eq!(faces.top.points[3], faces.left.points[0]);
        // centre vertex is shared by all three
        assert_eq!(faces.top.points[2], faces.left.points[1]);
        assert_eq!(faces.top.points[2], faces.right.points[0]);
        assert_eq!(faces.top.points[1], faces.right.points[1]);
    }

    #[test]
    fn paint_order_is_left_right_top() {
        let faces = faces_for_cube(Point::new(10, 10), 8, 0);
        let roles: Vec<_> = faces.paint_order().iter().map(|f| f.role).collect();
        assert_eq!(roles, vec![FaceRole::Left, FaceRole::Right, FaceRole::Top]);
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let faces = faces_for_cube(Point::new(32, 32), 21, 0);
        let bbox = faces.left.bounding_box();
        assert_eq!(bbox, BoundingBox { min_x: 23, min_y: 27, max_x: 32, max_y: 38 });
        assert_eq!(bbox.width(), 9);
        assert_eq!(bbox.height(), 11);
    }

    #[test]
    fn zero_size_collapses_to_center() {
        let faces = faces_for_cube(Point::new(5, 5), 0, 0);
        for face in faces.paint_order() {
            let bbox = face.bounding_box();
            assert_eq!((bbox.width(), bbox.height()), (0, 0));
        }
    }
}
