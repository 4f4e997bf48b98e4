//! Cube placement.
//!
//! Scatters cube centres over the canvas with a soft minimum spacing, then
//! orders them back to front.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::canvas::CanvasConfig;
use crate::geometry::Point;

/// Random positions tried per cube, out of a 50-try budget, before spacing
/// is given up (80% of the budget).
pub const SPACED_ATTEMPTS: u32 = 41;

/// Minimum centre distance, as a fraction of the base cube size.
pub const MIN_SPACING_FACTOR: f64 = 0.7;

/// Per-cube size multiplier range.
pub const SIZE_VARIATION: RangeInclusive<f64> = 0.8..=1.2;

/// Extra side-face depth per paint index.
pub const DEPTH_STEP: i32 = 2;

/// One cube to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeSpec {
    pub center: Point,
    /// Edge length in pixels, at least 1.
    pub size: i32,
    /// Extra depth for the side faces. Does not affect paint order.
    pub depth_offset: i32,
}

/// Inclusive range of valid centre coordinates along one axis.
fn axis_range(dimension: u32, margin: i32) -> RangeInclusive<i32> {
    let dimension = dimension as i32;
    if margin <= dimension - margin {
        margin..=dimension - margin
    } else {
        // canvas too small for the margin: pin to the middle
        let mid = dimension / 2;
        mid..=mid
    }
}

fn too_close(candidate: Point, placed: &[Point], min_distance: f64) -> bool {
    placed.iter().any(|p| {
        let dx = (candidate.x - p.x) as f64;
        let dy = (candidate.y - p.y) as f64;
        dx.hypot(dy) < min_distance
    })
}

/// Plans exactly `count` cubes for the given canvas.
///
/// Centres lie within `[base_cube_size, dimension - base_cube_size]` on both
/// axes. Each cube gets [`SPACED_ATTEMPTS`] tries to land at least
/// `0.7 * base_cube_size` away from every earlier cube; if all of them are
/// crowded, one more candidate is taken regardless, so the planner always
/// terminates with a full list.
///
/// The result is sorted by ascending centre `y` (stable), and depth offsets
/// follow that order.
pub fn plan<R: Rng + ?Sized>(
    count: u32,
    canvas: &CanvasConfig,
    base_cube_size: i32,
    rng: &mut R,
) -> Vec<CubeSpec> {
    let base_cube_size = base_cube_size.max(1);
    let margin = base_cube_size;
    let xs = axis_range(canvas.width, margin);
    let ys = axis_range(canvas.height, margin);
    let min_distance = base_cube_size as f64 * MIN_SPACING_FACTOR;

    let mut centers: Vec<Point> = Vec::with_capacity(count as usize);
    let mut cubes: Vec<CubeSpec> = Vec::with_capacity(count as usize);

    for index in 0..count {
        let spaced = (0..SPACED_ATTEMPTS)
            .map(|_| Point::new(rng.random_range(xs.clone()), rng.random_range(ys.clone())))
            .find(|candidate| !too_close(*candidate, &centers, min_distance));

        let center = match spaced {
            Some(center) => center,
            None => {
                tracing::trace!(index, "placement crowded, accepting overlap");
                Point::new(rng.random_range(xs.clone()), rng.random_range(ys.clone()))
            }
        };

        let scale = rng.random_range(SIZE_VARIATION);
        let size = ((base_cube_size as f64 * scale) as i32).max(1);

        centers.push(center);
        cubes.push(CubeSpec {
            center,
            size,
            depth_offset: 0,
        });
    }

    cubes.sort_by_key(|cube| cube.center.y);
    for (paint_index, cube) in cubes.iter_mut().enumerate() {
        cube.depth_offset = paint_index as i32 * DEPTH_STEP;
    }

    cubes
}

// ============================================================================
// Tests
// ============================================================================
