//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain `Vec2` / `Rect` inputs in canvas space (origin top-left, y down),
//! making them straightforward to unit-test.

use bevy::math::{Rect, Vec2};

/// Areas below this are treated as degenerate rings.
const AREA_EPSILON: f32 = 1e-6;

/// Canvas height that keeps the average cell area at or above `min_cell_area`.
///
/// Returns `round(min_cell_area * count / width)`; zero items give a zero-height
/// canvas.
pub fn canvas_height(count: usize, width: f32, min_cell_area: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    ((f64::from(min_cell_area) * count as f64) / f64::from(width)).round() as f32
}

/// Signed shoelace area of a closed ring (positive for counter-clockwise in
/// a y-up frame).
pub fn signed_area(ring: &[Vec2]) -> f32 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        twice += a.perp_dot(b);
    }
    twice / 2.0
}

/// Area-weighted centroid of a closed ring.
///
/// Returns `None` for rings with fewer than three vertices or (near) zero area.
pub fn polygon_centroid(ring: &[Vec2]) -> Option<Vec2> {
    let area = signed_area(ring);
    if area.abs() < AREA_EPSILON {
        return None;
    }
    let mut acc = Vec2::ZERO;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        acc += (*a + b) * a.perp_dot(b);
    }
    Some(acc / (6.0 * area))
}

/// Axis-aligned bounding box of a ring, `None` when empty.
pub fn polygon_bounds(ring: &[Vec2]) -> Option<Rect> {
    let first = *ring.first()?;
    Some(
        ring.iter()
            .fold(Rect::from_corners(first, first), |acc, p| {
                acc.union_point(*p)
            }),
    )
}

/// Even-odd point-in-polygon test.
pub fn contains_point(ring: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, a) in ring.iter().enumerate() {
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// "Cover" scale factor: the larger of the per-axis ratios, so an image of
/// `natural` size fills `target` completely (overflow allowed).
///
/// Returns `None` when either natural dimension is not strictly positive.
pub fn cover_scale(target: Vec2, natural: Vec2) -> Option<f32> {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return None;
    }
    Some((target.x / natural.x).max(target.y / natural.y))
}

/// Translation that moves the centre of `bbox` onto `target`.
pub fn center_offset(bbox: Rect, target: Vec2) -> Vec2 {
    target - bbox.center()
}

/// Converts a canvas point (origin top-left, y down) to a world point
/// (origin at canvas centre, y up).
pub fn canvas_to_world(p: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(p.x - canvas.x / 2.0, canvas.y / 2.0 - p.y)
}

/// Inverse of [`canvas_to_world`].
pub fn world_to_canvas(p: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(p.x + canvas.x / 2.0, canvas.y / 2.0 - p.y)
}

/// Clamps a camera's world-space y so a view of `view_height` stays inside a
/// canvas of `canvas_height` centred on the origin.
///
/// Canvases shorter than the view are pinned to the centre.
pub fn clamp_scroll(y: f32, canvas_height: f32, view_height: f32) -> f32 {
    let limit = ((canvas_height - view_height) / 2.0).max(0.0);
    y.clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    // ── canvas_height ───────────────────────────────────────────────

    #[test]
    fn height_for_zero_items_is_zero() {
        assert_eq!(canvas_height(0, 960.0, 160_000.0), 0.0);
    }

    #[test]
    fn height_matches_rounded_formula() {
        for n in 0..50usize {
            let expected = (160_000.0_f64 * n as f64 / 960.0).round() as f32;
            assert_eq!(canvas_height(n, 960.0, 160_000.0), expected, "n = {n}");
        }
    }

    #[test]
    fn height_is_non_decreasing() {
        let heights: Vec<f32> = (0..200).map(|n| canvas_height(n, 960.0, 160_000.0)).collect();
        for w in heights.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    // ── centroid / area ─────────────────────────────────────────────

    #[test]
    fn square_area_and_centroid() {
        let sq = unit_square();
        assert!((signed_area(&sq).abs() - 1.0).abs() < 1e-6);
        let c = polygon_centroid(&sq).unwrap();
        assert!((c - Vec2::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn centroid_ignores_winding() {
        let mut sq = unit_square();
        sq.reverse();
        let c = polygon_centroid(&sq).unwrap();
        assert!((c - Vec2::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn centroid_of_triangle_is_vertex_mean() {
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0), Vec2::new(0.0, 3.0)];
        let c = polygon_centroid(&tri).unwrap();
        assert!((c - Vec2::new(2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn degenerate_ring_has_no_centroid() {
        let line = [Vec2::ZERO, Vec2::X, Vec2::X * 2.0];
        assert!(polygon_centroid(&line).is_none());
        assert!(polygon_centroid(&[]).is_none());
    }

    // ── bounds / containment ────────────────────────────────────────

    #[test]
    fn bounds_of_empty_ring_is_none() {
        assert!(polygon_bounds(&[]).is_none());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let ring = [Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0), Vec2::new(5.0, 2.0)];
        let b = polygon_bounds(&ring).unwrap();
        assert_eq!(b.min, Vec2::new(-2.0, -1.0));
        assert_eq!(b.max, Vec2::new(5.0, 4.0));
    }

    #[test]
    fn contains_inside_and_outside() {
        let sq = unit_square();
        assert!(contains_point(&sq, Vec2::splat(0.5)));
        assert!(!contains_point(&sq, Vec2::new(1.5, 0.5)));
        assert!(!contains_point(&sq, Vec2::new(0.5, -0.1)));
        assert!(!contains_point(&[], Vec2::ZERO));
    }

    // ── cover_scale ─────────────────────────────────────────────────

    #[test]
    fn cover_picks_larger_ratio() {
        let s = cover_scale(Vec2::new(200.0, 300.0), Vec2::new(100.0, 50.0)).unwrap();
        assert!((s - 6.0).abs() < 1e-6);
        let s = cover_scale(Vec2::new(400.0, 10.0), Vec2::new(100.0, 50.0)).unwrap();
        assert!((s - 4.0).abs() < 1e-6);
    }

    #[test]
    fn cover_rejects_missing_dimensions() {
        assert!(cover_scale(Vec2::splat(10.0), Vec2::new(0.0, 5.0)).is_none());
        assert!(cover_scale(Vec2::splat(10.0), Vec2::new(5.0, -1.0)).is_none());
    }

    // ── clamp_scroll ────────────────────────────────────────────────

    #[test]
    fn scroll_clamps_to_canvas_edges() {
        assert_eq!(clamp_scroll(f32::INFINITY, 1000.0, 600.0), 200.0);
        assert_eq!(clamp_scroll(f32::NEG_INFINITY, 1000.0, 600.0), -200.0);
        assert_eq!(clamp_scroll(50.0, 1000.0, 600.0), 50.0);
    }

    #[test]
    fn short_canvas_is_pinned() {
        assert_eq!(clamp_scroll(f32::INFINITY, 300.0, 600.0), 0.0);
        assert_eq!(clamp_scroll(-10.0, 0.0, 600.0), 0.0);
    }

    // ── center_offset / coordinate frames ───────────────────────────

    #[test]
    fn offset_moves_bbox_center_onto_target() {
        let bbox = Rect::new(0.0, -134.0, 80.0, -96.0);
        let target = Vec2::new(300.0, 200.0);
        let moved = bbox.center() + center_offset(bbox, target);
        assert!((moved - target).length() < 1e-4);
    }

    #[test]
    fn canvas_world_roundtrip() {
        let canvas = Vec2::new(960.0, 500.0);
        for p in [Vec2::ZERO, Vec2::new(960.0, 500.0), Vec2::new(123.5, 77.25)] {
            let back = world_to_canvas(canvas_to_world(p, canvas), canvas);
            assert!((back - p).length() < 1e-4);
        }
        assert_eq!(canvas_to_world(Vec2::ZERO, canvas), Vec2::new(-480.0, 250.0));
    }
}
