//! Voronoi partition of the canvas.
//!
//! [`Tessellator`] is the seam between the scene builder and whatever computes
//! the partition. [`DelaunayTessellator`] triangulates the sites with `spade`
//! and clips the extent rectangle by the bisector of every Delaunay neighbour,
//! which yields the exact bounded Voronoi cell of each site.

use bevy::log::debug;
use bevy::math::{Rect, Vec2};
use rand::Rng;
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::math;

/// Computes one polygon slot per site, index aligned with the input.
///
/// A slot is `None` when the site's cell is undefined (coincident or
/// non-finite sites, zero-area results).
pub trait Tessellator {
    /// Partitions `extent` among `sites`.
    fn partition(&self, sites: &[Vec2], extent: Rect) -> Vec<Option<Vec<Vec2>>>;
}

/// Bounded Voronoi partition derived from a `spade` Delaunay triangulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DelaunayTessellator;

impl Tessellator for DelaunayTessellator {
    fn partition(&self, sites: &[Vec2], extent: Rect) -> Vec<Option<Vec<Vec2>>> {
        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        let mut owners: Vec<Option<FixedVertexHandle>> = Vec::with_capacity(sites.len());
        let mut claimed: Vec<FixedVertexHandle> = Vec::with_capacity(sites.len());

        for (i, site) in sites.iter().enumerate() {
            let point = Point2::new(f64::from(site.x), f64::from(site.y));
            match triangulation.insert(point) {
                // Re-inserting an existing position hands back the first owner's vertex.
                Ok(handle) if claimed.contains(&handle) => {
                    debug!("site {i} coincides with an earlier site");
                    owners.push(None);
                }
                Ok(handle) => {
                    claimed.push(handle);
                    owners.push(Some(handle));
                }
                Err(err) => {
                    debug!("site {i} rejected by triangulation: {err:?}");
                    owners.push(None);
                }
            }
        }

        let frame = extent_ring(extent);
        owners
            .into_iter()
            .map(|owner| {
                let handle = owner?;
                let vertex = triangulation.vertex(handle);
                let site = vertex.position();
                let mut ring = frame.clone();
                for edge in vertex.out_edges() {
                    ring = clip_to_bisector(&ring, site, edge.to().position());
                    if ring.is_empty() {
                        break;
                    }
                }
                finish_ring(&ring)
            })
            .collect()
    }
}

/// Draws `count` uniform points in `[0, size.x) × [0, size.y)`.
pub fn sample_sites<R: Rng>(rng: &mut R, count: usize, size: Vec2) -> Vec<Vec2> {
    (0..count)
        .map(|_| Vec2::new(rng.random::<f32>() * size.x, rng.random::<f32>() * size.y))
        .collect()
}

fn extent_ring(extent: Rect) -> Vec<Point2<f64>> {
    let (x0, y0) = (f64::from(extent.min.x), f64::from(extent.min.y));
    let (x1, y1) = (f64::from(extent.max.x), f64::from(extent.max.y));
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

/// Sutherland–Hodgman step: keeps the part of `ring` closer to `site` than
/// to `other`.
fn clip_to_bisector(
    ring: &[Point2<f64>],
    site: Point2<f64>,
    other: Point2<f64>,
) -> Vec<Point2<f64>> {
    let (dx, dy) = (other.x - site.x, other.y - site.y);
    let (mx, my) = ((site.x + other.x) / 2.0, (site.y + other.y) / 2.0);
    // Negative or zero: on the site's side of the bisector.
    let side = |p: Point2<f64>| (p.x - mx) * dx + (p.y - my) * dy;

    let mut out = Vec::with_capacity(ring.len() + 1);
    for (i, &current) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        let (sc, sn) = (side(current), side(next));
        if sc <= 0.0 {
            out.push(current);
        }
        if (sc <= 0.0) != (sn <= 0.0) {
            let t = sc / (sc - sn);
            out.push(Point2::new(
                current.x + (next.x - current.x) * t,
                current.y + (next.y - current.y) * t,
            ));
        }
    }
    out
}

fn finish_ring(ring: &[Point2<f64>]) -> Option<Vec<Vec2>> {
    let ring: Vec<Vec2> = ring
        .iter()
        .map(|p| Vec2::new(p.x as f32, p.y as f32))
        .collect();
    (math::polygon_centroid(&ring).is_some()).then_some(ring)
}
