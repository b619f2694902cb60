// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path emission: lower a [`BezPath`] into immediate-mode path calls.
//!
//! ## Usage
//!
//! 1) Build a path in figure space.
//! 2) Call [`emit_path`] with the surface, the path and the full
//!    figure-to-raster transform.
//! 3) Commit the path (`fill`, `stroke` or `clip`) before emitting another.
//!
//! Every emitted coordinate is transformed. Elements whose transformed
//! points are not all finite are dropped; the remaining elements keep
//! their relative order.
//!
//! When a clip rectangle is given and the path is a pure polyline
//! (move/line elements only), a line whose start and end both lie beyond
//! the same edge of the rectangle is emitted as a move instead. This keeps
//! long off-screen strokes out of the surface without changing the number
//! or order of emitted segments.

use kurbo::{Affine, BezPath, PathEl, Point, Rect};

use crate::Canvas2d;

/// Iterate the transformed, finite elements of `path`, with optional
/// off-screen line suppression against `clip`.
pub fn path_segments(
    path: &BezPath,
    transform: Affine,
    clip: Option<Rect>,
) -> impl Iterator<Item = PathEl> + '_ {
    let clip = clip.filter(|_| is_polyline(path));
    let mut last: Option<Point> = None;
    path.elements().iter().filter_map(move |el| {
        let el = transform_el(transform, *el);
        if !el_is_finite(&el) {
            return None;
        }
        let out = match (el, clip, last) {
            (PathEl::LineTo(p), Some(rect), Some(prev)) if same_outside_edge(rect, prev, p) => {
                PathEl::MoveTo(p)
            }
            _ => el,
        };
        if let Some(end) = el.end_point() {
            last = Some(end);
        }
        Some(out)
    })
}

/// Emit `path` onto `canvas` as a single new path.
///
/// Issues exactly one `begin_path`, then one call per surviving element.
/// Returns the number of segment calls emitted.
pub fn emit_path<C: Canvas2d + ?Sized>(
    canvas: &mut C,
    path: &BezPath,
    transform: Affine,
    clip: Option<Rect>,
) -> usize {
    canvas.begin_path();
    let mut count = 0;
    for el in path_segments(path, transform, clip) {
        match el {
            PathEl::MoveTo(p) => canvas.move_to(p.x, p.y),
            PathEl::LineTo(p) => canvas.line_to(p.x, p.y),
            PathEl::QuadTo(c, p) => canvas.quadratic_curve_to(c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c1, c2, p) => canvas.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathEl::ClosePath => canvas.close_path(),
        }
        count += 1;
    }
    count
}

/// Apply an affine transform to every point of an element.
pub fn transform_el(transform: Affine, el: PathEl) -> PathEl {
    match el {
        PathEl::MoveTo(p) => PathEl::MoveTo(transform * p),
        PathEl::LineTo(p) => PathEl::LineTo(transform * p),
        PathEl::QuadTo(c, p) => PathEl::QuadTo(transform * c, transform * p),
        PathEl::CurveTo(c1, c2, p) => PathEl::CurveTo(transform * c1, transform * c2, transform * p),
        PathEl::ClosePath => PathEl::ClosePath,
    }
}

fn el_is_finite(el: &PathEl) -> bool {
    match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
        PathEl::QuadTo(c, p) => c.is_finite() && p.is_finite(),
        PathEl::CurveTo(c1, c2, p) => c1.is_finite() && c2.is_finite() && p.is_finite(),
        PathEl::ClosePath => true,
    }
}

fn is_polyline(path: &BezPath) -> bool {
    path.elements()
        .iter()
        .all(|el| matches!(el, PathEl::MoveTo(_) | PathEl::LineTo(_)))
}

fn same_outside_edge(rect: Rect, a: Point, b: Point) -> bool {
    (a.x < rect.x0 && b.x < rect.x0)
        || (a.x > rect.x1 && b.x > rect.x1)
        || (a.y < rect.y0 && b.y < rect.y0)
        || (a.y > rect.y1 && b.y > rect.y1)
}
