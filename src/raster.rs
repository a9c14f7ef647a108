//! Polygon Rasterizer
//!
//! Fill rule:
//!   - Vertices are mapped to the grid first, see [Vertex::to_grid](crate::Vertex::to_grid)
//!   - Interior is even-odd: a row `y` crosses an edge when
//!     `y_lo <= y < y_hi`, horizontal edges never cross, and each pair
//!     of crossings covers `ceil(x_left) ..= floor(x_right)`
//!   - Boundary is closed: every pixel of the digital segment between
//!     consecutive vertices is covered, see [LineInterpolator]
//!   - Pixels outside of the raster are clipped; only the rows and
//!     columns of the raster are ever visited, however far away the
//!     vertices are

use std::cmp::max;
use std::cmp::min;
use std::cmp::Ordering;

use log::debug;

use crate::buffer::{Label, LabelMask, RasterShape, BACKGROUND};
use crate::line::LineInterpolator;
use crate::polygon::{bounding_rect, Polygon, Rectangle, Vertex};
use crate::scan::Scanline;

/// Exact x position of an edge crossing, num / den with den > 0
///
/// Grid coordinates are limited to 2^53, so every product below fits
#[derive(Debug,Copy,Clone)]
struct Crossing {
    num: i128,
    den: i128,
}

impl Crossing {
    fn at(lo: Vertex<i64>, hi: Vertex<i64>, y: i64) -> Self {
        let (x0, y0) = (i128::from(lo.x), i128::from(lo.y));
        let den = i128::from(hi.y) - y0;
        Self { num: x0 * den + (i128::from(y) - y0) * (i128::from(hi.x) - x0), den }
    }
    fn floor(&self) -> i128 {
        self.num.div_euclid(self.den)
    }
    fn ceil(&self) -> i128 {
        let f = self.floor();
        if self.num.rem_euclid(self.den) == 0 { f } else { f + 1 }
    }
    fn cmp(&self, other: &Crossing) -> Ordering {
        self.floor().cmp(&other.floor())
            .then_with(|| (self.num.rem_euclid(self.den) * other.den)
                       .cmp(&(other.num.rem_euclid(other.den) * self.den)))
    }
}

/// Pull a column in to [-1, width]
fn column(x: i128, width: usize) -> i64 {
    x.max(-1).min(width as i128) as i64
}

/// Covered pixels of a polygon, one [Scanline] per non-empty row
///
/// Rows are ordered by y, spans within a row by x; spans are clipped
/// to `shape` and never touch or overlap. Degenerate polygons cover
/// nothing.
pub(crate) fn scanlines(polygon: &Polygon, shape: RasterShape) -> Vec<Scanline> {
    if polygon.is_degenerate() {
        debug!("degenerate polygon with {} vertices covers no pixels", polygon.len());
        return vec![];
    }
    if shape.width == 0 || shape.height == 0 {
        return vec![];
    }
    let pts = polygon.to_grid();
    let bounds = match bounding_rect(&pts) {
        Some(r) => r,
        None => return vec![],
    };
    let ymin = max(bounds.y1, 0);
    let ymax = min(bounds.y2, shape.height as i64 - 1);
    if ymin > ymax || bounds.x2 < 0 || bounds.x1 >= shape.width as i64 {
        return vec![];
    }

    let mut rows : Vec<Scanline> = (ymin ..= ymax).map(Scanline::new).collect();

    // Interior, even-odd
    let mut xs = Vec::with_capacity(pts.len());
    for (i, y) in (ymin ..= ymax).enumerate() {
        xs.clear();
        for (a, b) in Polygon::edges(&pts) {
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if lo.y <= y && y < hi.y {
                xs.push(Crossing::at(lo, hi, y));
            }
        }
        xs.sort_by(|a, b| a.cmp(b));
        for pair in xs.chunks_exact(2) {
            rows[i].add_span(column(pair[0].ceil(), shape.width), column(pair[1].floor(), shape.width));
        }
    }

    // Boundary
    let clip = Rectangle::new(0, ymin, shape.width as i64 - 1, ymax);
    for (a, b) in Polygon::edges(&pts) {
        for (x, y) in LineInterpolator::new(a, b).clip(clip) {
            if y >= ymin && y <= ymax {
                rows[(y - ymin) as usize].add_cell(x);
            }
        }
    }

    for sl in rows.iter_mut() {
        sl.finalize(shape.width);
    }
    rows.retain(|sl| sl.num_spans() > 0);
    rows
}

/// Fill a polygon into a fresh mask
///
/// Every covered pixel, in every plane, is set to `label`; all other
/// pixels are background. Degenerate polygons, and a background
/// `label`, give an all background mask.
///
///     use roimask::{rasterize, Polygon, RasterShape};
///
///     let tri = Polygon::from_xy(&[(0.,0.), (4.,0.), (0.,4.)]);
///     let mask = rasterize(&tri, RasterShape::new(5,5), 3);
///     assert_eq!(mask[(0,0)], 3);
///     assert_eq!(mask[(2,2)], 3);
///     assert_eq!(mask[(3,3)], 0);
///     assert_eq!(mask.count(3), 15);
///
pub fn rasterize(polygon: &Polygon, shape: RasterShape, label: Label) -> LabelMask {
    let mut mask = LabelMask::new(shape);
    if label == BACKGROUND {
        return mask;
    }
    for sl in scanlines(polygon, shape) {
        for span in &sl.spans {
            mask.fill_hline(span.x as usize, span.last() as usize, sl.y as usize, label);
        }
    }
    mask
}
