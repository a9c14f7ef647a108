//! Digital lines

use crate::polygon::{Rectangle, Vertex};

/// Bresenham Line Interpolator
///
/// Iterates every pixel of the digital segment between two grid
/// points, both end points included. Lines are always walked from the
/// lower (y, then x) end point, so a segment covers the same pixels
/// regardless of its direction.
///
/// Pixels are computed directly from their step along the major axis,
/// so a line can be [clipped](LineInterpolator::clip) without walking
/// the part outside.
#[derive(Debug,Clone)]
pub struct LineInterpolator {
    /// Start point
    x: i64,
    y: i64,
    /// Absolute x distance
    dx: i64,
    /// y distance, never negative
    dy: i64,
    /// x direction
    sx: i64,
    /// Next step
    step: i64,
    /// Last step, inclusive
    last: i64,
}

impl LineInterpolator {
    pub fn new(a: Vertex<i64>, b: Vertex<i64>) -> Self {
        let (a, b) = if (b.y, b.x) < (a.y, a.x) { (b, a) } else { (a, b) };
        let dx = (b.x - a.x).abs();
        let dy = b.y - a.y;
        Self { x: a.x, y: a.y,
               dx, dy,
               sx: if a.x < b.x { 1 } else { -1 },
               step: 0,
               last: dx.max(dy),
        }
    }
    /// Keep only the steps whose major axis coordinate lies in `r`
    ///
    /// Pixels outside of `r` along the minor axis are still produced.
    pub fn clip(mut self, r: Rectangle<i64>) -> Self {
        let (lo, hi) = if self.dx >= self.dy {
            if self.sx > 0 {
                (r.x1 - self.x, r.x2 - self.x)
            } else {
                (self.x - r.x2, self.x - r.x1)
            }
        } else {
            (r.y1 - self.y, r.y2 - self.y)
        };
        self.step = self.step.max(lo);
        self.last = self.last.min(hi);
        self
    }
    /// Pixel at `step` along the major axis
    fn pixel(&self, step: i64) -> (i64, i64) {
        if self.dx >= self.dy {
            (self.x + self.sx * step, self.y + minor_offset(step, self.dy, self.dx))
        } else {
            (self.x + self.sx * minor_offset(step, self.dx, self.dy), self.y + step)
        }
    }
}

/// Minor axis offset after `step` steps: floor((2 step minor + major) / (2 major))
fn minor_offset(step: i64, minor: i64, major: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let num = 2 * i128::from(step) * i128::from(minor) + i128::from(major);
    (num / (2 * i128::from(major))) as i64
}

impl Iterator for LineInterpolator {
    type Item = (i64, i64);
    fn next(&mut self) -> Option<(i64, i64)> {
        if self.step > self.last {
            return None;
        }
        let p = self.pixel(self.step);
        self.step += 1;
        Some(p)
    }
}
