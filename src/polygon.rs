//! Polygons

/// Vertex of a polygon
///
/// `x` is the column and `y` the row of the pixel grid
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Vertex<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vertex<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// Largest grid coordinate, 2^53
///
/// Every integer up to here is exact in an f64; further out vertices
/// are pulled in to it.
pub const GRID_LIMIT: i64 = 1 << 53;

fn grid(v: f64) -> i64 {
    let limit = GRID_LIMIT as f64;
    v.round().max(-limit).min(limit) as i64
}

impl Vertex<f64> {
    /// Map to the nearest pixel position
    ///
    /// Halves are rounded away from zero; results are limited to
    /// [-GRID_LIMIT, GRID_LIMIT]
    ///
    ///     use roimask::{Vertex, GRID_LIMIT};
    ///
    ///     assert_eq!(Vertex::new(2.5, 2.49).to_grid(), Vertex::new(3, 2));
    ///     assert_eq!(Vertex::new(-2.5, -0.4).to_grid(), Vertex::new(-3, 0));
    ///     assert_eq!(Vertex::new(1e300, -1e300).to_grid(), Vertex::new(GRID_LIMIT, -GRID_LIMIT));
    ///
    pub fn to_grid(&self) -> Vertex<i64> {
        Vertex::new(grid(self.x), grid(self.y))
    }
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rectangle, inclusive on all sides
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Rectangle<T: PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}

impl<T> Rectangle<T> where T: PartialOrd + Copy {
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2,x1) } else { (x1,x2) };
        let (y1, y2) = if y1 > y2 { (y2,y1) } else { (y1,y2) };
        Self { x1,y1,x2,y2 }
    }
    /// Expand if the point (x,y) is outside
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 { self.x1 = x; }
        if x > self.x2 { self.x2 = x; }
        if y < self.y1 { self.y1 = y; }
        if y > self.y2 { self.y2 = y; }
    }
}

/// Closed contour
///
/// The last vertex connects implicitly to the first. Polygons with
/// fewer than 3 distinct vertices, or with non-finite coordinates, are
/// degenerate and cover no pixels.
///
///     use roimask::Polygon;
///
///     let square = Polygon::from_xy(&[(2.,2.), (2.,6.), (6.,6.), (6.,2.)]);
///     assert_eq!(square.len(), 4);
///     assert!(!square.is_degenerate());
///     assert!(Polygon::new().is_degenerate());
///
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex<f64>>,
}

impl Polygon {
    /// Empty polygon
    pub fn new() -> Self {
        Self { vertices: vec![] }
    }
    /// Polygon from (x,y) pairs
    pub fn from_xy(pts: &[(f64,f64)]) -> Self {
        Self { vertices: pts.iter().map(|&(x,y)| Vertex::new(x,y)).collect() }
    }
    /// Add a vertex
    pub fn push(&mut self, x: f64, y: f64) {
        self.vertices.push( Vertex::new(x,y) );
    }
    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
    /// Check if the polygon is too malformed to cover any pixels
    pub fn is_degenerate(&self) -> bool {
        if self.vertices.iter().any(|v| ! v.is_finite()) {
            return true;
        }
        let mut distinct : Vec<Vertex<f64>> = Vec::with_capacity(3);
        for v in &self.vertices {
            if ! distinct.contains(v) {
                distinct.push(*v);
                if distinct.len() >= 3 {
                    return false;
                }
            }
        }
        true
    }
    /// Vertices mapped to the pixel grid, see [Vertex::to_grid]
    pub fn to_grid(&self) -> Vec<Vertex<i64>> {
        self.vertices.iter().map(|v| v.to_grid()).collect()
    }
    /// Edges as pairs of vertices, including the closing edge
    pub fn edges<'a, T: Copy + 'a>(pts: &'a [Vertex<T>]) -> impl Iterator<Item = (Vertex<T>, Vertex<T>)> + 'a {
        let n = pts.len();
        (0 .. n).map(move |i| (pts[i], pts[(i+1) % n]))
    }
}

impl From<Vec<Vertex<f64>>> for Polygon {
    fn from(vertices: Vec<Vertex<f64>>) -> Self {
        Self { vertices }
    }
}

/// Bounding rectangle of a set of points
pub fn bounding_rect<T: PartialOrd + Copy>(pts: &[Vertex<T>]) -> Option<Rectangle<T>> {
    let first = pts.first()?;
    let mut r = Rectangle::new(first.x, first.y, first.x, first.y);
    for p in pts {
        r.expand(p.x, p.y);
    }
    Some(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_polygons() {
        assert!(Polygon::new().is_degenerate());
        assert!(Polygon::from_xy(&[(1.,1.)]).is_degenerate());
        assert!(Polygon::from_xy(&[(1.,1.), (4.,4.)]).is_degenerate());
        // Repeated points do not count
        assert!(Polygon::from_xy(&[(1.,1.), (4.,4.), (1.,1.), (4.,4.)]).is_degenerate());
        assert!(Polygon::from_xy(&[(1.,1.), (4.,4.), (f64::NAN, 2.)]).is_degenerate());
        assert!(! Polygon::from_xy(&[(1.,1.), (4.,4.), (1.,4.)]).is_degenerate());
        // Collinear is still a polygon; its interior is just its boundary
        assert!(! Polygon::from_xy(&[(0.,0.), (1.,1.), (2.,2.)]).is_degenerate());
    }

    #[test]
    fn rounding_is_nearest_half_away_from_zero() {
        let p = Polygon::from_xy(&[(0.5, 1.5), (1.49, -1.5), (-0.5, 2.51)]);
        assert_eq!(p.to_grid(), vec![Vertex::new(1,2), Vertex::new(1,-2), Vertex::new(-1,3)]);
    }

    #[test]
    fn distant_vertices_are_limited() {
        let p = Polygon::from_xy(&[(4e9, -1e12), (1e17, -1e17), (-9.1e15, 9.0e15)]);
        assert_eq!(p.to_grid(), vec![Vertex::new(4_000_000_000, -1_000_000_000_000),
                                     Vertex::new(GRID_LIMIT, -GRID_LIMIT),
                                     Vertex::new(-GRID_LIMIT, 9_000_000_000_000_000)]);
    }

    #[test]
    fn edges_close_the_contour() {
        let pts = vec![Vertex::new(0,0), Vertex::new(1,0), Vertex::new(1,1)];
        let e : Vec<_> = Polygon::edges(&pts).collect();
        assert_eq!(e.len(), 3);
        assert_eq!(e[2], (Vertex::new(1,1), Vertex::new(0,0)));
    }

    #[test]
    fn bounds() {
        let pts = vec![Vertex::new(3,-1), Vertex::new(-2,5), Vertex::new(0,0)];
        assert_eq!(bounding_rect(&pts), Some(Rectangle::new(-2,-1,3,5)));
        assert_eq!(bounding_rect::<i64>(&[]), None);
    }
}
