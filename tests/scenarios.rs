
extern crate roimask;

use roimask::{compose, rasterize, Label, LabelMask, Polygon, RasterShape};

fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Polygon {
    Polygon::from_xy(&[(x1,y1), (x1,y2), (x2,y2), (x2,y1)])
}

fn inside(x: usize, y: usize, x1: usize, y1: usize, x2: usize, y2: usize) -> bool {
    x >= x1 && x <= x2 && y >= y1 && y <= y2
}

#[test]
fn two_overlapping_squares() {
    let rois = vec![square(2.,2.,6.,6.), square(4.,4.,8.,8.)];
    let mask = compose(RasterShape::new(10,10), &rois).unwrap();
    for y in 0 .. 10 {
        for x in 0 .. 10 {
            let expected = if inside(x,y, 4,4,8,8) {
                2
            } else if inside(x,y, 2,2,6,6) {
                1
            } else {
                0
            };
            assert_eq!(mask[(x,y)], expected, "pixel ({},{})", x, y);
        }
    }
    assert_eq!(mask.count(1), 25 - 9);
    assert_eq!(mask.count(2), 25);
}

#[test]
fn later_roi_wins_regardless_of_size() {
    let shape = RasterShape::new(12,12);
    let big = square(0.,0.,11.,11.);
    let small = square(3.,3.,5.,5.);
    let m = compose(shape, &[small.clone(), big.clone()]).unwrap();
    assert_eq!(m.labels(), vec![2]);
    let m = compose(shape, &[big, small]).unwrap();
    assert_eq!(m[(4,4)], 2);
    assert_eq!(m[(0,0)], 1);
}

#[test]
fn empty_collection_is_background() {
    let shape = RasterShape::with_planes(7,5,2);
    let mask = compose(shape, &[]).unwrap();
    assert_eq!(mask.shape(), shape);
    assert_eq!(mask, LabelMask::new(shape));
}

#[test]
fn degenerate_roi_keeps_its_label() {
    let rois = vec![Polygon::new(),
                    Polygon::from_xy(&[(1.,1.), (3.,3.)]),
                    square(1.,1.,2.,2.)];
    let mask = compose(RasterShape::new(4,4), &rois).unwrap();
    assert_eq!(mask.labels(), vec![3]);
    assert_eq!(mask.count(3), 4);
}

#[test]
fn label_gap_only_when_fully_covered() {
    let rois = vec![square(1.,1.,2.,2.), square(5.,5.,6.,6.), square(0.,0.,3.,3.)];
    let mask = compose(RasterShape::new(8,8), &rois).unwrap();
    assert_eq!(mask.labels(), vec![2, 3]);
}

#[test]
fn shape_and_label_range() {
    let shapes = [RasterShape::new(1,1), RasterShape::new(13,7), RasterShape::with_planes(9,11,3)];
    let rois = vec![
        Polygon::from_xy(&[(-3.,-3.), (4.2,0.), (2.,6.7)]),
        Polygon::from_xy(&[(8.,1.), (12.,9.), (3.5,4.5), (10.,3.)]),
        square(6.,6.,30.,30.),
        Polygon::new(),
    ];
    for &shape in &shapes {
        let mask = compose(shape, &rois).unwrap();
        assert_eq!(mask.shape(), shape);
        assert_eq!(mask.as_slice().len(), shape.len());
        assert!(mask.labels().iter().all(|&l| l >= 1 && usize::from(l) <= rois.len()));
    }
}

#[test]
fn composition_is_deterministic() {
    let shape = RasterShape::new(32,24);
    let rois = vec![
        Polygon::from_xy(&[(1.5,2.5), (20.,3.), (25.5,20.), (3.,18.)]),
        Polygon::from_xy(&[(10.,0.), (16.,20.), (0.,7.), (20.,7.), (4.,20.)]),
        square(12.,8.,30.,23.),
    ];
    let a = compose(shape, &rois).unwrap();
    let b = compose(shape, &rois).unwrap();
    assert_eq!(a.as_slice(), b.as_slice());
}

#[test]
fn composition_matches_layered_rasters() {
    let shape = RasterShape::new(16,16);
    let rois = vec![square(0.,0.,9.,9.), Polygon::from_xy(&[(4.,4.), (15.,6.), (7.,15.)])];
    let mask = compose(shape, &rois).unwrap();
    let layers : Vec<LabelMask> = rois.iter().enumerate()
        .map(|(i, p)| rasterize(p, shape, (i + 1) as Label))
        .collect();
    for y in 0 .. 16 {
        for x in 0 .. 16 {
            let expected = layers.iter().rev().map(|l| l[(x,y)]).find(|&v| v != 0).unwrap_or(0);
            assert_eq!(mask[(x,y)], expected);
        }
    }
}

#[test]
fn distant_and_negative_vertices() {
    let shape = RasterShape::new(10,10);
    let rois = vec![
        Polygon::from_xy(&[(0.,0.), (4e9,0.), (0.,4e9)]),
        square(2.,2.,4.,4.),
        Polygon::from_xy(&[(-1e12,-1e12), (-1e12,1e12), (-5e11,0.)]),
        Polygon::from_xy(&[(-1e12,7.), (1e12,7.), (1e12,9.), (-1e12,9.)]),
    ];
    let mask = compose(shape, &rois).unwrap();
    assert_eq!(mask.shape(), shape);
    assert_eq!(mask.labels(), vec![1, 2, 4]);
    assert_eq!(mask.count(2), 9);
    assert_eq!(mask.count(4), 30);
    assert_eq!(mask.count(1), 100 - 9 - 30);
}
