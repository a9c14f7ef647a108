
extern crate roimask;

use std::cell::RefCell;
use std::collections::HashMap;

use roimask::{Conversion, Error, LabelMask, MaskWriter, Outcome, Pipeline, Polygon,
              RasterShape, Result, RoiSource, ShapeProvider, Skip};

struct Shapes(HashMap<&'static str, RasterShape>);

impl ShapeProvider<str> for Shapes {
    fn shape_of(&self, image: &str) -> Result<RasterShape> {
        self.0.get(image).cloned().ok_or_else(|| Error::ShapeUnavailable {
            image: image.to_string(),
            reason: "unreadable".to_string(),
        })
    }
}

struct Rois(HashMap<&'static str, Vec<Polygon>>);

impl RoiSource<str> for Rois {
    fn rois_for(&self, image: &str) -> Result<Option<Vec<Polygon>>> {
        Ok(self.0.get(image).cloned())
    }
}

#[derive(Default)]
struct Recorder {
    written: RefCell<Vec<(String, LabelMask)>>,
}

impl MaskWriter<str> for Recorder {
    fn write(&self, image: &str, mask: &LabelMask) -> Result<()> {
        self.written.borrow_mut().push((image.to_string(), mask.clone()));
        Ok(())
    }
}

fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> Polygon {
    Polygon::from_xy(&[(x1,y1), (x1,y2), (x2,y2), (x2,y1)])
}

fn pipeline() -> Pipeline<Shapes, Rois, Recorder> {
    let mut shapes = HashMap::new();
    shapes.insert("a", RasterShape::new(10,10));
    shapes.insert("b", RasterShape::new(4,4));
    shapes.insert("x", RasterShape::new(4,4));
    let mut rois = HashMap::new();
    rois.insert("a", vec![square(2.,2.,6.,6.), square(4.,4.,8.,8.)]);
    rois.insert("b", vec![]);
    rois.insert("broken", vec![square(0.,0.,1.,1.)]);
    Pipeline::new(Shapes(shapes), Rois(rois), Recorder::default())
}

#[test]
fn writes_composited_mask() {
    let p = pipeline();
    let outcome = p.process("a").unwrap();
    assert_eq!(outcome, Outcome::Written { rois: 2, shape: RasterShape::new(10,10) });
    let written = p.writer.written.borrow();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].0, "a");
    assert_eq!(written[0].1.labels(), vec![1, 2]);
    assert_eq!(written[0].1[(5,5)], 2);
}

#[test]
fn missing_rois_are_skipped_without_writing() {
    let p = pipeline();
    assert_eq!(p.process("x").unwrap(), Outcome::Skipped(Skip::MissingRois));
    assert!(p.writer.written.borrow().is_empty());
    assert_eq!(p.convert("x").unwrap(), Conversion::Skipped(Skip::MissingRois));
}

#[test]
fn skip_does_not_need_a_shape() {
    // "nothing" has neither a shape nor rois; the skip wins
    let p = pipeline();
    assert_eq!(p.process("nothing").unwrap(), Outcome::Skipped(Skip::MissingRois));
}

#[test]
fn empty_collection_still_writes_background() {
    let p = pipeline();
    assert_eq!(p.process("b").unwrap(), Outcome::Written { rois: 0, shape: RasterShape::new(4,4) });
    let written = p.writer.written.borrow();
    assert_eq!(written[0].1, LabelMask::new(RasterShape::new(4,4)));
}

#[test]
fn shape_failure_propagates() {
    let p = pipeline();
    match p.process("broken") {
        Err(Error::ShapeUnavailable { image, .. }) => assert_eq!(image, "broken"),
        other => panic!("expected ShapeUnavailable, got {:?}", other),
    }
    assert!(p.writer.written.borrow().is_empty());
}

#[test]
fn conversion_is_repeatable() {
    let p = pipeline();
    let a = p.convert("a").unwrap();
    let b = p.convert("a").unwrap();
    assert_eq!(a, b);
    assert!(p.writer.written.borrow().is_empty());
}
