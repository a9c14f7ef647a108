//! Mask Compositor

use std::convert::TryFrom;

use log::debug;

use crate::buffer::{Label, LabelMask, RasterShape};
use crate::error::{Error, Result};
use crate::polygon::Polygon;
use crate::raster::rasterize;

/// Label of the ROI at `index` in its collection
///
/// Labels start at 1 and follow collection order. Fails if the label
/// does not fit in a [Label]; [compose] rejects such collections as a
/// whole before labeling.
pub fn label_for(index: usize) -> Result<Label> {
    index.checked_add(1)
        .and_then(|v| Label::try_from(v).ok())
        .ok_or_else(|| Error::TooManyRois(index.saturating_add(1)))
}

/// Composite an ordered ROI collection into one mask
///
/// ROI `i` is rasterized with label `i + 1`, in collection order, and
/// every pixel it covers is overwritten; on overlaps the later ROI
/// wins. Degenerate ROIs keep their label but cover nothing.
///
///     use roimask::{compose, Polygon, RasterShape};
///
///     let rois = vec![
///         Polygon::from_xy(&[(0.,0.), (0.,2.), (2.,2.), (2.,0.)]),
///         Polygon::new(),
///         Polygon::from_xy(&[(2.,2.), (2.,3.), (3.,3.), (3.,2.)]),
///     ];
///     let mask = compose(RasterShape::new(4,4), &rois).unwrap();
///     assert_eq!(mask[(0,0)], 1);
///     assert_eq!(mask[(2,2)], 3);
///     assert_eq!(mask.labels(), vec![1, 3]);
///
pub fn compose(shape: RasterShape, rois: &[Polygon]) -> Result<LabelMask> {
    if rois.len() > usize::from(Label::MAX) {
        return Err(Error::TooManyRois(rois.len()));
    }
    let mut mask = LabelMask::new(shape);
    for ((i, roi), label) in rois.iter().enumerate().zip(1 ..= Label::MAX) {
        let layer = rasterize(roi, shape, label);
        mask.overwrite_from(&layer, label);
        debug!("roi {} with {} vertices -> label {}", i, roi.len(), label);
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_start_at_one() {
        assert_eq!(label_for(0).unwrap(), 1);
        assert_eq!(label_for(65534).unwrap(), 65535);
        assert!(label_for(65535).is_err());
    }

    #[test]
    fn labels_match_label_for() {
        let shape = RasterShape::new(3,1);
        let rois : Vec<Polygon> = (0 .. 3)
            .map(|x| Polygon::from_xy(&[(x as f64, 0.), (x as f64, 0.5), (x as f64 + 0.4, 0.)]))
            .collect();
        let mask = compose(shape, &rois).unwrap();
        for x in 0 .. 3 {
            assert_eq!(mask[(x,0)], label_for(x).unwrap());
        }
    }

    #[test]
    fn too_many_rois() {
        let rois = vec![Polygon::new(); 65536];
        match compose(RasterShape::new(1,1), &rois) {
            Err(Error::TooManyRois(n)) => assert_eq!(n, 65536),
            other => panic!("expected TooManyRois, got {:?}", other),
        }
    }

    #[test]
    fn max_labels_fit() {
        let mut rois = vec![Polygon::new(); 65534];
        rois.push(Polygon::from_xy(&[(0.,0.), (0.,1.), (1.,1.)]));
        let mask = compose(RasterShape::new(2,2), &rois).unwrap();
        assert_eq!(mask.labels(), vec![65535]);
    }
}
