//! Conversion Pipeline
//!
//! Sequencing only: obtain the ROI collection and raster shape of an
//! image, [compose](crate::compose) them, and hand the mask to a writer.
//! Collaborators are generic over the image identifier `I`.

use std::fmt;

use log::{info, warn};

use crate::buffer::{LabelMask, RasterShape};
use crate::compose::compose;
use crate::error::Result;
use crate::polygon::Polygon;

/// Source of target raster dimensions
pub trait ShapeProvider<I: ?Sized> {
    /// Shape of `image`; failures are fatal for that image
    fn shape_of(&self, image: &I) -> Result<RasterShape>;
}

/// Source of ordered ROI collections
pub trait RoiSource<I: ?Sized> {
    /// ROIs of `image`, or `None` if it has no ROI collection
    fn rois_for(&self, image: &I) -> Result<Option<Vec<Polygon>>>;
}

/// Destination of finished masks
pub trait MaskWriter<I: ?Sized> {
    fn write(&self, image: &I, mask: &LabelMask) -> Result<()>;
}

/// Reason an image was not converted
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Skip {
    /// No ROI collection exists for the image
    MissingRois,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Skip::MissingRois => write!(f, "no roi collection found"),
        }
    }
}

/// Result of converting one image without writing it
#[derive(Debug,Clone,PartialEq)]
pub enum Conversion {
    /// Composited mask and the number of ROIs in it
    Mask { mask: LabelMask, rois: usize },
    Skipped(Skip),
}

/// Result of processing one image
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Outcome {
    /// Mask was handed to the writer
    Written { rois: usize, shape: RasterShape },
    Skipped(Skip),
}

/// Converts images with a shape provider, ROI source and mask writer
#[derive(Debug)]
pub struct Pipeline<S, R, W> {
    pub shapes: S,
    pub rois: R,
    pub writer: W,
}

impl<S, R, W> Pipeline<S, R, W> {
    pub fn new(shapes: S, rois: R, writer: W) -> Self {
        Self { shapes, rois, writer }
    }

    /// Build the mask of `image`
    ///
    /// The ROI source is asked first; without a collection the image is
    /// skipped before its shape is read.
    pub fn convert<I>(&self, image: &I) -> Result<Conversion>
        where I: fmt::Debug + ?Sized, S: ShapeProvider<I>, R: RoiSource<I>
    {
        let rois = match self.rois.rois_for(image)? {
            Some(rois) => rois,
            None => return Ok(Conversion::Skipped(Skip::MissingRois)),
        };
        let shape = self.shapes.shape_of(image)?;
        let mask = compose(shape, &rois)?;
        Ok(Conversion::Mask { mask, rois: rois.len() })
    }

    /// Build the mask of `image` and write it
    ///
    /// Skipped images are reported and never reach the writer.
    pub fn process<I>(&self, image: &I) -> Result<Outcome>
        where I: fmt::Debug + ?Sized, S: ShapeProvider<I>, R: RoiSource<I>, W: MaskWriter<I>
    {
        match self.convert(image)? {
            Conversion::Skipped(skip) => {
                warn!("skipping {:?}: {}", image, skip);
                Ok(Outcome::Skipped(skip))
            }
            Conversion::Mask { mask, rois } => {
                self.writer.write(image, &mask)?;
                info!("{:?}: {} rois -> {} mask", image, rois, mask.shape());
                Ok(Outcome::Written { rois, shape: mask.shape() })
            }
        }
    }
}
