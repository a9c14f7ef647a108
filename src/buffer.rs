//! Label buffer

use std::fmt;
use std::ops::Index;

use crate::error::{Error, Result};

/// Label value; 0 is background
pub type Label = u16;

/// Background value of a [LabelMask]
pub const BACKGROUND: Label = 0;

/// Largest label a [LabelMask] can hold
pub const MAX_LABEL: Label = Label::MAX;

/// Dimensions of the target pixel grid
///
/// Data is `planes` stacked `height` x `width` grids, e.g. the pages
/// of a multi-page TIFF. Single images have one plane.
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash)]
pub struct RasterShape {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Number of stacked planes, at least 1
    pub planes: usize,
}

impl RasterShape {
    /// Single plane of width x height
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, planes: 1 }
    }
    /// Stack of planes, each width x height
    ///
    /// A plane count of 0 is treated as 1
    pub fn with_planes(width: usize, height: usize, planes: usize) -> Self {
        Self { width, height, planes: planes.max(1) }
    }
    /// Pixels in one plane
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }
    /// Pixels in all planes
    pub fn len(&self) -> usize {
        self.plane_len() * self.planes
    }
    /// True if there are no pixels at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Check if (x,y) lies on the grid
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

impl fmt::Display for RasterShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.planes == 1 {
            write!(f, "{}x{}", self.width, self.height)
        } else {
            write!(f, "{}x{}x{}", self.width, self.height, self.planes)
        }
    }
}

/// Labeled raster
///
/// Data is stored as row-major order (C-format), plane after plane.
/// Values are [BACKGROUND] or the label of the ROI owning the pixel.
/// Outside of the crate the mask is read-only.
///
///     use roimask::{LabelMask, RasterShape};
///
///     let mask = LabelMask::new(RasterShape::new(3,2));
///     assert_eq!(mask.shape().len(), 6);
///     assert_eq!(mask[(2,1)], 0);
///     assert!(mask.labels().is_empty());
///
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct LabelMask {
    shape: RasterShape,
    data: Vec<Label>,
}

impl LabelMask {
    /// Create an all background mask
    pub fn new(shape: RasterShape) -> Self {
        Self { shape, data: vec![BACKGROUND; shape.len()] }
    }
    /// Wrap existing values, which must match the shape
    pub fn from_raw(shape: RasterShape, data: Vec<Label>) -> Result<Self> {
        if data.len() != shape.len() {
            return Err(Error::ShapeMismatch { len: data.len(), shape });
        }
        Ok(Self { shape, data })
    }
    /// Shape of the mask
    pub fn shape(&self) -> RasterShape {
        self.shape
    }
    /// Label at (x,y) of plane `z`
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<Label> {
        if x >= self.shape.width || y >= self.shape.height || z >= self.shape.planes {
            return None;
        }
        Some(self.data[self.offset(x, y, z)])
    }
    /// All values
    pub fn as_slice(&self) -> &[Label] {
        &self.data
    }
    /// Values of plane `z`
    pub fn plane(&self, z: usize) -> &[Label] {
        let n = self.shape.plane_len();
        &self.data[z * n .. (z + 1) * n]
    }
    /// Consume the mask, returning the values
    pub fn into_raw(self) -> Vec<Label> {
        self.data
    }
    /// Sorted, distinct nonzero labels present in the mask
    pub fn labels(&self) -> Vec<Label> {
        let mut seen = vec![false; usize::from(MAX_LABEL) + 1];
        for &v in &self.data {
            seen[usize::from(v)] = true;
        }
        seen.iter().enumerate().skip(1)
            .filter(|(_, hit)| **hit)
            .map(|(v, _)| v as Label)
            .collect()
    }
    /// Number of pixels carrying `label`
    pub fn count(&self, label: Label) -> usize {
        self.data.iter().filter(|&&v| v == label).count()
    }

    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.shape.height + y) * self.shape.width + x
    }
    /// Set a horizontal run of pixels in every plane
    ///
    /// `x1` and `x2` are inclusive and must lie on the grid
    pub(crate) fn fill_hline(&mut self, x1: usize, x2: usize, y: usize, label: Label) {
        debug_assert!(x1 <= x2 && x2 < self.shape.width && y < self.shape.height);
        for z in 0 .. self.shape.planes {
            let row = self.offset(0, y, z);
            self.data[row + x1 ..= row + x2].iter_mut().for_each(|v| *v = label);
        }
    }
    /// Overwrite every pixel where `other` is nonzero with `label`
    pub(crate) fn overwrite_from(&mut self, other: &LabelMask, label: Label) {
        debug_assert_eq!(self.shape, other.shape);
        for (dst, &src) in self.data.iter_mut().zip(other.data.iter()) {
            if src != BACKGROUND {
                *dst = label;
            }
        }
    }
}

impl Index<(usize,usize)> for LabelMask {
    type Output = Label;
    /// Label at (x,y) of the first plane
    fn index(&self, index: (usize, usize)) -> &Label {
        assert!(index.0 < self.shape.width, "request {} >= {} width :: index", index.0, self.shape.width);
        assert!(index.1 < self.shape.height, "request {} >= {} height :: index", index.1, self.shape.height);
        &self.data[self.offset(index.0, index.1, 0)]
    }
}
