//! ROI polygons to labeled masks
//!
//! How does this work
//!    pipeline = Pipeline( ShapeProvider, RoiSource, MaskWriter )
//!    pipeline.process(image)
//!      rois_for(image)           -- None: skipped, nothing written
//!      shape_of(image)
//!      compose(shape, rois)
//!        for roi i: rasterize(roi, shape, i+1)
//!          scanlines()           -- even-odd interior + closed boundary
//!          fill_hline()
//!        overwrite_from()        -- later ROIs win on overlap
//!      write(image, mask)
//!
//! # Example
//!
//!     use roimask::{compose, Polygon, RasterShape};
//!
//!     let rois = vec![
//!         Polygon::from_xy(&[(2.,2.), (2.,6.), (6.,6.), (6.,2.)]),
//!         Polygon::from_xy(&[(4.,4.), (4.,8.), (8.,8.), (8.,4.)]),
//!     ];
//!     let mask = compose(RasterShape::new(10,10), &rois).unwrap();
//!     assert_eq!(mask[(2,2)], 1);
//!     assert_eq!(mask[(5,5)], 2);
//!     assert_eq!(mask[(9,9)], 0);
//!

pub mod error;
pub mod buffer;
pub mod polygon;
mod line;
mod scan;
pub mod raster;
pub mod compose;
pub mod pipeline;
pub mod imagej;
pub mod config;
pub mod io;
pub mod batch;

pub use error::*;
pub use buffer::*;
pub use polygon::*;
pub use raster::*;
pub use compose::*;
pub use pipeline::*;
pub use config::*;
pub use io::*;
pub use batch::*;
