//! Image files
//!
//! File backed collaborators of a [Pipeline](crate::Pipeline), keyed by
//! image path.

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;

use log::debug;
use tiff::decoder::Decoder;
use tiff::encoder::{colortype, TiffEncoder};

use crate::buffer::{LabelMask, RasterShape};
use crate::config::{Config, MaskFormat};
use crate::error::{Error, Result};
use crate::imagej;
use crate::pipeline::{MaskWriter, RoiSource, ShapeProvider};
use crate::polygon::Polygon;

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

/// Width, height and page count of a TIFF
///
/// Every page must have the dimensions of the first.
pub fn tiff_shape<P: AsRef<Path>>(path: P) -> Result<RasterShape> {
    let path = path.as_ref();
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let (w, h) = decoder.dimensions()?;
    let mut planes = 1;
    while decoder.more_images() {
        decoder.next_image()?;
        let dims = decoder.dimensions()?;
        if dims != (w, h) {
            return Err(Error::UnsupportedFormat(
                format!("{}: page {} is {}x{}, first page is {}x{}",
                        path.display(), planes, dims.0, dims.1, w, h)));
        }
        planes += 1;
    }
    Ok(RasterShape::with_planes(w as usize, h as usize, planes))
}

/// Raster shape of an image file
///
/// TIFF pages become planes; other formats have a single plane.
#[derive(Debug,Default,Copy,Clone)]
pub struct FileShapeProvider;

impl ShapeProvider<Path> for FileShapeProvider {
    fn shape_of(&self, path: &Path) -> Result<RasterShape> {
        let shape = if is_tiff(path) {
            tiff_shape(path)
        } else {
            image::image_dimensions(path)
                .map(|(w, h)| RasterShape::new(w as usize, h as usize))
                .map_err(Error::from)
        };
        let shape = shape.map_err(|e| Error::ShapeUnavailable {
            image: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("{}: shape {}", path.display(), shape);
        Ok(shape)
    }
}

/// ROI collections stored in ImageJ archives next to the images
///
/// The archive location comes from [Config::roi_archive_for]; a missing
/// archive means the image has no ROI collection.
#[derive(Debug,Clone)]
pub struct ArchiveRoiSource {
    config: Config,
}

impl ArchiveRoiSource {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }
}

impl RoiSource<Path> for ArchiveRoiSource {
    fn rois_for(&self, image: &Path) -> Result<Option<Vec<Polygon>>> {
        let archive = self.config.roi_archive_for(image);
        if ! archive.is_file() {
            debug!("roi archive not found: {}", archive.display());
            return Ok(None);
        }
        imagej::read_archive(&archive).map(Some)
    }
}

/// Write a mask as 16-bit grayscale TIFF, one page per plane
pub fn write_tiff<P: AsRef<Path>>(mask: &LabelMask, path: P) -> Result<()> {
    let shape = mask.shape();
    let mut tiff = TiffEncoder::new(BufWriter::new(File::create(path)?))?;
    for z in 0 .. shape.planes {
        tiff.write_image::<colortype::Gray16>(shape.width as u32, shape.height as u32, mask.plane(z))?;
    }
    Ok(())
}

/// Write a single plane mask as 16-bit grayscale PNG
pub fn write_png<P: AsRef<Path>>(mask: &LabelMask, path: P) -> Result<()> {
    let shape = mask.shape();
    if shape.planes != 1 {
        return Err(Error::UnsupportedFormat(format!("png cannot hold {} planes", shape.planes)));
    }
    let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
        shape.width as u32, shape.height as u32, mask.plane(0).to_vec())
        .ok_or(Error::ShapeMismatch { len: shape.len(), shape })?;
    img.save(path)?;
    Ok(())
}

/// Read a mask written by [write_tiff]
pub fn read_tiff<P: AsRef<Path>>(path: P) -> Result<LabelMask> {
    let path = path.as_ref();
    let shape = tiff_shape(path)?;
    let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
    let mut data = Vec::with_capacity(shape.len());
    for z in 0 .. shape.planes {
        if z > 0 {
            decoder.next_image()?;
        }
        match decoder.read_image()? {
            tiff::decoder::DecodingResult::U16(v) => data.extend(v),
            _ => return Err(Error::UnsupportedFormat(format!("{}: not a 16-bit mask", path.display()))),
        }
    }
    LabelMask::from_raw(shape, data)
}

/// Masks written next to their images
///
/// File name from [Config::mask_path_for], container from
/// [Config::mask_format].
#[derive(Debug,Clone)]
pub struct FileMaskWriter {
    config: Config,
}

impl FileMaskWriter {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }
}

impl MaskWriter<Path> for FileMaskWriter {
    fn write(&self, image: &Path, mask: &LabelMask) -> Result<()> {
        let out = self.config.mask_path_for(image);
        match self.config.mask_format {
            MaskFormat::Tiff => write_tiff(mask, &out)?,
            MaskFormat::Png => write_png(mask, &out)?,
        }
        debug!("mask saved to {}", out.display());
        Ok(())
    }
}
