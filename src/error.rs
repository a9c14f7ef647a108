//! Errors

/// Result with the crate [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a conversion
///
/// A missing ROI collection is not an error, see
/// [Skip::MissingRois](crate::Skip::MissingRois).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("tiff error: {0}")]
    Tiff(#[from] tiff::TiffError),
    #[error("roi archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yml::Error),
    /// Dimensions of the image could not be determined
    #[error("cannot determine shape of {image}: {reason}")]
    ShapeUnavailable { image: String, reason: String },
    /// ROI record could not be decoded
    #[error("invalid roi {name}: {reason}")]
    InvalidRoi { name: String, reason: String },
    /// More ROIs than a 16-bit label can distinguish
    #[error("{0} rois exceed the 65535 labels of a 16-bit mask")]
    TooManyRois(usize),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Buffer length does not match the raster shape
    #[error("buffer of {len} values does not match shape {shape}")]
    ShapeMismatch { len: usize, shape: crate::RasterShape },
}

impl Error {
    pub(crate) fn invalid_roi<S: Into<String>>(name: &str, reason: S) -> Self {
        Error::InvalidRoi { name: name.to_string(), reason: reason.into() }
    }
}
