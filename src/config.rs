//! Configuration
//!
//! File layout conventions of a conversion run, loaded from YAML.
//! Every field is optional:
//!
//! ```yaml
//! roi_archive: results/{stem}/ROIs/ROIs_Podosomes.zip
//! mask_suffix: _segrun
//! mask_format: tiff
//! extensions: [tif, tiff]
//! workers: 4
//! log_level: info
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Placeholder for the image file stem in [Config::roi_archive]
pub const STEM: &str = "{stem}";

/// Container of written masks
#[derive(Debug,Copy,Clone,PartialEq,Eq,Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskFormat {
    /// 16-bit grayscale TIFF, one page per plane
    Tiff,
    /// 16-bit grayscale PNG, single plane only
    Png,
}

impl MaskFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            MaskFormat::Tiff => "tif",
            MaskFormat::Png => "png",
        }
    }
}

impl Default for MaskFormat {
    fn default() -> MaskFormat {
        MaskFormat::Tiff
    }
}

#[derive(Debug,Clone,PartialEq,Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// ROI archive path relative to the image folder
    pub roi_archive: String,
    /// Appended to the image stem to name the mask
    pub mask_suffix: String,
    pub mask_format: MaskFormat,
    /// Image extensions picked up from a folder, case insensitive
    pub extensions: Vec<String>,
    /// Size of the worker pool, default is one per core
    pub workers: Option<usize>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roi_archive: format!("results/{}/ROIs/ROIs_Podosomes.zip", STEM),
            mask_suffix: "_segrun".to_string(),
            mask_format: MaskFormat::Tiff,
            extensions: vec!["tif".to_string()],
            workers: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML document
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(text)?)
    }
    /// Read a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
    /// ROI archive of `image`
    ///
    ///     use std::path::Path;
    ///     use roimask::Config;
    ///
    ///     let cfg = Config::default();
    ///     assert_eq!(cfg.roi_archive_for(Path::new("/data/cell1.tif")),
    ///                Path::new("/data/results/cell1/ROIs/ROIs_Podosomes.zip"));
    ///
    pub fn roi_archive_for(&self, image: &Path) -> PathBuf {
        let stem = image.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let rel = self.roi_archive.replace(STEM, &stem);
        image.parent().unwrap_or_else(|| Path::new("")).join(rel)
    }
    /// Output mask of `image`, next to the image
    ///
    ///     use std::path::Path;
    ///     use roimask::Config;
    ///
    ///     let cfg = Config::default();
    ///     assert_eq!(cfg.mask_path_for(Path::new("/data/cell1.tif")),
    ///                Path::new("/data/cell1_segrun.tif"));
    ///
    pub fn mask_path_for(&self, image: &Path) -> PathBuf {
        let stem = image.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        let name = format!("{}{}.{}", stem, self.mask_suffix, self.mask_format.extension());
        image.with_file_name(name)
    }
    /// Check if `path` is an input image: a matching extension and not
    /// a previously written mask
    pub fn is_image(&self, path: &Path) -> bool {
        let ext = match path.extension() {
            Some(e) => e.to_string_lossy(),
            None => return false,
        };
        if ! self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            return false;
        }
        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        self.mask_suffix.is_empty() || ! stem.ends_with(self.mask_suffix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("mask_suffix: _labels\nmask_format: png\nworkers: 2\n").unwrap();
        assert_eq!(cfg.mask_suffix, "_labels");
        assert_eq!(cfg.mask_format, MaskFormat::Png);
        assert_eq!(cfg.workers, Some(2));
        assert_eq!(cfg.roi_archive, Config::default().roi_archive);
        assert_eq!(cfg.mask_path_for(Path::new("a/b.tif")), Path::new("a/b_labels.png"));
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_yaml("roi_zip: x.zip\n").is_err());
    }

    #[test]
    fn image_filter() {
        let cfg = Config::default();
        assert!(cfg.is_image(Path::new("x/cell.tif")));
        assert!(cfg.is_image(Path::new("x/cell.TIF")));
        assert!(! cfg.is_image(Path::new("x/cell_segrun.tif")));
        assert!(! cfg.is_image(Path::new("x/cell.png")));
        assert!(! cfg.is_image(Path::new("x/cell")));
    }
}
