//! Batch conversion of a folder

use std::fmt;
use std::path::{Path, PathBuf};

use log::{error, info};
use rayon::prelude::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::io::{ArchiveRoiSource, FileMaskWriter, FileShapeProvider};
use crate::pipeline::{MaskWriter, Outcome, Pipeline, RoiSource, ShapeProvider};

/// Pipeline over image files
pub type FilePipeline = Pipeline<FileShapeProvider, ArchiveRoiSource, FileMaskWriter>;

impl FilePipeline {
    /// File collaborators following the layout of `config`
    pub fn from_config(config: &Config) -> Self {
        Pipeline::new(FileShapeProvider, ArchiveRoiSource::new(config), FileMaskWriter::new(config))
    }
}

/// Input images of a folder, sorted by path
///
/// See [Config::is_image]
pub fn discover<P: AsRef<Path>>(folder: P, config: &Config) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if ! folder.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("the folder '{}' does not exist", folder.display()))));
    }
    let mut images = vec![];
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && config.is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Counts of a batch run
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct BatchReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
    fn add(mut self, other: BatchReport) -> Self {
        self.written += other.written;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} written, {} skipped, {} failed", self.written, self.skipped, self.failed)
    }
}

/// Process every image on a worker pool
///
/// Images are independent; a failing image is logged and counted and
/// never stops the others. `workers` of `None` uses one per core.
pub fn run<I, S, R, W>(pipeline: &Pipeline<S, R, W>, images: &[I], workers: Option<usize>) -> Result<BatchReport>
    where I: AsRef<Path> + Sync,
          S: ShapeProvider<Path> + Sync,
          R: RoiSource<Path> + Sync,
          W: MaskWriter<Path> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.unwrap_or(0))
        .build()?;

    let report = pool.install(|| {
        images.par_iter()
            .map(|image| {
                let image = image.as_ref();
                info!("processing {}", image.display());
                match pipeline.process(image) {
                    Ok(Outcome::Written { .. }) => BatchReport { written: 1, ..Default::default() },
                    Ok(Outcome::Skipped(_)) => BatchReport { skipped: 1, ..Default::default() },
                    Err(e) => {
                        error!("{}: {}", image.display(), e);
                        BatchReport { failed: 1, ..Default::default() }
                    }
                }
            })
            .reduce(BatchReport::default, BatchReport::add)
    });
    info!("batch done: {}", report);
    Ok(report)
}
