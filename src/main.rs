//! roimask [FOLDER] [--config FILE]
//!
//! Convert the ROI archives of every image in FOLDER into labeled masks.
//! Prompts for FOLDER when it is not given.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use flexi_logger::Logger;
use log::info;

use roimask::{Config, FilePipeline};

const USAGE: &str = "usage: roimask [FOLDER] [--config FILE]";

struct Args {
    folder: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args { folder: None, config: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = it.next().with_context(|| format!("--config needs a file\n{}", USAGE))?;
                args.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ if args.folder.is_none() && ! arg.starts_with('-') => args.folder = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
        }
    }
    Ok(args)
}

fn prompt_folder() -> anyhow::Result<PathBuf> {
    print!("Please enter the folder path containing the TIFF files: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    let _logger = Logger::try_with_env_or_str(&config.log_level)?
        .start()?;

    let folder = match args.folder {
        Some(folder) => folder,
        None => prompt_folder()?,
    };
    let images = roimask::discover(&folder, &config)?;
    if images.is_empty() {
        info!("no images found in the folder '{}'", folder.display());
        return Ok(());
    }

    let pipeline = FilePipeline::from_config(&config);
    let report = roimask::run(&pipeline, &images, config.workers)?;
    println!("{}", report);
    if report.failed > 0 {
        bail!("{} of {} images failed", report.failed, report.total());
    }
    Ok(())
}
