// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use mittools_core::{ResizeFilter, ToolkitConfig};
use mittools_image::{find_images, hash_file, plan_outputs, scale_down, sha256_scale as hash_and_scale};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct ScaleArgs {
    pub input: PathBuf,
    pub output: PathBuf,

    /// Scale factor applied to both dimensions.
    #[arg(long, default_value_t = 0.5)]
    pub scale: f32,

    /// Resampling filter (lanczos3, catmullrom, gaussian, nearest, triangle).
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args, Debug)]
pub struct FindArgs {
    pub root: PathBuf,

    /// Extension to match; repeatable. Defaults to the configured list.
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
}

#[derive(Args, Debug)]
pub struct BatchScaleArgs {
    pub root: PathBuf,

    /// Output directory, or output file for a single image. Defaults to
    /// `<root>-output` next to the root.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 0.5)]
    pub scale: f32,

    #[arg(long)]
    pub filter: Option<String>,

    /// Replace the extension of every output, e.g. "png".
    #[arg(long)]
    pub ending: Option<String>,

    #[arg(long = "ext")]
    pub extensions: Vec<String>,
}

fn filter(config: &ToolkitConfig, requested: Option<&str>) -> Result<ResizeFilter> {
    match requested {
        Some(name) => Ok(name.parse()?),
        None => Ok(config.image.default_filter),
    }
}

fn extensions<'a>(config: &'a ToolkitConfig, requested: &'a [String]) -> Vec<&'a str> {
    let list = if requested.is_empty() {
        config.image.extensions.as_slice()
    } else {
        requested
    };
    list.iter().map(String::as_str).collect()
}

pub fn scale(config: &ToolkitConfig, args: &ScaleArgs) -> Result<()> {
    let filter = filter(config, args.filter.as_deref())?;
    scale_down(&args.input, &args.output, filter, args.scale)
        .with_context(|| format!("scaling {}", args.input.display()))?;
    info!(input = %args.input.display(), output = %args.output.display(), "Image scaled");
    println!("{}", args.output.display());
    Ok(())
}

pub fn sha256(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let digest = hash_file(file).with_context(|| format!("hashing {}", file.display()))?;
        println!("{digest}  {}", file.display());
    }
    Ok(())
}

pub fn sha256_scale(config: &ToolkitConfig, args: &ScaleArgs) -> Result<()> {
    let filter = filter(config, args.filter.as_deref())?;
    let digest = hash_and_scale(&args.input, &args.output, filter, args.scale)
        .with_context(|| format!("hashing and scaling {}", args.input.display()))?;
    println!("{}  {}", hex::encode(&digest), args.input.display());
    Ok(())
}

pub fn find(config: &ToolkitConfig, args: &FindArgs) -> Result<()> {
    for path in find_files(config, &args.root, &args.extensions)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn find_files(config: &ToolkitConfig, root: &Path, requested: &[String]) -> Result<Vec<PathBuf>> {
    let exts = extensions(config, requested);
    let found = find_images(root, &exts).with_context(|| format!("searching {}", root.display()))?;
    info!(root = %root.display(), count = found.len(), "Images found");
    Ok(found)
}

/// Scale every planned job; returns how many images were written.
pub fn run_batch(config: &ToolkitConfig, args: &BatchScaleArgs) -> Result<usize> {
    if !args.root.exists() {
        bail!("{} does not exist", args.root.display());
    }
    let filter = filter(config, args.filter.as_deref())?;
    let exts = extensions(config, &args.extensions);
    let jobs = plan_outputs(&args.root, args.output_dir.as_deref(), &exts, args.ending.as_deref())?;

    let mut written = 0;
    for job in &jobs {
        match scale_down(&job.input, &job.output, filter, args.scale) {
            Ok(()) => {
                written += 1;
                info!(input = %job.input.display(), output = %job.output.display(), "Scaled");
            }
            Err(err) => warn!(input = %job.input.display(), error = %err, "Skipping image"),
        }
    }
    Ok(written)
}

pub fn batch_scale(config: &ToolkitConfig, args: &BatchScaleArgs) -> Result<()> {
    let written = run_batch(config, args)?;
    println!("{written} image(s) written");
    Ok(())
}
