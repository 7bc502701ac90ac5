// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mittools_core::ToolkitConfig;

use crate::commands;

#[derive(Parser, Debug)]
#[command(name = "mittools", version)]
#[command(about = "Translate text, scale images, and export text over images as PDF, PNG, or SVG")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace/debug/info/warn/error). `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a text and print the result with the elapsed time.
    Translate(commands::translate::TranslateArgs),
    /// Compose a scene or background with text and export it.
    Render(commands::render::RenderArgs),
    /// Scale one image by a factor.
    Scale(commands::image::ScaleArgs),
    /// Print the SHA-256 of files.
    Sha256 {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the SHA-256 of the original image, then write a scaled copy.
    #[command(name = "sha256-scale")]
    Sha256Scale(commands::image::ScaleArgs),
    /// List images under a directory.
    Find(commands::image::FindArgs),
    /// Scale every image under a directory into an output tree.
    #[command(name = "batch-scale")]
    BatchScale(commands::image::BatchScaleArgs),
}

pub fn init_logging(level: Option<&str>) {
    let fallback = level.unwrap_or("info");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn dispatch(args: Args) -> Result<()> {
    let config = ToolkitConfig::load_or_default(args.config.as_deref())
        .context("loading configuration")?;

    match &args.command {
        Command::Translate(cmd) => commands::translate::run(&config, cmd),
        Command::Render(cmd) => commands::render::run(&config, cmd),
        Command::Scale(cmd) => commands::image::scale(&config, cmd),
        Command::Sha256 { files } => commands::image::sha256(files),
        Command::Sha256Scale(cmd) => commands::image::sha256_scale(&config, cmd),
        Command::Find(cmd) => commands::image::find(&config, cmd),
        Command::BatchScale(cmd) => commands::image::batch_scale(&config, cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "mittools",
            "sha256",
            "a.png",
            "--log-level",
            "debug",
            "--config",
            "mit.toml",
        ])
        .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config, Some(PathBuf::from("mit.toml")));
        match args.command {
            Command::Sha256 { files } => assert_eq!(files, vec![PathBuf::from("a.png")]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn hyphenated_subcommands() {
        let args =
            Args::try_parse_from(["mittools", "sha256-scale", "in.png", "out.png", "--scale", "0.5"])
                .unwrap();
        assert!(matches!(args.command, Command::Sha256Scale(_)));
        let args = Args::try_parse_from(["mittools", "batch-scale", "pics"]).unwrap();
        assert!(matches!(args.command, Command::BatchScale(_)));
    }

    #[test]
    fn missing_config_file_fails_dispatch() {
        let args = Args::try_parse_from([
            "mittools",
            "--config",
            "/nonexistent/mittools.toml",
            "find",
            ".",
        ])
        .unwrap();
        assert!(dispatch(args).is_err());
    }
}
