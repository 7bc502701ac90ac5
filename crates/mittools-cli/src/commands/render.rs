// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use mittools_core::{Alignment, Color, ExportTarget, Rect, ToolkitConfig};
use mittools_render::{Renderer, Scene};
use tracing::info;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Scene file (TOML) with style, background, and text blocks.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Background image, replacing the scene's.
    #[arg(long)]
    pub background: Option<PathBuf>,

    /// Format token such as "pdf", "png true", or "svg false". Defaults to
    /// the output extension with the background included.
    #[arg(long)]
    pub format: Option<String>,

    /// Font style when no scene is given, e.g. "serif bold".
    #[arg(long, default_value = "sans")]
    pub style: String,

    /// Lay text out in vertical columns when no scene is given.
    #[arg(long)]
    pub vertical: bool,

    /// Extra text block.
    #[arg(long)]
    pub text: Option<String>,

    /// Rectangle of the extra block as "x,y,width,height". Defaults to the
    /// whole canvas.
    #[arg(long)]
    pub rect: Option<String>,

    #[arg(long, default_value_t = 24.0)]
    pub font_size: f32,

    /// Alignment of the extra block, e.g. "center" or "bottom right".
    #[arg(long, default_value = "center")]
    pub align: String,

    #[arg(long, default_value = "black")]
    pub color: String,

    /// Fill colour drawn behind the extra block.
    #[arg(long)]
    pub fill: Option<String>,

    /// Output width; scales the whole composition. Requires --height.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Output height. Requires --width.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
}

fn parse_rect(raw: &str) -> Result<Rect> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("rectangle {raw:?}"))?;
    match values.as_slice() {
        [x, y, w, h] => Ok(Rect::new(*x, *y, *w, *h)),
        _ => bail!("rectangle needs four comma-separated numbers, got {raw:?}"),
    }
}

/// The export target from `--format`, or from the output extension.
pub fn export_target(args: &RenderArgs) -> Result<ExportTarget> {
    if let Some(token) = &args.format {
        return Ok(token.parse()?);
    }
    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("cannot tell the format of {}; pass --format", args.output.display()))?;
    Ok(ext.parse()?)
}

pub fn build_renderer(config: &ToolkitConfig, args: &RenderArgs) -> Result<Renderer> {
    let mut renderer = match &args.scene {
        Some(path) => {
            let scene = Scene::load(path).with_context(|| format!("scene {}", path.display()))?;
            Renderer::from_scene(&scene, config.render.clone())?
        }
        None => Renderer::new(&args.style, args.vertical)?.with_config(config.render.clone()),
    };

    if let Some(path) = &args.background {
        renderer
            .set_background_file(path)
            .with_context(|| format!("background {}", path.display()))?;
    }

    if let Some(text) = &args.text {
        let rect = match &args.rect {
            Some(raw) => parse_rect(raw)?,
            None => {
                let (w, h) = renderer.canvas_size(size(args))?;
                Rect::new(0.0, 0.0, w as f32, h as f32)
            }
        };
        let alignment: Alignment = args.align.parse()?;
        let foreground: Color = args.color.parse()?;
        let fill = args.fill.as_deref().map(str::parse::<Color>).transpose()?;
        renderer.add_text(
            text.as_str(),
            rect,
            args.font_size,
            alignment,
            (foreground, fill),
            fill.is_some(),
        )?;
    }
    Ok(renderer)
}

fn size(args: &RenderArgs) -> Option<(u32, u32)> {
    args.width.zip(args.height)
}

pub fn run(config: &ToolkitConfig, args: &RenderArgs) -> Result<()> {
    let target = export_target(args)?;
    let renderer = build_renderer(config, args)?;
    renderer
        .export(&args.output, target, size(args))
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        output = %args.output.display(),
        format = target.format.extension(),
        blocks = renderer.blocks().len(),
        "Render command done"
    );
    println!("{}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mittools_core::OutputFormat;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse(argv: &[&str]) -> RenderArgs {
        let mut full = vec!["render"];
        full.extend_from_slice(argv);
        Wrapper::try_parse_from(full).unwrap().args
    }

    #[test]
    fn format_from_extension_or_token() {
        let target = export_target(&parse(&["-o", "page.PDF"])).unwrap();
        assert_eq!(target.format, OutputFormat::Pdf);
        assert!(target.with_background);

        let target = export_target(&parse(&["-o", "page.out", "--format", "svg false"])).unwrap();
        assert_eq!(target.format, OutputFormat::Svg);
        assert!(!target.with_background);

        assert!(export_target(&parse(&["-o", "page"])).is_err());
    }

    #[test]
    fn rect_parsing() {
        assert_eq!(parse_rect("1, 2,30,40").unwrap(), Rect::new(1.0, 2.0, 30.0, 40.0));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }

    #[test]
    fn width_needs_height() {
        assert!(Wrapper::try_parse_from(["render", "-o", "x.png", "--width", "10"]).is_err());
    }

    #[test]
    fn text_without_canvas_needs_a_size() {
        let config = ToolkitConfig::default();
        assert!(build_renderer(&config, &parse(&["-o", "x.svg", "--text", "Hi"])).is_err());

        let args = parse(&[
            "-o", "x.svg", "--text", "Hi", "--width", "200", "--height", "100", "--fill", "#ffff00",
        ]);
        let renderer = build_renderer(&config, &args).unwrap();
        assert_eq!(renderer.blocks().len(), 1);
        assert_eq!(renderer.blocks()[0].rect, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(renderer.blocks()[0].draw_background);
    }

    #[test]
    fn exports_svg_over_background() {
        let dir = tempfile::tempdir().unwrap();
        let bg = dir.path().join("bg.png");
        image::RgbImage::from_pixel(40, 20, image::Rgb([10, 20, 30]))
            .save(&bg)
            .unwrap();
        let out = dir.path().join("page.svg");
        let args = parse(&[
            "-o",
            out.to_str().unwrap(),
            "--background",
            bg.to_str().unwrap(),
            "--text",
            "Hallo",
            "--font-size",
            "8",
        ]);
        run(&ToolkitConfig::default(), &args).unwrap();

        let markup = std::fs::read_to_string(&out).unwrap();
        assert!(markup.contains("Hallo"));
        assert!(markup.contains("page.background.png"));
        assert!(dir.path().join("page.background.png").exists());
    }
}
