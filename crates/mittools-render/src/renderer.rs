// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renderer — background image plus styled text blocks, exported as PDF, PNG,
// or SVG.

use std::path::Path;

use ab_glyph::FontVec;
use image::{DynamicImage, RgbImage, RgbaImage};
use mittools_core::config::RenderConfig;
use mittools_core::error::{MitToolsError, Result};
use mittools_core::{
    Alignment, Color, ExportTarget, HorizontalAlign, Orientation, OutputFormat, Rect, TextColors,
    TextStyle, VerticalAlign,
};
use mittools_image::ImageProcessor;
use tracing::{debug, info, instrument, warn};

use crate::block::TextBlock;
use crate::export::{Composition, PlacedBlock, pdf, raster, svg};
use crate::font::FontResolver;
use crate::layout::{LayoutOptions, layout_block};
use crate::metrics::{ApproxMetrics, GlyphMetrics, TextMeasure};

/// Composes text blocks over an optional background and exports the result.
pub struct Renderer {
    style: TextStyle,
    orientation: Orientation,
    config: RenderConfig,
    background: Option<RgbImage>,
    blocks: Vec<TextBlock>,
    font: Option<FontVec>,
}

impl Renderer {
    /// Create a renderer for a style identifier such as `"serif bold"`.
    /// `vertical` selects top-to-bottom columns.
    pub fn new(style: &str, vertical: bool) -> Result<Self> {
        let style: TextStyle = style.parse()?;
        debug!(%style, vertical, "Renderer created");
        Ok(Self {
            style,
            orientation: Orientation::from_vertical(vertical),
            config: RenderConfig::default(),
            background: None,
            blocks: Vec::new(),
            font: None,
        })
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `font` for raster output instead of looking one up.
    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn background(&self) -> Option<&RgbImage> {
        self.background.as_ref()
    }

    // -- Background -----------------------------------------------------------

    /// Set the background, converting it to RGB.
    pub fn set_background(&mut self, image: DynamicImage) {
        debug!(width = image.width(), height = image.height(), "Background set");
        self.background = Some(image.into_rgb8());
    }

    /// Set the background from a raw pixel buffer of 1 to 4 channels.
    pub fn set_background_raw(
        &mut self,
        width: u32,
        height: u32,
        channels: usize,
        data: &[u8],
    ) -> Result<()> {
        let image = ImageProcessor::from_raw(width, height, channels, data)?.into_rgb8();
        self.background = Some(image);
        Ok(())
    }

    pub fn set_background_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = ImageProcessor::open(path)?.into_rgb8();
        self.background = Some(image);
        Ok(())
    }

    pub fn clear_background(&mut self) {
        self.background = None;
    }

    // -- Text -----------------------------------------------------------------

    /// Add a text block. `colors` accepts a foreground colour or a
    /// `(foreground, background)` pair.
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        rect: impl Into<Rect>,
        font_size: f32,
        alignment: Alignment,
        colors: impl Into<TextColors>,
        draw_background: bool,
    ) -> Result<()> {
        let mut block = TextBlock::new(text, rect.into(), font_size);
        block.alignment = alignment;
        block.colors = colors.into();
        block.draw_background = draw_background;
        self.add_block(block)
    }

    /// Add a text block with each alignment axis and colour given separately.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text_aligned(
        &mut self,
        text: impl Into<String>,
        rect: impl Into<Rect>,
        font_size: f32,
        horizontal: HorizontalAlign,
        vertical: VerticalAlign,
        foreground: Color,
        background: Option<Color>,
        draw_background: bool,
    ) -> Result<()> {
        self.add_text(
            text,
            rect,
            font_size,
            Alignment::new(horizontal, vertical),
            (foreground, background),
            draw_background,
        )
    }

    pub fn add_block(&mut self, block: TextBlock) -> Result<()> {
        block.validate()?;
        if block.draw_background && block.colors.background.is_none() {
            warn!("Text block asks for a background fill but has no background colour");
        }
        self.blocks.push(block);
        Ok(())
    }

    pub fn clear_text(&mut self) {
        self.blocks.clear();
    }

    // -- Layout ---------------------------------------------------------------

    /// Canvas dimensions: the background size, or `requested` when there is
    /// no background.
    pub fn canvas_size(&self, requested: Option<(u32, u32)>) -> Result<(u32, u32)> {
        if let Some((w, h)) = requested {
            if w == 0 || h == 0 {
                return Err(MitToolsError::InvalidArgument(format!(
                    "output size must be non-zero, got {w}x{h}"
                )));
            }
        }
        match (&self.background, requested) {
            (Some(bg), _) => Ok(bg.dimensions()),
            (None, Some(size)) => Ok(size),
            (None, None) => Err(MitToolsError::NoCanvas),
        }
    }

    fn layout_options(&self) -> LayoutOptions {
        LayoutOptions::from(&self.config)
    }

    fn compose<'a>(
        &'a self,
        canvas: (u32, u32),
        measure: &dyn TextMeasure,
    ) -> Composition<'a> {
        let options = self.layout_options();
        let blocks = self
            .blocks
            .iter()
            .map(|block| {
                let layout = layout_block(block, self.orientation, measure, &options);
                if layout.overflow {
                    warn!(
                        text = %block.text,
                        font_size = layout.font_size,
                        "Text does not fit its rectangle"
                    );
                }
                PlacedBlock { block, layout }
            })
            .collect();
        Composition {
            width: canvas.0,
            height: canvas.1,
            background: self.background.as_ref(),
            style: &self.style,
            blocks,
        }
    }

    fn has_text(&self) -> bool {
        self.blocks.iter().any(|b| !b.text.trim().is_empty())
    }

    /// Draw the composition into an RGBA image of `size` (canvas size when
    /// `None`).
    #[instrument(skip(self))]
    pub fn render_raster(
        &self,
        size: Option<(u32, u32)>,
        with_background: bool,
    ) -> Result<RgbaImage> {
        let canvas = self.canvas_size(size)?;

        let resolved;
        let font = match &self.font {
            Some(font) => Some(font),
            None if self.has_text() => {
                resolved = FontResolver::from_config(&self.config).resolve(&self.style);
                resolved.as_ref()
            }
            None => None,
        };

        match font {
            Some(font) => {
                let metrics = GlyphMetrics::new(font);
                let comp = self.compose(canvas, &metrics);
                raster::render(&comp, Some(font), with_background, size)
            }
            None => {
                let metrics = ApproxMetrics::for_style(&self.style);
                let comp = self.compose(canvas, &metrics);
                raster::render(&comp, None, with_background, size)
            }
        }
    }

    pub fn render_png(&self, size: Option<(u32, u32)>, with_background: bool) -> Result<Vec<u8>> {
        let image = self.render_raster(size, with_background)?;
        mittools_image::processor::encode_to_format(
            &DynamicImage::ImageRgba8(image),
            image::ImageFormat::Png,
        )
    }

    #[instrument(skip(self))]
    pub fn render_pdf(&self, size: Option<(u32, u32)>, with_background: bool) -> Result<Vec<u8>> {
        let canvas = self.canvas_size(size)?;
        let metrics = ApproxMetrics::for_style(&self.style);
        let comp = self.compose(canvas, &metrics);
        pdf::render(&comp, &self.config, with_background, size)
    }

    /// SVG markup. `background_href` is the relative location of the
    /// background image; without it the background is left out.
    #[instrument(skip(self))]
    pub fn render_svg(
        &self,
        size: Option<(u32, u32)>,
        with_background: bool,
        background_href: Option<&str>,
    ) -> Result<String> {
        let canvas = self.canvas_size(size)?;
        let metrics = ApproxMetrics::for_style(&self.style);
        let comp = self.compose(canvas, &metrics);
        Ok(svg::render(&comp, with_background, size, background_href))
    }

    // -- Files ----------------------------------------------------------------

    /// Write the composition to `path`. `format_token` is the output format
    /// optionally followed by whether to include the background, e.g.
    /// `"pdf false"` or `"png true"`.
    pub fn save(&self, path: impl AsRef<Path>, format_token: &str) -> Result<()> {
        self.export(path.as_ref(), format_token.parse()?, None)
    }

    /// Like [`Renderer::save`], scaling the composition to `width` × `height`.
    pub fn save_sized(
        &self,
        path: impl AsRef<Path>,
        format_token: &str,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.export(path.as_ref(), format_token.parse()?, Some((width, height)))
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn export(
        &self,
        path: &Path,
        target: ExportTarget,
        size: Option<(u32, u32)>,
    ) -> Result<()> {
        match target.format {
            OutputFormat::Png => {
                let bytes = self.render_png(size, target.with_background)?;
                std::fs::write(path, bytes)?;
            }
            OutputFormat::Pdf => {
                let bytes = self.render_pdf(size, target.with_background)?;
                std::fs::write(path, bytes)?;
            }
            OutputFormat::Svg => {
                let href = match (&self.background, target.with_background) {
                    (Some(bg), true) => {
                        let name = svg::background_file_name(path);
                        let sidecar = path.with_file_name(&name);
                        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(bg.clone()))
                            .save(&sidecar)?;
                        debug!(sidecar = %sidecar.display(), "Wrote SVG background");
                        Some(name)
                    }
                    _ => None,
                };
                let markup = self.render_svg(size, target.with_background, href.as_deref())?;
                std::fs::write(path, markup)?;
            }
        }
        info!(
            format = target.format.extension(),
            with_background = target.with_background,
            blocks = self.blocks.len(),
            "Composition saved"
        );
        Ok(())
    }
}
