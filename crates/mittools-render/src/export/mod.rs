// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exporters — turn a laid-out composition into PNG, PDF, or SVG output.

pub mod pdf;
pub mod raster;
pub mod svg;

use image::RgbImage;
use mittools_core::TextStyle;

use crate::block::TextBlock;
use crate::layout::BlockLayout;

/// A text block together with its placement on the canvas.
#[derive(Debug, Clone)]
pub struct PlacedBlock<'a> {
    pub block: &'a TextBlock,
    pub layout: BlockLayout,
}

/// Everything an exporter needs: canvas size in pixels, the RGB background,
/// and placed text, all in canvas coordinates.
#[derive(Debug, Clone)]
pub struct Composition<'a> {
    pub width: u32,
    pub height: u32,
    pub background: Option<&'a RgbImage>,
    pub style: &'a TextStyle,
    pub blocks: Vec<PlacedBlock<'a>>,
}

impl Composition<'_> {
    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|p| !p.layout.runs.is_empty())
    }

    /// Horizontal and vertical factors mapping canvas pixels onto an output
    /// of `width` × `height`.
    pub fn scale_to(&self, width: u32, height: u32) -> (f32, f32) {
        (
            width as f32 / self.width.max(1) as f32,
            height as f32 / self.height.max(1) as f32,
        )
    }
}
