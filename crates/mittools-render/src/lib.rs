// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mittools-render — Composition of styled text blocks over a background image.
//
// A `Renderer` holds a background (normalised to RGB) and a list of text
// blocks. Blocks are laid out horizontally or in vertical columns, shrunk to
// fit their rectangles, and exported as PNG (rasterised with `imageproc`),
// PDF (`printpdf` built-in fonts), or SVG.

pub mod block;
pub mod export;
pub mod font;
pub mod layout;
pub mod metrics;
pub mod renderer;
pub mod scene;

pub use block::{MAX_FONT_SIZE, TextBlock};
pub use font::FontResolver;
pub use layout::{BlockLayout, GlyphRun, LayoutOptions, layout_block};
pub use metrics::{ApproxMetrics, GlyphMetrics, TextMeasure};
pub use renderer::Renderer;
pub use scene::{Scene, SceneBlock};
