// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster export — text drawn with `imageproc` onto an RGBA canvas.

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect as PixelRect;
use mittools_core::error::{MitToolsError, Result};
use mittools_core::{Color, Rect, ResizeFilter};
use mittools_image::ImageProcessor;
use tracing::{debug, instrument};

use super::Composition;

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// Draw the composition at canvas size, then resize to `size` when given.
///
/// With `with_background` false the canvas starts fully transparent and only
/// text and text fills are drawn. A composition with text needs `font`.
#[instrument(skip_all, fields(width = comp.width, height = comp.height, with_background))]
pub fn render(
    comp: &Composition<'_>,
    font: Option<&FontVec>,
    with_background: bool,
    size: Option<(u32, u32)>,
) -> Result<RgbaImage> {
    let mut canvas = match (with_background, comp.background) {
        (true, Some(bg)) => DynamicImage::ImageRgb8(bg.clone()).into_rgba8(),
        (true, None) => RgbaImage::from_pixel(comp.width, comp.height, rgba(Color::WHITE)),
        (false, _) => RgbaImage::new(comp.width, comp.height),
    };

    if comp.has_text() && font.is_none() {
        return Err(MitToolsError::FontUnavailable(comp.style.to_string()));
    }

    for placed in &comp.blocks {
        if let Some(fill) = placed.block.fill() {
            fill_rect(&mut canvas, placed.block.rect, fill);
        }
        let Some(font) = font else { continue };
        let color = rgba(placed.block.colors.foreground);
        let scale = PxScale::from(placed.layout.font_size);
        for run in &placed.layout.runs {
            draw_text_mut(
                &mut canvas,
                color,
                run.x.round() as i32,
                run.top.round() as i32,
                scale,
                font,
                &run.text,
            );
        }
    }

    match size {
        Some((w, h)) if (w, h) != (comp.width, comp.height) => {
            debug!(w, h, "Resizing composition");
            Ok(ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(canvas))
                .resize_exact(w, h, ResizeFilter::Lanczos3)
                .into_dynamic()
                .into_rgba8())
        }
        _ => Ok(canvas),
    }
}

/// Fill `rect` (canvas coordinates, clipped) with `color`, compositing
/// translucent colours over what is already drawn.
fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Color) {
    let x0 = rect.x.round().max(0.0) as u32;
    let y0 = rect.y.round().max(0.0) as u32;
    let x1 = (rect.right().round().max(0.0) as u32).min(canvas.width());
    let y1 = (rect.bottom().round().max(0.0) as u32).min(canvas.height());
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let pixel = rgba(color);
    if color.a == u8::MAX {
        draw_filled_rect_mut(
            canvas,
            PixelRect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0),
            pixel,
        );
        return;
    }
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.get_pixel_mut(x, y).blend(&pixel);
        }
    }
}
