// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF export with `printpdf` 0.8: one page sized from the output pixels at the
// configured dpi, the background as an image XObject, and text in the PDF
// built-in fonts.

use mittools_core::config::RenderConfig;
use mittools_core::error::{MitToolsError, Result};
use mittools_core::{Color, FontFamily, TextStyle};
use printpdf::{
    BuiltinFont, Color as PdfColor, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData,
    RawImageFormat, Rgb, TextItem, WindingOrder, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::Composition;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Built-in PDF font closest to a text style.
pub fn builtin_font(style: &TextStyle) -> BuiltinFont {
    match (&style.family, style.bold, style.italic) {
        (FontFamily::Serif, false, false) => BuiltinFont::TimesRoman,
        (FontFamily::Serif, true, false) => BuiltinFont::TimesBold,
        (FontFamily::Serif, false, true) => BuiltinFont::TimesItalic,
        (FontFamily::Serif, true, true) => BuiltinFont::TimesBoldItalic,
        (FontFamily::Monospace, false, false) => BuiltinFont::Courier,
        (FontFamily::Monospace, true, false) => BuiltinFont::CourierBold,
        (FontFamily::Monospace, false, true) => BuiltinFont::CourierOblique,
        (FontFamily::Monospace, true, true) => BuiltinFont::CourierBoldOblique,
        (_, false, false) => BuiltinFont::Helvetica,
        (_, true, false) => BuiltinFont::HelveticaBold,
        (_, false, true) => BuiltinFont::HelveticaOblique,
        (_, true, true) => BuiltinFont::HelveticaBoldOblique,
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb {
        r: color.r as f32 / 255.0,
        g: color.g as f32 / 255.0,
        b: color.b as f32 / 255.0,
        icc_profile: None,
    })
}

/// Maps canvas pixels to page points (origin bottom-left).
struct PageMapping {
    sx: f32,
    sy: f32,
    height_pt: f32,
}

impl PageMapping {
    fn point(&self, x: f32, y: f32) -> Point {
        Point {
            x: Pt(x * self.sx),
            y: Pt(self.height_pt - y * self.sy),
        }
    }
}

/// Build the PDF bytes for `comp`, sized to `size` pixels (canvas size when
/// `None`).
#[instrument(skip_all, fields(width = comp.width, height = comp.height, with_background))]
pub fn render(
    comp: &Composition<'_>,
    config: &RenderConfig,
    with_background: bool,
    size: Option<(u32, u32)>,
) -> Result<Vec<u8>> {
    if !(config.dpi.is_finite() && config.dpi > 0.0) {
        return Err(MitToolsError::InvalidArgument(format!(
            "dpi must be positive, got {}",
            config.dpi
        )));
    }
    let (out_w, out_h) = size.unwrap_or((comp.width, comp.height));
    let pt_per_px = 72.0 / config.dpi;
    let width_pt = out_w as f32 * pt_per_px;
    let height_pt = out_h as f32 * pt_per_px;
    let (rx, ry) = comp.scale_to(out_w, out_h);
    let mapping = PageMapping {
        sx: rx * pt_per_px,
        sy: ry * pt_per_px,
        height_pt,
    };

    let mut doc = PdfDocument::new(&config.pdf_title);
    let mut ops = Vec::new();

    if let (true, Some(bg)) = (with_background, comp.background) {
        let raw = RawImage {
            pixels: RawImageData::U8(bg.as_raw().clone()),
            width: bg.width() as usize,
            height: bg.height() as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let id = doc.add_image(&raw);
        ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(out_w as f32 / bg.width().max(1) as f32),
                scale_y: Some(out_h as f32 / bg.height().max(1) as f32),
                dpi: Some(config.dpi),
                rotate: None,
            },
        });
    }

    let font = builtin_font(comp.style);
    for placed in &comp.blocks {
        if let Some(fill) = placed.block.fill().filter(|c| c.a > 0) {
            let r = placed.block.rect;
            ops.push(Op::SetFillColor { col: pdf_color(fill) });
            ops.push(Op::DrawPolygon {
                polygon: Polygon {
                    rings: vec![PolygonRing {
                        points: [
                            (r.x, r.y),
                            (r.right(), r.y),
                            (r.right(), r.bottom()),
                            (r.x, r.bottom()),
                        ]
                        .into_iter()
                        .map(|(x, y)| LinePoint {
                            p: mapping.point(x, y),
                            bezier: false,
                        })
                        .collect(),
                    }],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                },
            });
        }

        if placed.layout.runs.is_empty() {
            continue;
        }
        if placed
            .layout
            .runs
            .iter()
            .any(|run| run.text.chars().any(|c| c as u32 > 0xFF))
        {
            warn!(
                text = %placed.block.text,
                "Text contains characters outside the built-in font encoding"
            );
        }

        let size_pt = placed.layout.font_size * mapping.sy;
        ops.push(Op::SetFillColor {
            col: pdf_color(placed.block.colors.foreground),
        });
        for run in &placed.layout.runs {
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: mapping.point(run.x, run.baseline),
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(size_pt),
                font,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(run.text.clone())],
                font,
            });
            ops.push(Op::EndTextSection);
        }
    }

    let page = PdfPage::new(Mm(width_pt * MM_PER_PT), Mm(height_pt * MM_PER_PT), ops);
    doc.with_pages(vec![page]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        debug!(count = warnings.len(), "PDF serialisation warnings");
    }

    info!(width_pt, height_pt, bytes = output.len(), "PDF composed");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TextBlock;
    use crate::export::PlacedBlock;
    use crate::layout::{BlockLayout, GlyphRun};
    use image::{Rgb as ImageRgb, RgbImage};
    use mittools_core::Rect;

    fn count_image_xobjects(bytes: &[u8]) -> usize {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        doc.objects
            .values()
            .filter(|obj| {
                obj.as_stream()
                    .ok()
                    .and_then(|s| s.dict.get(b"Subtype").ok())
                    .and_then(|t| t.as_name().ok())
                    .is_some_and(|name| name == b"Image")
            })
            .count()
    }

    fn sample<'a>(bg: &'a RgbImage, style: &'a TextStyle, block: &'a TextBlock) -> Composition<'a> {
        Composition {
            width: bg.width(),
            height: bg.height(),
            background: Some(bg),
            style,
            blocks: vec![PlacedBlock {
                block,
                layout: BlockLayout {
                    font_size: 12.0,
                    runs: vec![GlyphRun {
                        text: "Hello".into(),
                        x: 4.0,
                        top: 4.0,
                        baseline: 13.6,
                        width: 30.0,
                    }],
                    overflow: false,
                },
            }],
        }
    }

    #[test]
    fn style_maps_to_builtin_fonts() {
        let bold_serif: TextStyle = "serif bold".parse().unwrap();
        assert!(matches!(builtin_font(&bold_serif), BuiltinFont::TimesBold));
        assert!(matches!(builtin_font(&TextStyle::default()), BuiltinFont::Helvetica));
    }

    #[test]
    fn single_page_with_background_image() {
        let bg = RgbImage::from_pixel(40, 30, ImageRgb([250, 250, 250]));
        let style = TextStyle::default();
        let block = TextBlock::new("Hello", Rect::new(0.0, 0.0, 40.0, 30.0), 12.0);
        let bytes = render(&sample(&bg, &style, &block), &RenderConfig::default(), true, None).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(count_image_xobjects(&bytes), 1);
    }

    #[test]
    fn text_layer_only_has_no_image() {
        let bg = RgbImage::from_pixel(40, 30, ImageRgb([250, 250, 250]));
        let style = TextStyle::default();
        let block = TextBlock::new("Hello", Rect::new(0.0, 0.0, 40.0, 30.0), 12.0);
        let bytes = render(&sample(&bg, &style, &block), &RenderConfig::default(), false, None).unwrap();
        assert_eq!(count_image_xobjects(&bytes), 0);
    }

    #[test]
    fn rejects_non_positive_dpi() {
        let bg = RgbImage::new(4, 4);
        let style = TextStyle::default();
        let block = TextBlock::new("x", Rect::new(0.0, 0.0, 4.0, 4.0), 2.0);
        let config = RenderConfig {
            dpi: 0.0,
            ..RenderConfig::default()
        };
        assert!(render(&sample(&bg, &style, &block), &config, true, None).is_err());
    }
}
