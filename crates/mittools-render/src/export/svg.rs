// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SVG export. The background is not embedded; callers write it next to the
// SVG and pass its relative href.

use std::fmt::Write as _;
use std::path::Path;

use mittools_core::{Color, FontFamily, TextStyle};

use super::Composition;

/// File name of the background image that accompanies `svg_path`:
/// `<stem>.background.png` in the same directory.
pub fn background_file_name(svg_path: &Path) -> String {
    let stem = svg_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "composition".into());
    format!("{stem}.background.png")
}

/// Escape text for use in XML character data and attribute values.
/// Characters XML 1.0 cannot carry at all (C0 controls other than tab, line
/// feed and carriage return, U+FFFE, U+FFFF) are dropped.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            _ => out.push(ch),
        }
    }
    out
}

fn font_family(style: &TextStyle) -> String {
    match &style.family {
        FontFamily::Sans => "sans-serif".into(),
        FontFamily::Serif => "serif".into(),
        FontFamily::Monospace => "monospace".into(),
        FontFamily::Named(name) => format!("'{}', sans-serif", escape_xml(name)),
    }
}

fn paint(attr: &str, color: Color) -> String {
    if color.a == u8::MAX {
        format!(r#"{attr}="{}""#, color.to_hex())
    } else {
        format!(
            r#"{attr}="{}" {attr}-opacity="{:.3}""#,
            color.to_hex(),
            color.opacity()
        )
    }
}

/// Build the SVG document. `size` sets the displayed width and height; the
/// viewBox always spans the canvas.
pub fn render(
    comp: &Composition<'_>,
    with_background: bool,
    size: Option<(u32, u32)>,
    background_href: Option<&str>,
) -> String {
    let (out_w, out_h) = size.unwrap_or((comp.width, comp.height));
    let mut svg = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{out_w}" height="{out_h}" viewBox="0 0 {} {}">"#,
        comp.width, comp.height
    );

    if with_background {
        match (comp.background, background_href) {
            (Some(_), Some(href)) => {
                let _ = writeln!(
                    svg,
                    r#"  <image x="0" y="0" width="{}" height="{}" preserveAspectRatio="none" href="{}" xlink:href="{}"/>"#,
                    comp.width,
                    comp.height,
                    escape_xml(href),
                    escape_xml(href)
                );
            }
            (None, _) => {
                let _ = writeln!(
                    svg,
                    r#"  <rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                    comp.width,
                    comp.height,
                    Color::WHITE.to_hex()
                );
            }
            (Some(_), None) => {}
        }
    }

    let family = font_family(comp.style);
    let weight = if comp.style.bold { "bold" } else { "normal" };
    let slant = if comp.style.italic { "italic" } else { "normal" };

    for placed in &comp.blocks {
        if let Some(fill) = placed.block.fill() {
            let r = placed.block.rect;
            let _ = writeln!(
                svg,
                r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
                r.x,
                r.y,
                r.width,
                r.height,
                paint("fill", fill)
            );
        }
        if placed.layout.runs.is_empty() {
            continue;
        }

        let _ = writeln!(
            svg,
            r#"  <g font-family="{family}" font-size="{:.2}" font-weight="{weight}" font-style="{slant}" {}>"#,
            placed.layout.font_size,
            paint("fill", placed.block.colors.foreground)
        );
        for run in &placed.layout.runs {
            let _ = writeln!(
                svg,
                r#"    <text x="{:.2}" y="{:.2}" xml:space="preserve">{}</text>"#,
                run.x,
                run.baseline,
                escape_xml(&run.text)
            );
        }
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TextBlock;
    use crate::export::PlacedBlock;
    use crate::layout::{BlockLayout, GlyphRun};
    use image::RgbImage;
    use mittools_core::Rect;

    fn placed<'a>(block: &'a TextBlock, text: &str) -> PlacedBlock<'a> {
        PlacedBlock {
            block,
            layout: BlockLayout {
                font_size: 16.0,
                runs: vec![GlyphRun {
                    text: text.into(),
                    x: 1.0,
                    top: 2.0,
                    baseline: 14.8,
                    width: 20.0,
                }],
                overflow: false,
            },
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn drops_characters_xml_cannot_hold() {
        assert_eq!(escape_xml("a\u{0}b\u{7}c\u{1b}[0m\u{ffff}"), "abc[0m");
        assert_eq!(escape_xml("tab\there\r\nnext"), "tab\there\r\nnext");
        assert_eq!(escape_xml("\u{7f}é日本"), "\u{7f}é日本");
    }

    #[test]
    fn background_sidecar_name() {
        assert_eq!(
            background_file_name(Path::new("/tmp/page-1.svg")),
            "page-1.background.png"
        );
    }

    #[test]
    fn document_structure() {
        let bg = RgbImage::new(100, 50);
        let style: TextStyle = "serif italic".parse().unwrap();
        let mut block = TextBlock::new("Fish & Chips", Rect::new(0.0, 0.0, 100.0, 50.0), 16.0);
        block.colors.foreground = Color::rgba(255, 0, 0, 128);
        block.colors.background = Some(Color::WHITE);
        block.draw_background = true;

        let comp = Composition {
            width: 100,
            height: 50,
            background: Some(&bg),
            style: &style,
            blocks: vec![placed(&block, "Fish & Chips")],
        };
        let svg = render(&comp, true, Some((200, 100)), Some("page.background.png"));

        assert!(svg.contains(r#"width="200" height="100" viewBox="0 0 100 50""#));
        assert!(svg.contains(r#"href="page.background.png""#));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains(r#"font-family="serif""#));
        assert!(svg.contains(r#"font-style="italic""#));
        assert!(svg.contains(r#"fill-opacity="0.502""#));
        assert!(svg.contains(">Fish &amp; Chips</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_layer_only_omits_background() {
        let bg = RgbImage::new(10, 10);
        let style = TextStyle::default();
        let block = TextBlock::new("x", Rect::new(0.0, 0.0, 10.0, 10.0), 8.0);
        let comp = Composition {
            width: 10,
            height: 10,
            background: Some(&bg),
            style: &style,
            blocks: vec![placed(&block, "x")],
        };
        let svg = render(&comp, false, None, Some("bg.png"));
        assert!(!svg.contains("<image"));
        assert!(svg.contains(r#"font-family="sans-serif""#));
    }
}
