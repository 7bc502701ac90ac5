// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text metrics used by the layout engine: exact advances from a loaded
// font, or per-family estimates for outputs that use viewer-side fonts.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use mittools_core::{FontFamily, TextStyle};

/// Horizontal advance and ascent of characters at a pixel size.
pub trait TextMeasure {
    /// Advance width of `ch` at `size` pixels.
    fn advance(&self, ch: char, size: f32) -> f32;

    /// Distance from the top of the line box to the baseline.
    fn ascent(&self, size: f32) -> f32;

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }
}

/// True for characters that occupy a full em: CJK ideographs, kana, hangul,
/// and fullwidth forms. Lines may break before or after any of them.
pub fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303F
        | 0x3040..=0x30FF
        | 0x3100..=0x31FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
    )
}

/// Estimated metrics for a font family.
///
/// Average Latin glyph widths: roughly half an em for Helvetica-like sans
/// faces, slightly less for Times-like serifs, 0.6 em for Courier.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMetrics {
    average: f32,
    space: f32,
}

impl ApproxMetrics {
    pub fn for_style(style: &TextStyle) -> Self {
        let (average, space) = match style.family {
            FontFamily::Monospace => (0.6, 0.6),
            FontFamily::Serif => (0.48, 0.25),
            FontFamily::Sans | FontFamily::Named(_) => (0.5, 0.28),
        };
        let average = if style.bold { average * 1.08 } else { average };
        Self { average, space }
    }
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self::for_style(&TextStyle::default())
    }
}

impl TextMeasure for ApproxMetrics {
    fn advance(&self, ch: char, size: f32) -> f32 {
        if is_wide(ch) {
            size
        } else if ch.is_whitespace() {
            self.space * size
        } else {
            self.average * size
        }
    }

    fn ascent(&self, size: f32) -> f32 {
        0.8 * size
    }
}

/// Exact metrics from an `ab_glyph` font, matching what the raster exporter
/// draws.
pub struct GlyphMetrics<'a> {
    font: &'a FontVec,
}

impl<'a> GlyphMetrics<'a> {
    pub fn new(font: &'a FontVec) -> Self {
        Self { font }
    }
}

impl TextMeasure for GlyphMetrics<'_> {
    fn advance(&self, ch: char, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        scaled.h_advance(scaled.glyph_id(ch))
    }

    fn ascent(&self, size: f32) -> f32 {
        self.font.as_scaled(PxScale::from(size)).ascent()
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_characters() {
        assert!(is_wide('日'));
        assert!(is_wide('カ'));
        assert!(is_wide('한'));
        assert!(is_wide('！'));
        assert!(!is_wide('a'));
        assert!(!is_wide('é'));
    }

    #[test]
    fn approx_widths_per_family() {
        let sans = ApproxMetrics::default();
        assert_eq!(sans.advance('a', 20.0), 10.0);
        assert_eq!(sans.advance('日', 20.0), 20.0);
        assert_eq!(sans.text_width("ab", 10.0), 10.0);

        let mono = ApproxMetrics::for_style(&"mono".parse().unwrap());
        assert!((mono.advance(' ', 10.0) - 6.0).abs() < 1e-4);
        assert!((mono.advance('W', 10.0) - 6.0).abs() < 1e-4);
    }
}
