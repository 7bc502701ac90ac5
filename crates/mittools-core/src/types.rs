// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for mit-tools: geometry, alignment, colours, font styles,
// export targets, and resize filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MitToolsError;

/// Axis-aligned rectangle in canvas pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl From<(f32, f32, f32, f32)> for Rect {
    fn from((x, y, width, height): (f32, f32, f32, f32)) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    fn from((x, y, width, height): (f64, f64, f64, f64)) -> Self {
        Self::new(x as f32, y as f32, width as f32, height as f32)
    }
}

impl From<[f32; 4]> for Rect {
    fn from([x, y, width, height]: [f32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

// -- Alignment ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Placement of a text block inside its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Alignment {
    pub fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn centered() -> Self {
        Self::new(HorizontalAlign::Center, VerticalAlign::Center)
    }
}

enum AlignToken {
    Horizontal(HorizontalAlign),
    Vertical(VerticalAlign),
    Center,
}

fn align_token(token: &str) -> Result<AlignToken, MitToolsError> {
    match token {
        "left" => Ok(AlignToken::Horizontal(HorizontalAlign::Left)),
        "right" => Ok(AlignToken::Horizontal(HorizontalAlign::Right)),
        "top" => Ok(AlignToken::Vertical(VerticalAlign::Top)),
        "bottom" => Ok(AlignToken::Vertical(VerticalAlign::Bottom)),
        "center" | "centre" | "middle" => Ok(AlignToken::Center),
        other => Err(MitToolsError::InvalidArgument(format!(
            "unknown alignment keyword: {other}"
        ))),
    }
}

impl FromStr for Alignment {
    type Err = MitToolsError;

    /// Parse `"center"`, `"left"`, `"top-right"`, `"bottom center"` and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | ','))
            .filter(|t| !t.is_empty())
            .collect();

        use AlignToken::*;
        match tokens.as_slice() {
            [one] => Ok(match align_token(one)? {
                Horizontal(h) => Self::new(h, VerticalAlign::Top),
                Vertical(v) => Self::new(HorizontalAlign::Left, v),
                Center => Self::centered(),
            }),
            [a, b] => match (align_token(a)?, align_token(b)?) {
                (Horizontal(h), Vertical(v)) | (Vertical(v), Horizontal(h)) => Ok(Self::new(h, v)),
                (Horizontal(h), Center) | (Center, Horizontal(h)) => {
                    Ok(Self::new(h, VerticalAlign::Center))
                }
                (Vertical(v), Center) | (Center, Vertical(v)) => {
                    Ok(Self::new(HorizontalAlign::Center, v))
                }
                (Center, Center) => Ok(Self::centered()),
                _ => Err(MitToolsError::InvalidArgument(format!(
                    "conflicting alignment: {s}"
                ))),
            },
            _ => Err(MitToolsError::InvalidArgument(format!(
                "alignment needs one or two keywords, got {s:?}"
            ))),
        }
    }
}

// -- Colours ------------------------------------------------------------------

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Decode a packed `0xAARRGGBB` value.
    pub fn from_argb(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
            a: ((value >> 24) & 0xFF) as u8,
        }
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }
}

fn hex_pair(s: &str) -> Result<u8, MitToolsError> {
    // from_str_radix would also take a leading sign.
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MitToolsError::InvalidArgument(format!(
            "invalid hex colour component: {s}"
        )));
    }
    u8::from_str_radix(s, 16)
        .map_err(|_| MitToolsError::InvalidArgument(format!("invalid hex colour component: {s}")))
}

impl FromStr for Color {
    type Err = MitToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            "red" => return Ok(Self::rgb(255, 0, 0)),
            "green" => return Ok(Self::rgb(0, 128, 0)),
            "blue" => return Ok(Self::rgb(0, 0, 255)),
            "yellow" => return Ok(Self::rgb(255, 255, 0)),
            "transparent" => return Ok(Self::rgba(0, 0, 0, 0)),
            _ => {}
        }

        let hex = trimmed.strip_prefix('#').ok_or_else(|| {
            MitToolsError::InvalidArgument(format!("colour must be #hex or a name: {trimmed}"))
        })?;
        if !hex.is_ascii() {
            return Err(MitToolsError::InvalidArgument(format!("invalid colour: {trimmed}")));
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| hex_pair(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => Ok(Self::rgb(
                hex_pair(&hex[0..2])?,
                hex_pair(&hex[2..4])?,
                hex_pair(&hex[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_pair(&hex[0..2])?,
                hex_pair(&hex[2..4])?,
                hex_pair(&hex[4..6])?,
                hex_pair(&hex[6..8])?,
            )),
            _ => Err(MitToolsError::InvalidArgument(format!(
                "colour must have 3, 6, or 8 hex digits: {trimmed}"
            ))),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = MitToolsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        if color.a == 255 {
            color.to_hex()
        } else {
            format!("{}{:02x}", color.to_hex(), color.a)
        }
    }
}

/// Foreground colour of a text block plus an optional fill behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColors {
    pub foreground: Color,
    #[serde(default)]
    pub background: Option<Color>,
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: None,
        }
    }
}

impl From<Color> for TextColors {
    fn from(foreground: Color) -> Self {
        Self {
            foreground,
            background: None,
        }
    }
}

impl From<(Color, Color)> for TextColors {
    fn from((foreground, background): (Color, Color)) -> Self {
        Self {
            foreground,
            background: Some(background),
        }
    }
}

impl From<(Color, Option<Color>)> for TextColors {
    fn from((foreground, background): (Color, Option<Color>)) -> Self {
        Self {
            foreground,
            background,
        }
    }
}

// -- Font style ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Monospace,
    /// A concrete family such as "Noto Sans CJK JP".
    Named(String),
}

/// Font selection parsed from a renderer style identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FromStr for TextStyle {
    type Err = MitToolsError;

    /// Parse identifiers like `"sans"`, `"serif bold"`, `"mono-italic"`, or
    /// `"Noto Sans CJK JP bold"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut style = TextStyle::default();
        let mut family_words: Vec<&str> = Vec::new();

        let tokens = s
            .split(|c: char| c.is_whitespace() || c == '_' || c == ',')
            .filter(|t| !t.is_empty());
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            // "serif-bold", "mono-italic", "bold-italic"
            if let Some((word, modifier)) = lower.split_once('-') {
                if matches!(modifier, "bold" | "italic" | "oblique") {
                    match modifier {
                        "bold" => style.bold = true,
                        _ => style.italic = true,
                    }
                    match word {
                        "bold" => style.bold = true,
                        "" => {}
                        _ => family_words.push(&token[..word.len()]),
                    }
                    continue;
                }
            }
            match lower.as_str() {
                "bold" => style.bold = true,
                "italic" | "oblique" => style.italic = true,
                "default" | "regular" | "normal" => {}
                _ => family_words.push(token),
            }
        }

        style.family = match family_words.as_slice() {
            [] => FontFamily::Sans,
            [one] => match one.to_ascii_lowercase().as_str() {
                "sans" | "sans-serif" => FontFamily::Sans,
                "serif" => FontFamily::Serif,
                "mono" | "monospace" => FontFamily::Monospace,
                _ => FontFamily::Named(one.to_string()),
            },
            words => FontFamily::Named(words.join(" ")),
        };
        Ok(style)
    }
}

impl fmt::Display for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.family {
            FontFamily::Sans => write!(f, "sans")?,
            FontFamily::Serif => write!(f, "serif")?,
            FontFamily::Monospace => write!(f, "monospace")?,
            FontFamily::Named(name) => write!(f, "{name}")?,
        }
        if self.bold {
            write!(f, " bold")?;
        }
        if self.italic {
            write!(f, " italic")?;
        }
        Ok(())
    }
}

// -- Orientation / export -----------------------------------------------------

/// Text flow direction of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Left-to-right lines stacked top-to-bottom.
    #[default]
    Horizontal,
    /// Top-to-bottom columns stacked right-to-left.
    Vertical,
}

impl Orientation {
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = MitToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(MitToolsError::InvalidArgument(format!(
                "unsupported output format: {other}"
            ))),
        }
    }
}

/// Output format plus whether the background image is part of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTarget {
    pub format: OutputFormat,
    pub with_background: bool,
}

impl FromStr for ExportTarget {
    type Err = MitToolsError;

    /// Parse format tokens such as `"pdf false"`, `"png true"`, or `"svg"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let format: OutputFormat = parts
            .next()
            .ok_or_else(|| MitToolsError::InvalidArgument("empty format token".into()))?
            .parse()?;
        let with_background = match parts.next().map(|p| p.to_ascii_lowercase()) {
            None => true,
            Some(flag) => match flag.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(MitToolsError::InvalidArgument(format!(
                        "format flag must be true or false, got {other}"
                    )));
                }
            },
        };
        if parts.next().is_some() {
            return Err(MitToolsError::InvalidArgument(format!(
                "too many words in format token: {s:?}"
            )));
        }
        Ok(Self {
            format,
            with_background,
        })
    }
}

// -- Resize filters -----------------------------------------------------------

/// Resampling filter used when scaling images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    #[default]
    Lanczos3,
    CatmullRom,
    Gaussian,
    Nearest,
    Triangle,
}

impl FromStr for ResizeFilter {
    type Err = MitToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lanczos3" => Ok(Self::Lanczos3),
            "catmullrom" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "nearest" => Ok(Self::Nearest),
            "triangle" => Ok(Self::Triangle),
            _ => Err(MitToolsError::InvalidArgument("Invalid filter type".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_single_keywords() {
        assert_eq!("center".parse::<Alignment>().unwrap(), Alignment::centered());
        assert_eq!(
            "right".parse::<Alignment>().unwrap(),
            Alignment::new(HorizontalAlign::Right, VerticalAlign::Top)
        );
        assert_eq!(
            "bottom".parse::<Alignment>().unwrap(),
            Alignment::new(HorizontalAlign::Left, VerticalAlign::Bottom)
        );
    }

    #[test]
    fn alignment_pairs_in_any_order() {
        let expected = Alignment::new(HorizontalAlign::Right, VerticalAlign::Top);
        assert_eq!("top-right".parse::<Alignment>().unwrap(), expected);
        assert_eq!("right top".parse::<Alignment>().unwrap(), expected);
        assert_eq!(
            "center bottom".parse::<Alignment>().unwrap(),
            Alignment::new(HorizontalAlign::Center, VerticalAlign::Bottom)
        );
        assert_eq!(
            "Left, Middle".parse::<Alignment>().unwrap(),
            Alignment::new(HorizontalAlign::Left, VerticalAlign::Center)
        );
    }

    #[test]
    fn alignment_rejects_conflicts() {
        assert!("left right".parse::<Alignment>().is_err());
        assert!("top bottom".parse::<Alignment>().is_err());
        assert!("diagonal".parse::<Alignment>().is_err());
        assert!("".parse::<Alignment>().is_err());
        assert!("top left center".parse::<Alignment>().is_err());
    }

    #[test]
    fn colour_formats() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#102030".parse::<Color>().unwrap(), Color::rgb(0x10, 0x20, 0x30));
        assert_eq!(
            "#10203080".parse::<Color>().unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0x80)
        );
        assert_eq!("Black".parse::<Color>().unwrap(), Color::BLACK);
        assert!("102030".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn signed_hex_digits_are_rejected() {
        for raw in ["#+f+f+f", "#+ff+ff+f", "#-1-1-1", "#12+456", "#+fff+fff"] {
            assert!(raw.parse::<Color>().is_err(), "{raw} accepted");
        }
        assert_eq!("#FfF".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn colour_from_packed_argb() {
        let c = Color::from_argb(0x80FF8000);
        assert_eq!(c, Color::rgba(0xFF, 0x80, 0x00, 0x80));
        assert_eq!(c.to_hex(), "#ff8000");
        assert_eq!(String::from(c), "#ff800080");
    }

    #[test]
    fn style_identifiers() {
        assert_eq!("".parse::<TextStyle>().unwrap(), TextStyle::default());
        let bold_serif: TextStyle = "serif bold".parse().unwrap();
        assert_eq!(bold_serif.family, FontFamily::Serif);
        assert!(bold_serif.bold && !bold_serif.italic);

        let mono: TextStyle = "mono-italic".parse().unwrap();
        assert_eq!(mono.family, FontFamily::Monospace);
        assert!(mono.italic);

        let named: TextStyle = "Noto Sans CJK JP bold".parse().unwrap();
        assert_eq!(named.family, FontFamily::Named("Noto Sans CJK JP".into()));
        assert!(named.bold);
        assert_eq!(named.to_string(), "Noto Sans CJK JP bold");
    }

    #[test]
    fn export_tokens() {
        let pdf: ExportTarget = "pdf false".parse().unwrap();
        assert_eq!(pdf.format, OutputFormat::Pdf);
        assert!(!pdf.with_background);

        let png: ExportTarget = "PNG true".parse().unwrap();
        assert_eq!(png.format, OutputFormat::Png);
        assert!(png.with_background);

        let svg: ExportTarget = "svg".parse().unwrap();
        assert!(svg.with_background);

        assert!("gif".parse::<ExportTarget>().is_err());
        assert!("png maybe".parse::<ExportTarget>().is_err());
        assert!("png true extra".parse::<ExportTarget>().is_err());
        assert!("".parse::<ExportTarget>().is_err());
    }

    #[test]
    fn filter_names() {
        assert_eq!("catmullrom".parse::<ResizeFilter>().unwrap(), ResizeFilter::CatmullRom);
        let err = "bicubic".parse::<ResizeFilter>().unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: Invalid filter type");
    }

    #[test]
    fn rect_conversions() {
        let r: Rect = (10.0f64, 20.0, 30.0, 40.0).into();
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert!(!r.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }
}
