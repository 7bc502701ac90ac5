// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text layout — line wrapping, vertical columns, alignment inside the block
// rectangle, and shrink-to-fit.

use mittools_core::config::RenderConfig;
use mittools_core::{HorizontalAlign, Orientation, Rect, VerticalAlign};
use tracing::debug;

use crate::block::TextBlock;
use crate::metrics::{TextMeasure, is_wide};

/// Tolerance for floating-point fit checks, in pixels.
const FIT_EPSILON: f32 = 0.01;

/// Knobs of the layout engine, usually taken from `RenderConfig`.
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub line_spacing: f32,
    pub min_font_size: f32,
    pub shrink_to_fit: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for LayoutOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            line_spacing: config.line_spacing.max(1.0),
            min_font_size: config.min_font_size.max(1.0),
            shrink_to_fit: config.shrink_to_fit,
        }
    }
}

/// A run of text drawn at one position: a whole line for horizontal text,
/// a single character for vertical text.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    /// Left edge in canvas pixels.
    pub x: f32,
    /// Top of the glyph box in canvas pixels.
    pub top: f32,
    /// Baseline in canvas pixels.
    pub baseline: f32,
    pub width: f32,
}

/// Placed text of one block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    /// Font size actually used, after shrink-to-fit.
    pub font_size: f32,
    pub runs: Vec<GlyphRun>,
    /// True when the text still does not fit at the final size.
    pub overflow: bool,
}

/// Lay out `block` with the given flow direction and metrics.
///
/// With shrink-to-fit on, the size steps down one pixel at a time from the
/// requested size to the minimum; the largest fitting step is found by
/// bisection, so the number of trial layouts stays logarithmic.
pub fn layout_block(
    block: &TextBlock,
    orientation: Orientation,
    measure: &dyn TextMeasure,
    options: &LayoutOptions,
) -> BlockLayout {
    let requested = block.font_size;
    let at = |size: f32| {
        let (runs, fits) = place(block, orientation, measure, options, size);
        BlockLayout {
            font_size: size,
            runs,
            overflow: !fits,
        }
    };

    let first = at(requested);
    if !first.overflow || !options.shrink_to_fit {
        return first;
    }

    let floor = options.min_font_size.min(requested);
    let steps = (f64::from(requested) - f64::from(floor) + f64::from(FIT_EPSILON))
        .floor()
        .max(0.0) as u64;
    let size_at = |step: u64| (f64::from(requested) - step as f64) as f32;

    let smallest = at(size_at(steps));
    if steps == 0 || smallest.overflow {
        debug!(requested, used = smallest.font_size, "Text block overflows");
        return smallest;
    }

    // `low` never fits, `high` always does.
    let (mut low, mut high) = (0u64, steps);
    let mut best = smallest;
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let trial = at(size_at(mid));
        if trial.overflow {
            low = mid;
        } else {
            high = mid;
            best = trial;
        }
    }
    debug!(requested, used = best.font_size, "Text block shrunk");
    best
}

fn place(
    block: &TextBlock,
    orientation: Orientation,
    measure: &dyn TextMeasure,
    options: &LayoutOptions,
    size: f32,
) -> (Vec<GlyphRun>, bool) {
    match orientation {
        Orientation::Horizontal => place_horizontal(block, measure, options, size),
        Orientation::Vertical => place_vertical(block, measure, options, size),
    }
}

// -- Horizontal ---------------------------------------------------------------

fn place_horizontal(
    block: &TextBlock,
    measure: &dyn TextMeasure,
    options: &LayoutOptions,
    size: f32,
) -> (Vec<GlyphRun>, bool) {
    let rect = block.rect;
    let line_height = size * options.line_spacing;
    let half_leading = (line_height - size) / 2.0;
    let ascent = measure.ascent(size);

    let lines = wrap_lines(&block.text, rect.width, size, measure);
    let total_height = lines.len() as f32 * line_height;
    let widest = lines.iter().map(|(_, w)| *w).fold(0.0f32, f32::max);
    let fits = total_height <= rect.height + FIT_EPSILON && widest <= rect.width + FIT_EPSILON;

    let block_top = match block.alignment.vertical {
        VerticalAlign::Top => rect.y,
        VerticalAlign::Center => rect.y + (rect.height - total_height) / 2.0,
        VerticalAlign::Bottom => rect.bottom() - total_height,
    };

    let runs = lines
        .into_iter()
        .enumerate()
        .filter(|(_, (text, _))| !text.is_empty())
        .map(|(i, (text, width))| {
            let top = block_top + i as f32 * line_height + half_leading;
            GlyphRun {
                x: align_start(rect, block.alignment.horizontal, width),
                top,
                baseline: top + ascent,
                width,
                text,
            }
        })
        .collect();
    (runs, fits)
}

fn align_start(rect: Rect, align: HorizontalAlign, width: f32) -> f32 {
    match align {
        HorizontalAlign::Left => rect.x,
        HorizontalAlign::Center => rect.x + (rect.width - width) / 2.0,
        HorizontalAlign::Right => rect.right() - width,
    }
}

/// A breakable unit of a paragraph.
struct Token {
    text: String,
    space_before: bool,
}

/// Split a paragraph into words, with every wide character its own token.
fn tokenize(paragraph: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_space = false;
    let mut pending_space = false;

    let flush = |current: &mut String, space: bool, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token {
                text: std::mem::take(current),
                space_before: space,
            });
        }
    };

    for ch in paragraph.chars() {
        if ch.is_whitespace() {
            flush(&mut current, current_space, &mut tokens);
            pending_space = true;
        } else if is_wide(ch) {
            flush(&mut current, current_space, &mut tokens);
            tokens.push(Token {
                text: ch.to_string(),
                space_before: pending_space,
            });
            pending_space = false;
        } else {
            if current.is_empty() {
                current_space = pending_space;
                pending_space = false;
            }
            current.push(ch);
        }
    }
    flush(&mut current, current_space, &mut tokens);
    tokens
}

/// Wrap `text` so no line is wider than `max_width`, returning each line with
/// its measured width.
///
/// Explicit newlines start new lines; words wrap at whitespace or around wide
/// characters; a word wider than the box is force-broken between characters.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    size: f32,
    measure: &dyn TextMeasure,
) -> Vec<(String, f32)> {
    let mut lines = Vec::new();
    let space_width = measure.advance(' ', size);

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0f32;

        for token in tokenize(paragraph.trim_end_matches('\r')) {
            let word_width = measure.text_width(&token.text, size);
            let gap = if token.space_before && !line.is_empty() {
                space_width
            } else {
                0.0
            };

            if !line.is_empty() && line_width + gap + word_width <= max_width + FIT_EPSILON {
                if gap > 0.0 {
                    line.push(' ');
                }
                line.push_str(&token.text);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push((std::mem::take(&mut line), line_width));
                line_width = 0.0;
            }

            if word_width <= max_width + FIT_EPSILON {
                line.push_str(&token.text);
                line_width = word_width;
            } else {
                // Force-break the oversized word; the tail stays open.
                for ch in token.text.chars() {
                    let w = measure.advance(ch, size);
                    if !line.is_empty() && line_width + w > max_width + FIT_EPSILON {
                        lines.push((std::mem::take(&mut line), line_width));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += w;
                }
            }
        }
        lines.push((line, line_width));
    }
    lines
}

// -- Vertical -----------------------------------------------------------------

fn place_vertical(
    block: &TextBlock,
    measure: &dyn TextMeasure,
    options: &LayoutOptions,
    size: f32,
) -> (Vec<GlyphRun>, bool) {
    let rect = block.rect;
    let column_width = size * options.line_spacing;
    let per_column = ((rect.height + FIT_EPSILON) / size).floor().max(1.0) as usize;
    let ascent = measure.ascent(size);

    let columns = split_columns(&block.text, per_column);
    let group_width = columns.len() as f32 * column_width;
    let tallest = columns.iter().map(Vec::len).max().unwrap_or(0) as f32 * size;
    let fits = group_width <= rect.width + FIT_EPSILON && tallest <= rect.height + FIT_EPSILON;

    // Columns advance right-to-left from the right edge of the group.
    let group_right = match block.alignment.horizontal {
        HorizontalAlign::Left => rect.x + group_width,
        HorizontalAlign::Center => rect.x + (rect.width + group_width) / 2.0,
        HorizontalAlign::Right => rect.right(),
    };

    let mut runs = Vec::new();
    for (index, column) in columns.iter().enumerate() {
        let column_left = group_right - (index + 1) as f32 * column_width;
        let column_height = column.len() as f32 * size;
        let column_top = match block.alignment.vertical {
            VerticalAlign::Top => rect.y,
            VerticalAlign::Center => rect.y + (rect.height - column_height) / 2.0,
            VerticalAlign::Bottom => rect.bottom() - column_height,
        };
        for (row, ch) in column.iter().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let width = measure.advance(*ch, size);
            let top = column_top + row as f32 * size;
            runs.push(GlyphRun {
                text: ch.to_string(),
                x: column_left + (column_width - width) / 2.0,
                top,
                baseline: top + ascent,
                width,
            });
        }
    }
    (runs, fits)
}

/// Split text into columns of at most `per_column` characters. Newlines
/// start a new column; whitespace at the head of a column is dropped.
fn split_columns(text: &str, per_column: usize) -> Vec<Vec<char>> {
    let mut columns = Vec::new();
    for paragraph in text.split('\n') {
        let mut column: Vec<char> = Vec::new();
        for ch in paragraph.chars() {
            if ch.is_whitespace() && column.is_empty() {
                continue;
            }
            if column.len() == per_column {
                columns.push(std::mem::take(&mut column));
                if ch.is_whitespace() {
                    continue;
                }
            }
            column.push(ch);
        }
        while column.last().is_some_and(|c| c.is_whitespace()) {
            column.pop();
        }
        if !column.is_empty() {
            columns.push(column);
        }
    }
    columns
}
