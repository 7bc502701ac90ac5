// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use mittools_core::error::MitToolsError;
use mittools_core::{Alignment, Rect, TextColors};

/// Largest accepted font size in pixels.
pub const MAX_FONT_SIZE: f32 = 10_000.0;

/// One piece of text placed in a rectangle of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub rect: Rect,
    /// Requested size in pixels; layout may shrink it to fit.
    pub font_size: f32,
    pub alignment: Alignment,
    pub colors: TextColors,
    /// Fill `rect` with `colors.background` before drawing the text.
    pub draw_background: bool,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, rect: Rect, font_size: f32) -> Self {
        Self {
            text: text.into(),
            rect,
            font_size,
            alignment: Alignment::default(),
            colors: TextColors::default(),
            draw_background: false,
        }
    }

    pub fn validate(&self) -> Result<(), MitToolsError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(MitToolsError::InvalidArgument(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if self.font_size > MAX_FONT_SIZE {
            return Err(MitToolsError::InvalidArgument(format!(
                "font size {} exceeds the maximum of {}",
                self.font_size, MAX_FONT_SIZE
            )));
        }
        if self.rect.is_empty() || !self.rect.x.is_finite() || !self.rect.y.is_finite() {
            return Err(MitToolsError::InvalidArgument(format!(
                "text rectangle must have a positive area, got {:?}",
                self.rect
            )));
        }
        Ok(())
    }

    /// The fill drawn behind the text, if any.
    pub fn fill(&self) -> Option<mittools_core::Color> {
        if self.draw_background {
            self.colors.background
        } else {
            None
        }
    }
}
