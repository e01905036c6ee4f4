use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect, Size};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Font, LabelTransform};

/// Horizontal text alignment inside a label frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextHAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text placed in pixel space. Created fresh on every render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub font: Font,
    pub color: Color,
    /// Measured size of `text` before any frame padding.
    pub bounding_size: Size,
    pub frame: Rect,
    pub alpha: f64,
    pub background: Option<Color>,
    pub transform: Option<LabelTransform>,
    pub h_align: TextHAlign,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>, font: Font, color: Color, bounding_size: Size) -> Self {
        Self {
            text: text.into(),
            font,
            color,
            bounding_size,
            frame: Rect::from_origin_size(Point::ZERO, bounding_size),
            alpha: 1.0,
            background: None,
            transform: None,
            h_align: TextHAlign::Center,
        }
    }

    #[must_use]
    pub fn at(mut self, origin: Point) -> Self {
        self.frame = Rect::from_origin_size(origin, self.frame.size());
        self
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0 && !self.text.is_empty()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.frame.is_finite() {
            return Err(ChartError::InvalidData(
                "label frame must be finite".to_owned(),
            ));
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(ChartError::InvalidData(
                "label alpha must be finite and in [0, 1]".to_owned(),
            ));
        }
        self.font.validate()?;
        self.color.validate()?;
        if let Some(background) = self.background {
            background.validate()?;
        }
        Ok(())
    }
}

/// Measures rendered text extents for layout.
pub trait TextMeasure: std::fmt::Debug {
    fn measure(&self, text: &str, font: &Font) -> Size;
}

/// Deterministic, backend-independent text measurement.
///
/// Widths are per-glyph class estimates scaled by the font size; height is
/// the font size times `line_height_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedTextMeasure {
    pub line_height_ratio: f64,
    pub bold_width_ratio: f64,
}

impl Default for EstimatedTextMeasure {
    fn default() -> Self {
        Self {
            line_height_ratio: 1.2,
            bold_width_ratio: 1.08,
        }
    }
}

impl TextMeasure for EstimatedTextMeasure {
    fn measure(&self, text: &str, font: &Font) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.62,
                '.' | ',' => 0.34,
                '-' | '+' | '%' => 0.42,
                ' ' => 0.33,
                _ => 0.58,
            }
        });
        let weight = if font.bold { self.bold_width_ratio } else { 1.0 };
        Size::new(
            units * font.size_px * weight,
            font.size_px * self.line_height_ratio,
        )
    }
}
