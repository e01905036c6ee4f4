use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Font, LabelTransform, LineStrokeStyle};

/// How `ReferenceLines::positions` are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferenceLinePositioning {
    /// Fractions of the graph band measured from the bottom, in `[0, 1]`.
    #[default]
    Relative,
    /// Literal data values.
    Absolute,
}

/// Which ends of a reference line carry a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferenceLabelPlacement {
    #[default]
    Left,
    Right,
    Both,
}

/// Digit grouping applied by the label formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberStyle {
    #[default]
    Plain,
    /// Thousands separators.
    Grouped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberLocale {
    #[default]
    EnUs,
    EsEs,
}

/// Configuration of one set of horizontal reference lines.
///
/// Missing JSON fields take their `Default` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceLines {
    pub position_type: ReferenceLinePositioning,
    pub positions: Vec<f64>,
    /// Draw lines at the top and bottom margins labelled with the range bounds.
    pub include_min_max: bool,
    pub style: LineStrokeStyle,
    pub label_placement: ReferenceLabelPlacement,
    pub units: Option<String>,

    pub add_labels_to_intermediate_lines: bool,
    pub add_units_to_intermediate_labels: bool,
    pub decimal_places: u32,
    pub number_style: NumberStyle,
    pub locale: NumberLocale,

    pub label_font: Font,
    pub label_color: Color,
    pub line_color: Color,
    pub line_thickness: f64,
    /// Background behind right-hand labels.
    pub label_background_color: Color,
    pub label_transform: Option<LabelTransform>,

    pub guard_line_for_right_labels: bool,
    pub guard_line_for_left_labels: bool,
    /// Keep edge lines solid when `style` is dashed.
    pub outer_line_solid_when_dashed: bool,

    pub label_inset: f64,
    pub label_margin: f64,
    pub guard_offset: f64,
}

impl Default for ReferenceLines {
    fn default() -> Self {
        Self {
            position_type: ReferenceLinePositioning::Relative,
            positions: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            include_min_max: true,
            style: LineStrokeStyle::Solid,
            label_placement: ReferenceLabelPlacement::Left,
            units: None,
            add_labels_to_intermediate_lines: true,
            add_units_to_intermediate_labels: false,
            decimal_places: 0,
            number_style: NumberStyle::Plain,
            locale: NumberLocale::EnUs,
            label_font: Font::system(8.0),
            label_color: Color::BLACK,
            line_color: Color::BLACK,
            line_thickness: 0.5,
            label_background_color: Color::WHITE,
            label_transform: None,
            guard_line_for_right_labels: false,
            guard_line_for_left_labels: false,
            outer_line_solid_when_dashed: false,
            label_inset: 10.0,
            label_margin: 4.0,
            guard_offset: 3.0,
        }
    }
}

impl ReferenceLines {
    #[must_use]
    pub fn relative(positions: impl Into<Vec<f64>>) -> Self {
        Self {
            position_type: ReferenceLinePositioning::Relative,
            positions: positions.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn absolute(positions: impl Into<Vec<f64>>) -> Self {
        Self {
            position_type: ReferenceLinePositioning::Absolute,
            positions: positions.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: LineStrokeStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: ReferenceLabelPlacement) -> Self {
        self.label_placement = placement;
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    #[must_use]
    pub fn with_min_max(mut self, include: bool) -> Self {
        self.include_min_max = include;
        self
    }

    /// Unit suffix including its leading separator, or an empty string.
    #[must_use]
    pub fn unit_suffix(&self) -> String {
        match self.units.as_deref() {
            Some(units) if !units.is_empty() => format!(" {units}"),
            _ => String::new(),
        }
    }

    /// Edge guards are only in effect while one of the guard modes is on.
    #[must_use]
    pub fn guard_mode(&self) -> GuardMode {
        if self.guard_line_for_right_labels {
            GuardMode::Right
        } else if self.guard_line_for_left_labels {
            GuardMode::Left
        } else {
            GuardMode::Off
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.positions.iter().any(|position| !position.is_finite()) {
            return Err(ChartError::InvalidData(
                "reference line positions must be finite".to_owned(),
            ));
        }
        if self.position_type == ReferenceLinePositioning::Relative
            && self
                .positions
                .iter()
                .any(|position| !(0.0..=1.0).contains(position))
        {
            return Err(ChartError::InvalidData(
                "relative reference line positions must be in [0, 1]".to_owned(),
            ));
        }
        if !self.line_thickness.is_finite() || self.line_thickness <= 0.0 {
            return Err(ChartError::InvalidData(
                "reference line thickness must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("label inset", self.label_inset),
            ("label margin", self.label_margin),
            ("guard offset", self.guard_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        self.label_font.validate()?;
        self.label_color.validate()?;
        self.line_color.validate()?;
        self.label_background_color.validate()
    }
}

/// Guard-line mode; right-label guards take precedence over left-label guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardMode {
    Off,
    Right,
    Left,
}
