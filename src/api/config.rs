use serde::{Deserialize, Serialize};

use crate::core::{IndexSpacing, Margins, RangePolicy, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::reference::ReferenceLines;
use crate::render::{Color, Font};

/// Style of the index-axis labels drawn under every data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPointLabelStyle {
    pub visible: bool,
    pub font: Font,
    pub color: Color,
    /// Distance between the bottom of the graph band and the label top.
    pub offset: f64,
}

impl Default for DataPointLabelStyle {
    fn default() -> Self {
        Self {
            visible: true,
            font: Font::system(10.0),
            color: Color::DARK_GRAY,
            offset: 4.0,
        }
    }
}

/// Serializable bootstrap configuration for a `GraphView`.
///
/// Only `viewport` is required; everything else falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub spacing: IndexSpacing,
    #[serde(default)]
    pub range_policy: RangePolicy,
    /// Extra indices built on each side of the visible window.
    #[serde(default = "default_offscreen_buffer")]
    pub offscreen_buffer: usize,
    #[serde(default)]
    pub reference_lines: Vec<ReferenceLines>,
    #[serde(default)]
    pub data_point_labels: DataPointLabelStyle,
}

impl GraphConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: Margins::default(),
            spacing: IndexSpacing::default(),
            range_policy: RangePolicy::default(),
            offscreen_buffer: default_offscreen_buffer(),
            reference_lines: Vec::new(),
            data_point_labels: DataPointLabelStyle::default(),
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    #[must_use]
    pub fn with_reference_lines(mut self, lines: ReferenceLines) -> Self {
        self.reference_lines.push(lines);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let viewport = self.viewport.validate()?;
        self.margins.validate(viewport)?;
        self.spacing.validate()?;
        self.range_policy.fixed.validate()?;
        for lines in &self.reference_lines {
            lines.validate()?;
        }
        let style = &self.data_point_labels;
        style.font.validate()?;
        style.color.validate()?;
        if !style.offset.is_finite() {
            return Err(ChartError::InvalidData(
                "data point label offset must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_offscreen_buffer() -> usize {
    2
}
