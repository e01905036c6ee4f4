use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Data-value window mapped to the vertical extent of the graph band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    min: f64,
    max: f64,
}

impl Default for AxisRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ChartError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Re-checks bounds of a range that bypassed `new`, e.g. after deserialization.
    pub fn validate(self) -> ChartResult<Self> {
        Self::new(self.min, self.max)
    }

    /// Smallest window containing every finite value, or `None` if there is none.
    #[must_use]
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut bounds: Option<(OrderedFloat<f64>, OrderedFloat<f64>)> = None;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            let value = OrderedFloat(value);
            bounds = Some(match bounds {
                None => (value, value),
                Some((min, max)) => (min.min(value), max.max(value)),
            });
        }
        bounds.map(|(min, max)| Self {
            min: min.into_inner(),
            max: max.into_inner(),
        })
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// `true` when every value in the window is identical.
    #[must_use]
    pub fn is_flat(self) -> bool {
        self.min == self.max
    }

    /// Widens the window so that it includes zero.
    #[must_use]
    pub fn including_zero(self) -> Self {
        Self {
            min: self.min.min(0.0),
            max: self.max.max(0.0),
        }
    }
}

/// How the axis range follows the visible data window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangePolicy {
    /// Range used when adaptation is off or no value is available.
    pub fixed: AxisRange,
    /// Recalculate the range from the values in the active interval.
    pub adapt_to_visible: bool,
    /// Keep zero inside an adapted range.
    pub always_start_at_zero: bool,
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self {
            fixed: AxisRange::default(),
            adapt_to_visible: false,
            always_start_at_zero: false,
        }
    }
}

impl RangePolicy {
    #[must_use]
    pub fn fixed(range: AxisRange) -> Self {
        Self {
            fixed: range,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn adaptive() -> Self {
        Self {
            adapt_to_visible: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_zero_baseline(mut self) -> Self {
        self.always_start_at_zero = true;
        self
    }

    /// Resolves the range for the values currently in the active window.
    #[must_use]
    pub fn resolve<I>(self, visible_values: I) -> AxisRange
    where
        I: IntoIterator<Item = f64>,
    {
        if !self.adapt_to_visible {
            return self.fixed;
        }
        let Some(range) = AxisRange::from_values(visible_values) else {
            return self.fixed;
        };
        if self.always_start_at_zero {
            range.including_zero()
        } else {
            range
        }
    }
}
