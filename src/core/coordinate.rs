use serde::{Deserialize, Serialize};

use crate::core::{ActiveInterval, AxisRange, Margins, Point, Viewport};
use crate::error::{ChartError, ChartResult};

/// Horizontal placement of data indices inside the scrollable content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSpacing {
    pub left_padding: f64,
    pub data_point_spacing: f64,
    pub right_padding: f64,
}

impl Default for IndexSpacing {
    fn default() -> Self {
        Self {
            left_padding: 50.0,
            data_point_spacing: 40.0,
            right_padding: 50.0,
        }
    }
}

impl IndexSpacing {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.data_point_spacing.is_finite() || self.data_point_spacing <= 0.0 {
            return Err(ChartError::InvalidData(
                "data point spacing must be finite and > 0".to_owned(),
            ));
        }
        if !self.left_padding.is_finite() || !self.right_padding.is_finite() {
            return Err(ChartError::InvalidData(
                "index paddings must be finite".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn x_at(self, index: usize) -> f64 {
        self.left_padding + index as f64 * self.data_point_spacing
    }

    /// Total scrollable width needed for `point_count` samples.
    #[must_use]
    pub fn content_width(self, point_count: usize) -> f64 {
        let span = point_count.saturating_sub(1) as f64 * self.data_point_spacing;
        self.left_padding + span + self.right_padding
    }

    /// Indices visible for a horizontal scroll `offset`, widened by `buffer`
    /// indices on each side and clamped to `point_count`.
    #[must_use]
    pub fn index_window(
        self,
        offset: f64,
        viewport_width: f64,
        point_count: usize,
        buffer: usize,
    ) -> Option<ActiveInterval> {
        if point_count == 0 || !offset.is_finite() || !viewport_width.is_finite() {
            return None;
        }
        let first = ((offset - self.left_padding) / self.data_point_spacing).floor();
        let last = ((offset + viewport_width - self.left_padding) / self.data_point_spacing).ceil();
        if last < 0.0 {
            return None;
        }
        let first = (first.max(0.0) as usize).saturating_sub(buffer);
        let last = (last as usize).saturating_add(buffer);
        ActiveInterval::clamped(first, last, point_count)
    }
}

/// Maps data values to viewport pixels for the current axis range.
///
/// `value = ((y - top) / graph_height) * (min - max) + max`, where
/// `graph_height = viewport_height - top - bottom`. `screen_y_at` is the
/// algebraic inverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    viewport: Viewport,
    margins: Margins,
    range: AxisRange,
    spacing: IndexSpacing,
}

impl CoordinateMapper {
    pub fn new(viewport: Viewport, margins: Margins, range: AxisRange) -> ChartResult<Self> {
        let viewport = viewport.validate()?;
        let margins = margins.validate(viewport)?;
        Ok(Self {
            viewport,
            margins,
            range,
            spacing: IndexSpacing::default(),
        })
    }

    pub fn with_spacing(mut self, spacing: IndexSpacing) -> ChartResult<Self> {
        self.spacing = spacing.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_range(mut self, range: AxisRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn margins(self) -> Margins {
        self.margins
    }

    #[must_use]
    pub fn range(self) -> AxisRange {
        self.range
    }

    #[must_use]
    pub fn spacing(self) -> IndexSpacing {
        self.spacing
    }

    #[must_use]
    pub fn graph_height(self) -> f64 {
        self.margins.graph_height(self.viewport)
    }

    #[must_use]
    pub fn graph_top(self) -> f64 {
        self.margins.top
    }

    #[must_use]
    pub fn graph_bottom(self) -> f64 {
        self.viewport.height - self.margins.bottom
    }

    /// Data value shown at pixel row `screen_y`.
    #[must_use]
    pub fn value_at(self, screen_y: f64) -> f64 {
        let normalized = (screen_y - self.margins.top) / self.graph_height();
        let value = normalized * (self.range.min() - self.range.max()) + self.range.max();
        canonical_zero(value)
    }

    /// Pixel row of `value`. A flat range maps every value onto the top margin.
    #[must_use]
    pub fn screen_y_at(self, value: f64) -> f64 {
        if self.range.is_flat() {
            return canonical_zero(self.margins.top);
        }
        let normalized = (value - self.range.max()) / (self.range.min() - self.range.max());
        canonical_zero(normalized * self.graph_height() + self.margins.top)
    }

    /// Pixel row for a fraction of the graph band measured from the bottom.
    #[must_use]
    pub fn screen_y_at_fraction(self, fraction: f64) -> f64 {
        canonical_zero(self.margins.top + self.graph_height() * (1.0 - fraction))
    }

    #[must_use]
    pub fn x_at(self, index: usize) -> f64 {
        self.spacing.x_at(index)
    }

    #[must_use]
    pub fn point_at(self, index: usize, value: f64) -> Point {
        Point::new(self.x_at(index), self.screen_y_at(value))
    }

    /// Baseline for bars and fills: the row of value zero, clamped to the graph band.
    #[must_use]
    pub fn zero_y_position(self) -> f64 {
        self.screen_y_at(0.0)
            .clamp(self.graph_top(), self.graph_bottom())
    }
}

/// Folds `-0.0` into `0.0` so formatted labels never read "-0".
#[must_use]
pub fn canonical_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::{CoordinateMapper, IndexSpacing, canonical_zero};
    use crate::core::{AxisRange, Margins, Viewport};

    fn mapper(min: f64, max: f64) -> CoordinateMapper {
        CoordinateMapper::new(
            Viewport::new(300.0, 200.0),
            Margins::new(10.0, 10.0),
            AxisRange::new(min, max).expect("range"),
        )
        .expect("mapper")
    }

    #[test]
    fn maps_reference_scenario() {
        let mapper = mapper(0.0, 100.0);
        assert_eq!(mapper.screen_y_at(50.0), 100.0);
        assert_eq!(mapper.screen_y_at(100.0), 10.0);
        assert_eq!(mapper.screen_y_at(0.0), 190.0);
        assert_eq!(mapper.value_at(100.0), 50.0);
    }

    #[test]
    fn flat_range_degenerates_to_top_margin() {
        let mapper = mapper(42.0, 42.0);
        assert_eq!(mapper.screen_y_at(42.0), 10.0);
        assert_eq!(mapper.screen_y_at(-7.0), 10.0);
        assert_eq!(mapper.value_at(150.0), 42.0);
    }

    #[test]
    fn negative_zero_is_canonicalized() {
        let mapper = mapper(-100.0, 100.0);
        let value = mapper.value_at(100.0);
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
        assert!(canonical_zero(-0.0).is_sign_positive());
    }

    #[test]
    fn rejects_viewport_without_graph_band() {
        let result = CoordinateMapper::new(
            Viewport::new(300.0, 20.0),
            Margins::new(10.0, 10.0),
            AxisRange::default(),
        );
        assert!(result.is_err());
        assert!(
            CoordinateMapper::new(
                Viewport::new(0.0, 200.0),
                Margins::default(),
                AxisRange::default()
            )
            .is_err()
        );
    }

    #[test]
    fn index_window_tracks_scroll_offset() {
        let spacing = IndexSpacing::default();
        let window = spacing
            .index_window(0.0, 300.0, 30, 0)
            .expect("window");
        assert_eq!((window.lo(), window.hi()), (0, 7));

        let window = spacing
            .index_window(400.0, 300.0, 30, 1)
            .expect("window");
        assert_eq!((window.lo(), window.hi()), (7, 18));

        assert!(spacing.index_window(0.0, 300.0, 0, 1).is_none());
        assert_eq!(spacing.content_width(30), 50.0 + 29.0 * 40.0 + 50.0);
    }

    #[test]
    fn zero_baseline_is_clamped_into_graph_band() {
        let mapper = mapper(20.0, 100.0);
        assert_eq!(mapper.zero_y_position(), 190.0);
        let mapper = mapper.with_range(AxisRange::new(-50.0, 50.0).expect("range"));
        assert_eq!(mapper.zero_y_position(), 100.0);
    }
}
