use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Stable identifier of a plot, used by data sources to tell series apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlotId(String);

impl PlotId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlotId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlotId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Pixel size of the drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    #[must_use]
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Vertical insets between the viewport edges and the graph band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            bottom: 10.0,
        }
    }
}

impl Margins {
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Height left for the graph band inside `viewport`.
    #[must_use]
    pub fn graph_height(self, viewport: Viewport) -> f64 {
        viewport.height - (self.top + self.bottom)
    }

    pub fn validate(self, viewport: Viewport) -> ChartResult<Self> {
        if !self.top.is_finite() || !self.bottom.is_finite() || self.top < 0.0 || self.bottom < 0.0
        {
            return Err(ChartError::InvalidData(
                "margins must be finite and >= 0".to_owned(),
            ));
        }
        if self.graph_height(viewport) <= 0.0 {
            return Err(ChartError::InvalidMargins {
                top: self.top,
                bottom: self.bottom,
                height: viewport.height,
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle in pixel space, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[must_use]
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn left(self) -> f64 {
        self.x.min(self.x + self.width)
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x.max(self.x + self.width)
    }

    #[must_use]
    pub fn top(self) -> f64 {
        self.y.min(self.y + self.height)
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y.max(self.y + self.height)
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.x + self.width * 0.5
    }

    /// Returns the same rectangle with non-negative width and height.
    #[must_use]
    pub fn standardized(self) -> Self {
        Self::new(
            self.left(),
            self.top(),
            self.width.abs(),
            self.height.abs(),
        )
    }

    /// Grows the rectangle horizontally by `dx` on each side.
    #[must_use]
    pub fn inset_horizontal(self, dx: f64) -> Self {
        Self::new(self.x - dx, self.y, self.width + dx * 2.0, self.height)
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// One resolved sample for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub index: usize,
    pub value: f64,
    pub screen_position: Point,
}

impl DataPoint {
    #[must_use]
    pub fn new(index: usize, value: f64, screen_position: Point) -> Self {
        Self {
            index,
            value,
            screen_position,
        }
    }
}

/// Inclusive, contiguous range of data indices that need geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveInterval {
    lo: usize,
    hi: usize,
}

impl ActiveInterval {
    /// Creates `[lo, hi]`. Bounds are swapped when given in reverse order.
    #[must_use]
    pub fn new(lo: usize, hi: usize) -> Self {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    /// Clamps `[lo, hi]` to valid indices of a source with `point_count` points.
    ///
    /// Returns `None` when no valid index remains.
    #[must_use]
    pub fn clamped(lo: usize, hi: usize, point_count: usize) -> Option<Self> {
        if point_count == 0 {
            return None;
        }
        let last = point_count - 1;
        let interval = Self::new(lo, hi);
        if interval.lo > last {
            return None;
        }
        Some(Self::new(interval.lo, interval.hi.min(last)))
    }

    #[must_use]
    pub fn lo(self) -> usize {
        self.lo
    }

    #[must_use]
    pub fn hi(self) -> usize {
        self.hi
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.hi - self.lo + 1
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index >= self.lo && index <= self.hi
    }

    pub fn iter(self) -> std::ops::RangeInclusive<usize> {
        self.lo..=self.hi
    }
}

impl IntoIterator for ActiveInterval {
    type Item = usize;
    type IntoIter = std::ops::RangeInclusive<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveInterval, Margins, Rect, Viewport};

    #[test]
    fn active_interval_normalizes_and_clamps() {
        let interval = ActiveInterval::new(9, 3);
        assert_eq!((interval.lo(), interval.hi()), (3, 9));
        assert_eq!(interval.len(), 7);

        let clamped = ActiveInterval::clamped(2, 40, 10).expect("clamped");
        assert_eq!((clamped.lo(), clamped.hi()), (2, 9));
        assert!(ActiveInterval::clamped(12, 20, 10).is_none());
        assert!(ActiveInterval::clamped(0, 0, 0).is_none());
    }

    #[test]
    fn margins_reject_degenerate_graph_band() {
        let viewport = Viewport::new(300.0, 20.0);
        assert!(Margins::new(10.0, 10.0).validate(viewport).is_err());
        assert!(Margins::new(5.0, 5.0).validate(viewport).is_ok());
    }

    #[test]
    fn rect_standardizes_negative_extent() {
        let rect = Rect::new(10.0, 50.0, 4.0, -20.0).standardized();
        assert_eq!(rect, Rect::new(10.0, 30.0, 4.0, 20.0));
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).intersects(Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).intersects(Rect::new(10.0, 0.0, 10.0, 10.0)));
    }
}
