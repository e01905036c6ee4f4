use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ActiveInterval, Point, Rect, Size};
use crate::render::{Color, GeneratedPath};

/// Geometry options shared by every bar of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarShape {
    pub width: f64,
    pub round_corners: bool,
}

impl Default for BarShape {
    fn default() -> Self {
        Self {
            width: 25.0,
            round_corners: false,
        }
    }
}

/// Per-index overrides resolved from the data source.
pub trait BarOverrides {
    fn custom_width(&self, _index: usize) -> Option<f64> {
        None
    }

    fn custom_fill(&self, _index: usize) -> Option<Color> {
        None
    }
}

/// No per-index overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBarOverrides;

impl BarOverrides for NoBarOverrides {}

/// A solid rectangle drawn above the shared bar path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFill {
    pub index: usize,
    pub rect: Rect,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarGeometry {
    pub path: GeneratedPath,
    pub fills: Vec<BarFill>,
    /// Bar rectangle of every located index, used for value label placement.
    pub frames: IndexMap<usize, Rect>,
}

/// Rectangle of a bar centred on `location.x`, reaching from `location.y`
/// down to `zero_y`.
#[must_use]
pub fn bar_rect(location: Point, width: f64, zero_y: f64) -> Rect {
    Rect::new(
        location.x - width / 2.0,
        location.y,
        width,
        zero_y - location.y,
    )
}

pub fn build_bar_geometry<F, O>(
    interval: Option<ActiveInterval>,
    shape: BarShape,
    zero_y: f64,
    overrides: &O,
    mut location: F,
) -> BarGeometry
where
    F: FnMut(usize) -> Option<Point>,
    O: BarOverrides + ?Sized,
{
    let Some(interval) = interval else {
        return BarGeometry::default();
    };

    let mut geometry = BarGeometry::default();
    for index in interval {
        let Some(point) = location(index).filter(|point| point.is_finite()) else {
            trace!(index, "bar skipped: no location");
            continue;
        };
        let width = overrides
            .custom_width(index)
            .filter(|width| width.is_finite() && *width > 0.0)
            .unwrap_or(shape.width);
        let rect = bar_rect(point, width, zero_y);

        if shape.round_corners {
            geometry.path.add_rounded_rect(rect, width / 2.0);
        } else {
            geometry.path.add_rect(rect);
        }
        if let Some(color) = overrides.custom_fill(index) {
            geometry.fills.push(BarFill { index, rect, color });
        }
        geometry.frames.insert(index, rect);
    }
    geometry
}

/// Where a bar value label ends up relative to its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarLabelPlacement {
    Outside,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLabelGaps {
    /// Distance between an outside label and the bar top.
    pub outside: f64,
    /// Distance between the bar top and an inside label.
    pub inside: f64,
}

impl Default for BarLabelGaps {
    fn default() -> Self {
        Self {
            outside: 3.0,
            inside: 10.0,
        }
    }
}

/// Places a value label for the bar at `location`.
///
/// The label is at least as wide as the bar. It goes outside (beyond the
/// bar end) when it would not fit between the bar end and the baseline.
/// Bars hanging below the baseline mirror the placement downwards.
#[must_use]
pub fn place_bar_label(
    location: Point,
    label_size: Size,
    bar: Rect,
    gaps: BarLabelGaps,
) -> (Rect, BarLabelPlacement) {
    let width = label_size.width.max(bar.width.abs());
    let x = location.x - width / 2.0;
    let height = label_size.height;
    let hangs_down = location.y > bar.top();

    let (y, placement) = if hangs_down {
        if location.y - height < bar.top() {
            (location.y + gaps.outside, BarLabelPlacement::Outside)
        } else {
            (location.y - gaps.inside - height, BarLabelPlacement::Inside)
        }
    } else if location.y + height > bar.bottom() {
        (location.y - height - gaps.outside, BarLabelPlacement::Outside)
    } else {
        (location.y + gaps.inside, BarLabelPlacement::Inside)
    };
    (Rect::new(x, y, width, height), placement)
}
