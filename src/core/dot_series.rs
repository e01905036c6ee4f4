use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ActiveInterval, Point, Rect, Size};
use crate::render::GeneratedPath;

/// Marker drawn at each data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DotPointType {
    #[default]
    Circle,
    Square,
    /// Shape produced by a caller-provided callback; circle when none is set.
    Custom,
}

/// Callback building a custom marker centred on the given point.
pub type CustomDotShape = Box<dyn Fn(Point) -> GeneratedPath>;

/// Appends one marker of `size` (radius or half side) at `center`.
pub fn append_marker(
    path: &mut GeneratedPath,
    point_type: DotPointType,
    size: f64,
    center: Point,
    custom: Option<&CustomDotShape>,
) {
    match (point_type, custom) {
        (DotPointType::Square, _) => {
            let top_left = center.offset(-size, -size);
            let side = size * 2.0;
            path.move_to(top_left);
            path.line_to(top_left.offset(side, 0.0));
            path.line_to(top_left.offset(side, side));
            path.line_to(top_left.offset(0.0, side));
            path.line_to(top_left);
        }
        (DotPointType::Custom, Some(shape)) => path.append(&shape(center)),
        (DotPointType::Circle | DotPointType::Custom, _) => path.add_circle(center, size),
    }
}

pub fn build_dot_path<F>(
    interval: Option<ActiveInterval>,
    point_type: DotPointType,
    size: f64,
    custom: Option<&CustomDotShape>,
    mut location: F,
) -> GeneratedPath
where
    F: FnMut(usize) -> Option<Point>,
{
    let mut path = GeneratedPath::new();
    let Some(interval) = interval else {
        return path;
    };
    for index in interval {
        match location(index) {
            Some(center) if center.is_finite() => {
                append_marker(&mut path, point_type, size, center, custom);
            }
            _ => trace!(index, "dot skipped: no location"),
        }
    }
    path
}

/// Vertical placement of a dot value label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DotLabelPlacement {
    /// Above the dot.
    Outside,
    /// Below the dot.
    Inside,
    /// Bottom edge on the dot centre.
    #[default]
    AtPoint,
}

impl DotLabelPlacement {
    /// Outside wins when both flags are set.
    #[must_use]
    pub fn from_flags(outside: bool, inside: bool) -> Self {
        if outside {
            Self::Outside
        } else if inside {
            Self::Inside
        } else {
            Self::AtPoint
        }
    }
}

/// Frame of a dot value label of `size`, horizontally centred on `location`.
#[must_use]
pub fn place_dot_label(
    location: Point,
    size: Size,
    placement: DotLabelPlacement,
    offset: Point,
) -> Rect {
    let base_y = location.y - size.height;
    let y = match placement {
        DotLabelPlacement::Outside => base_y - 10.0,
        DotLabelPlacement::Inside => base_y + 20.0,
        DotLabelPlacement::AtPoint => base_y,
    };
    Rect::new(
        location.x - size.width / 2.0 + offset.x,
        y + offset.y,
        size.width,
        size.height,
    )
}
