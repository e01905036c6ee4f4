pub mod bar_series;
pub mod coordinate;
pub mod dot_series;
pub mod line_series;
pub mod range;
pub mod types;

pub use bar_series::{
    BarFill, BarGeometry, BarLabelGaps, BarLabelPlacement, BarOverrides, BarShape,
    NoBarOverrides, bar_rect, build_bar_geometry, place_bar_label,
};
pub use coordinate::{CoordinateMapper, IndexSpacing, canonical_zero};
pub use dot_series::{
    CustomDotShape, DotLabelPlacement, DotPointType, append_marker, build_dot_path,
    place_dot_label,
};
pub use line_series::{LineGeometry, LineInterpolation, build_line_geometry};
pub use range::{AxisRange, RangePolicy};
pub use types::{ActiveInterval, DataPoint, Margins, PlotId, Point, Rect, Size, Viewport};
