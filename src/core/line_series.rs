use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ActiveInterval, Point};
use crate::render::GeneratedPath;

/// How consecutive line points are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineInterpolation {
    #[default]
    Straight,
    /// Quadratic curves through the midpoints of consecutive points.
    Smooth,
}

/// Output of one line rebuild: the stroke path and an optional closed fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineGeometry {
    pub line: GeneratedPath,
    pub fill: Option<GeneratedPath>,
    pub points: Vec<Point>,
}

/// Builds the line path through every located index of `interval`.
///
/// Indices without a location are skipped. When `fill_baseline` is set the
/// fill path follows the line and is closed down to that pixel row.
pub fn build_line_geometry<F>(
    interval: Option<ActiveInterval>,
    interpolation: LineInterpolation,
    fill_baseline: Option<f64>,
    mut location: F,
) -> LineGeometry
where
    F: FnMut(usize) -> Option<Point>,
{
    let Some(interval) = interval else {
        return LineGeometry::default();
    };

    let mut points = Vec::with_capacity(interval.len());
    for index in interval {
        match location(index) {
            Some(point) if point.is_finite() => points.push(point),
            _ => trace!(index, "line point skipped: no location"),
        }
    }

    let mut line = GeneratedPath::new();
    trace_line(&mut line, &points, interpolation);

    let fill = match (fill_baseline, points.first(), points.last()) {
        (Some(baseline), Some(first), Some(last)) if points.len() > 1 => {
            let mut fill = GeneratedPath::new();
            fill.move_to(Point::new(first.x, baseline));
            fill.line_to(*first);
            append_through(&mut fill, &points, interpolation);
            fill.line_to(Point::new(last.x, baseline));
            fill.close();
            Some(fill)
        }
        _ => None,
    };

    LineGeometry { line, fill, points }
}

fn trace_line(path: &mut GeneratedPath, points: &[Point], interpolation: LineInterpolation) {
    let Some(first) = points.first() else {
        return;
    };
    path.move_to(*first);
    append_through(path, points, interpolation);
}

// Assumes the current point is `points[0]`.
fn append_through(path: &mut GeneratedPath, points: &[Point], interpolation: LineInterpolation) {
    match interpolation {
        LineInterpolation::Straight => {
            for point in points.iter().skip(1) {
                path.line_to(*point);
            }
        }
        LineInterpolation::Smooth => {
            for pair in points.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
                path.quad_to(Point::new(mid.x, from.y), mid);
                path.quad_to(Point::new(mid.x, to.y), to);
            }
        }
    }
}
