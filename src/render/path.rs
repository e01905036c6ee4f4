//! Vector path primitives produced by the path builders.
//!
//! A `GeneratedPath` is rebuilt from scratch on every range, viewport or data
//! change; there is no incremental patching.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Start a new sub-path.
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    /// Circular arc around `center`; angles in radians.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    },
    /// Closed axis-aligned rectangle sub-path.
    Rect(Rect),
    /// Closed rectangle sub-path with circular corners.
    RoundedRect { rect: Rect, corner_radius: f64 },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPath {
    commands: Vec<PathCommand>,
}

impl GeneratedPath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn move_to(&mut self, point: Point) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Point) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn quad_to(&mut self, control: Point, to: Point) {
        self.commands.push(PathCommand::QuadTo { control, to });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Appends a straight `from -> to` sub-path.
    pub fn add_segment(&mut self, from: Point, to: Point) {
        self.move_to(from);
        self.line_to(to);
    }

    pub fn add_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) {
        let (sin, cos) = start_angle.sin_cos();
        self.move_to(Point::new(center.x + radius * cos, center.y + radius * sin));
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        });
    }

    pub fn add_circle(&mut self, center: Point, radius: f64) {
        self.add_arc(center, radius, 0.0, TAU, true);
        self.close();
    }

    pub fn add_rect(&mut self, rect: Rect) {
        self.commands.push(PathCommand::Rect(rect));
    }

    pub fn add_rounded_rect(&mut self, rect: Rect, corner_radius: f64) {
        self.commands.push(PathCommand::RoundedRect {
            rect,
            corner_radius,
        });
    }

    /// Appends every command of `other`, keeping its sub-path boundaries.
    pub fn append(&mut self, other: &GeneratedPath) {
        self.commands.extend_from_slice(&other.commands);
    }

    /// Number of sub-paths (each `MoveTo`, `Rect` or `RoundedRect` starts one).
    #[must_use]
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    PathCommand::MoveTo(_) | PathCommand::Rect(_) | PathCommand::RoundedRect { .. }
                )
            })
            .count()
    }

    /// Straight `MoveTo` + `LineTo` pairs, in emission order.
    #[must_use]
    pub fn line_segments(&self) -> Vec<(Point, Point)> {
        self.commands
            .windows(2)
            .filter_map(|pair| match (pair[0], pair[1]) {
                (PathCommand::MoveTo(from), PathCommand::LineTo(to)) => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    /// Conservative bounding box of every command.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut include = |point: Point| {
            min = Point::new(min.x.min(point.x), min.y.min(point.y));
            max = Point::new(max.x.max(point.x), max.y.max(point.y));
        };

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(point) | PathCommand::LineTo(point) => include(point),
                PathCommand::QuadTo { control, to } => {
                    include(control);
                    include(to);
                }
                PathCommand::Arc { center, radius, .. } => {
                    include(center.offset(-radius, -radius));
                    include(center.offset(radius, radius));
                }
                PathCommand::Rect(rect) | PathCommand::RoundedRect { rect, .. } => {
                    let rect = rect.standardized();
                    include(rect.origin());
                    include(Point::new(rect.right(), rect.bottom()));
                }
                PathCommand::Close => {}
            }
        }

        if min.is_finite() && max.is_finite() {
            Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
        } else {
            None
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for command in &self.commands {
            let finite = match *command {
                PathCommand::MoveTo(point) | PathCommand::LineTo(point) => point.is_finite(),
                PathCommand::QuadTo { control, to } => control.is_finite() && to.is_finite(),
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    ..
                } => {
                    center.is_finite()
                        && radius.is_finite()
                        && radius >= 0.0
                        && start_angle.is_finite()
                        && end_angle.is_finite()
                }
                PathCommand::Rect(rect) => rect.is_finite(),
                PathCommand::RoundedRect {
                    rect,
                    corner_radius,
                } => rect.is_finite() && corner_radius.is_finite() && corner_radius >= 0.0,
                PathCommand::Close => true,
            };
            if !finite {
                return Err(ChartError::InvalidData(
                    "path coordinates must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
