use tracing::debug;

use crate::core::{LineInterpolation, PlotId, build_line_geometry};
use crate::render::{
    Color, DrawingLayer, LayerHandle, LayerKind, LineStrokeStyle, ShapeLayer, StrokeStyle,
    layer_handle,
};

use super::PlotContext;

/// Line through the data points, optionally filled down to the baseline.
#[derive(Debug)]
pub struct LinePlot {
    id: PlotId,
    pub line_color: Color,
    pub line_width: f64,
    pub line_style: LineStrokeStyle,
    pub interpolation: LineInterpolation,
    /// Fill under the line; `None` draws no fill layer.
    pub fill_color: Option<Color>,
    line_layer: Option<LayerHandle>,
    fill_layer: Option<LayerHandle>,
}

impl LinePlot {
    #[must_use]
    pub fn new(id: impl Into<PlotId>) -> Self {
        Self {
            id: id.into(),
            line_color: Color::BLACK,
            line_width: 2.0,
            line_style: LineStrokeStyle::Solid,
            interpolation: LineInterpolation::Straight,
            fill_color: None,
            line_layer: None,
            fill_layer: None,
        }
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: LineInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    #[must_use]
    pub fn id(&self) -> &PlotId {
        &self.id
    }

    pub(crate) fn layers(&mut self, context: &PlotContext<'_>) -> Vec<LayerHandle> {
        self.line_layer = Some(layer_handle(DrawingLayer::new(
            LayerKind::Line,
            Some(self.id.clone()),
        )));
        self.fill_layer = self
            .fill_color
            .map(|_| layer_handle(DrawingLayer::new(LayerKind::Fill, Some(self.id.clone()))));
        self.rebuild(context);
        self.current_layers()
    }

    pub(crate) fn rebuild(&mut self, context: &PlotContext<'_>) {
        let Some(line_layer) = &self.line_layer else {
            return;
        };
        let baseline = self
            .fill_layer
            .as_ref()
            .map(|_| context.host.zero_y_position());
        let geometry = build_line_geometry(
            context.host.active_index_interval(),
            self.interpolation,
            baseline,
            |index| context.host.point_location(&self.id, index),
        );

        let stroke =
            StrokeStyle::solid(self.line_color, self.line_width).with_pattern(self.line_style);
        {
            let mut layer = line_layer.borrow_mut();
            layer.shape = ShapeLayer::stroked(geometry.line, stroke);
            layer.generation += 1;
        }
        if let (Some(fill_layer), Some(color)) = (&self.fill_layer, self.fill_color) {
            let mut layer = fill_layer.borrow_mut();
            layer.shape = ShapeLayer::filled(geometry.fill.unwrap_or_default(), color);
            layer.generation += 1;
        }
        debug!(plot = %self.id, points = geometry.points.len(), "line plot rebuilt");
    }

    pub(crate) fn current_layers(&self) -> Vec<LayerHandle> {
        self.fill_layer
            .iter()
            .chain(self.line_layer.iter())
            .cloned()
            .collect()
    }
}
