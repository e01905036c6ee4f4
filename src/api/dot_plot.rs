use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::core::{
    CustomDotShape, DotLabelPlacement, DotPointType, PlotId, Point, build_dot_path,
    place_dot_label,
};
use crate::render::{
    Color, DrawingLayer, Font, Label, LayerHandle, LayerKind, ShapeLayer, TextHAlign,
    layer_handle,
};

use super::{LabelPhase, PlotContext};

/// A marker at every data point.
pub struct DotPlot {
    id: PlotId,
    pub point_type: DotPointType,
    /// Circle radius or half the square side.
    pub size: f64,
    pub fill_color: Color,
    pub display_values: bool,
    pub value_font: Font,
    custom_shape: Option<CustomDotShape>,
    layer: Option<LayerHandle>,
    phase: LabelPhase,
}

impl fmt::Debug for DotPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DotPlot")
            .field("id", &self.id)
            .field("point_type", &self.point_type)
            .field("size", &self.size)
            .field("fill_color", &self.fill_color)
            .field("display_values", &self.display_values)
            .field("custom_shape", &self.custom_shape.is_some())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl DotPlot {
    #[must_use]
    pub fn new(id: impl Into<PlotId>) -> Self {
        Self {
            id: id.into(),
            point_type: DotPointType::Circle,
            size: 5.0,
            fill_color: Color::BLACK,
            display_values: true,
            value_font: Font::system(10.0),
            custom_shape: None,
            layer: None,
            phase: LabelPhase::Disabled,
        }
    }

    #[must_use]
    pub fn with_point_type(mut self, point_type: DotPointType) -> Self {
        self.point_type = point_type;
        self
    }

    #[must_use]
    pub fn without_values(mut self) -> Self {
        self.display_values = false;
        self
    }

    /// Sets the marker builder used by `DotPointType::Custom`.
    #[must_use]
    pub fn with_custom_shape<F>(mut self, shape: F) -> Self
    where
        F: Fn(Point) -> crate::render::GeneratedPath + 'static,
    {
        self.custom_shape = Some(Box::new(shape));
        self.point_type = DotPointType::Custom;
        self
    }

    #[must_use]
    pub fn id(&self) -> &PlotId {
        &self.id
    }

    #[must_use]
    pub fn label_phase(&self) -> LabelPhase {
        self.phase
    }

    pub(crate) fn layers(&mut self, context: &PlotContext<'_>) -> Vec<LayerHandle> {
        self.layer = Some(layer_handle(DrawingLayer::new(
            LayerKind::Dot,
            Some(self.id.clone()),
        )));
        self.phase = if self.display_values {
            LabelPhase::Pending
        } else {
            LabelPhase::Disabled
        };
        self.rebuild(context);
        self.current_layers()
    }

    pub(crate) fn rebuild(&mut self, context: &PlotContext<'_>) {
        let Some(layer) = self.layer.clone() else {
            return;
        };
        let path = build_dot_path(
            context.host.active_index_interval(),
            self.point_type,
            self.size,
            self.custom_shape.as_ref(),
            |index| context.host.point_location(&self.id, index),
        );
        let labels = match self.phase {
            LabelPhase::Attached => self.value_labels(context),
            LabelPhase::Disabled | LabelPhase::Pending => Vec::new(),
        };

        let mut layer = layer.borrow_mut();
        layer.clear_attachments();
        layer.shape = ShapeLayer::filled(path, self.fill_color);
        layer.replace_labels(labels);
        layer.generation += 1;
        debug!(
            plot = %self.id,
            commands = layer.shape.path.len(),
            labels = layer.labels.len(),
            "dot plot rebuilt"
        );
    }

    pub(crate) fn current_layers(&self) -> Vec<LayerHandle> {
        self.layer.iter().cloned().collect()
    }

    pub(crate) fn attach_value_labels(
        &mut self,
        layer: &LayerHandle,
        context: &PlotContext<'_>,
    ) -> bool {
        let owned = self
            .layer
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, layer));
        if !owned || self.phase == LabelPhase::Disabled {
            return false;
        }
        let labels = self.value_labels(context);
        layer.borrow_mut().replace_labels(labels);
        self.phase = LabelPhase::Attached;
        true
    }

    fn value_labels(&self, context: &PlotContext<'_>) -> Vec<Label> {
        let Some(interval) = context.host.active_index_interval() else {
            return Vec::new();
        };
        let data = context.data;
        let mut labels = Vec::new();
        for index in interval {
            let Some(text) = data.auxiliary_value(&self.id, index) else {
                continue;
            };
            let Some(location) = context.host.point_location(&self.id, index) else {
                trace!(plot = %self.id, index, "dot label skipped: no location");
                continue;
            };
            let font = data
                .auxiliary_value_font(&self.id, index)
                .unwrap_or_else(|| self.value_font.clone());
            let size = context.measure.measure(&text, &font);
            let placement = DotLabelPlacement::from_flags(
                data.auxiliary_value_place_outside(&self.id, index)
                    .unwrap_or(false),
                data.auxiliary_value_place_inside(&self.id, index)
                    .unwrap_or(false),
            );
            let offset = data
                .auxiliary_value_location_offset(&self.id, index)
                .unwrap_or(Point::ZERO);

            let mut label = Label::new(text, font, self.fill_color, size);
            label.frame = place_dot_label(location, size, placement, offset);
            label.h_align = TextHAlign::Center;
            label.transform = data.label_transform(index);
            labels.push(label);
        }
        labels
    }
}
