use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{
    BarLabelGaps, BarLabelPlacement, BarOverrides, BarShape, PlotId, Rect, bar_rect,
    build_bar_geometry, place_bar_label,
};
use crate::render::{
    Color, DrawingLayer, Font, GeneratedPath, Label, LayerHandle, LayerKind, ShapeLayer,
    StrokeStyle, TextHAlign, layer_handle,
};

use super::{GraphDataSource, LabelPhase, PlotContext};

/// Vertical bars from each data point down to the baseline.
#[derive(Debug)]
pub struct BarPlot {
    id: PlotId,
    pub bar_width: f64,
    pub bar_color: Color,
    pub line_width: f64,
    pub line_color: Color,
    pub round_corners: bool,
    /// Attach value labels from `GraphDataSource::auxiliary_value`.
    pub display_values: bool,
    pub value_font: Font,
    pub outside_label_color: Color,
    pub inside_label_color: Color,
    pub label_gaps: BarLabelGaps,
    layer: Option<LayerHandle>,
    frames: IndexMap<usize, Rect>,
    phase: LabelPhase,
}

struct SourceOverrides<'a> {
    data: &'a dyn GraphDataSource,
    plot: &'a PlotId,
}

impl BarOverrides for SourceOverrides<'_> {
    fn custom_width(&self, index: usize) -> Option<f64> {
        self.data.custom_bar_width(self.plot, index)
    }

    fn custom_fill(&self, index: usize) -> Option<Color> {
        self.data.custom_bar_fill_color(self.plot, index)
    }
}

impl BarPlot {
    #[must_use]
    pub fn new(id: impl Into<PlotId>) -> Self {
        Self {
            id: id.into(),
            bar_width: 25.0,
            bar_color: Color::GRAY,
            line_width: 1.0,
            line_color: Color::DARK_GRAY,
            round_corners: false,
            display_values: false,
            value_font: Font::system(10.0),
            outside_label_color: Color::DARK_GRAY,
            inside_label_color: Color::WHITE,
            label_gaps: BarLabelGaps::default(),
            layer: None,
            frames: IndexMap::new(),
            phase: LabelPhase::Disabled,
        }
    }

    #[must_use]
    pub fn with_values(mut self) -> Self {
        self.display_values = true;
        self
    }

    #[must_use]
    pub fn with_rounded_corners(mut self) -> Self {
        self.round_corners = true;
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

    /// Bar rectangles of the last build keyed by data index.
    #[must_use]
    pub fn frames(&self) -> &IndexMap<usize, Rect> {
        &self.frames
    }

    pub(crate) fn layers(&mut self, context: &PlotContext<'_>) -> Vec<LayerHandle> {
        self.layer = Some(layer_handle(DrawingLayer::new(
            LayerKind::Bar,
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
        let shape = BarShape {
            width: self.bar_width,
            round_corners: self.round_corners,
        };
        let overrides = SourceOverrides {
            data: context.data,
            plot: &self.id,
        };
        let geometry = build_bar_geometry(
            context.host.active_index_interval(),
            shape,
            context.host.zero_y_position(),
            &overrides,
            |index| context.host.point_location(&self.id, index),
        );

        let overlays = geometry
            .fills
            .iter()
            .map(|fill| {
                let mut path = GeneratedPath::new();
                path.add_rect(fill.rect);
                ShapeLayer::filled(path, fill.color)
            })
            .collect();
        self.frames = geometry.frames;

        let labels = match self.phase {
            LabelPhase::Attached => self.value_labels(context),
            LabelPhase::Disabled | LabelPhase::Pending => Vec::new(),
        };

        let mut layer = layer.borrow_mut();
        layer.clear_attachments();
        layer.shape = ShapeLayer {
            path: geometry.path,
            fill: Some(self.bar_color),
            stroke: Some(StrokeStyle::solid(self.line_color, self.line_width)),
        };
        layer.overlays = overlays;
        layer.replace_labels(labels);
        layer.generation += 1;
        debug!(
            plot = %self.id,
            bars = self.frames.len(),
            fills = layer.overlays.len(),
            labels = layer.labels.len(),
            "bar plot rebuilt"
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
                trace!(plot = %self.id, index, "bar label skipped: no location");
                continue;
            };
            let font = data
                .auxiliary_value_font(&self.id, index)
                .unwrap_or_else(|| self.value_font.clone());
            let size = context.measure.measure(&text, &font);
            let bar = self.frames.get(&index).copied().unwrap_or_else(|| {
                bar_rect(location, self.bar_width, context.host.zero_y_position())
            });

            let (frame, placement) = place_bar_label(location, size, bar, self.label_gaps);
            let color = match placement {
                BarLabelPlacement::Outside => data
                    .auxiliary_value_text_color_outside(&self.id, index)
                    .unwrap_or(self.outside_label_color),
                BarLabelPlacement::Inside => data
                    .auxiliary_value_text_color_inside(&self.id, index)
                    .unwrap_or(self.inside_label_color),
            };

            let mut label = Label::new(text, font, color, size);
            label.frame = frame;
            label.h_align = TextHAlign::Center;
            label.transform = data.label_transform(index);
            labels.push(label);
        }
        labels
    }
}
