use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::core::{
    ActiveInterval, AxisRange, CoordinateMapper, DataPoint, PlotId, Point, Viewport,
};
use crate::error::{ChartError, ChartResult};
use crate::reference::{ReferenceLineEngine, ReferenceLines};
use crate::render::{
    DrawingLayer, EstimatedTextMeasure, Label, LayerHandle, LayerKind, RenderFrame, Renderer,
    TextMeasure, layer_handle,
};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

use super::{
    DataSourceLabels, GraphConfig, GraphDataSource, GraphHost, LabelPhase, LabelScheduler, Plot,
    PlotContext, VALUE_LABEL_DEFERRAL,
};

/// Resolves plot geometry against the view's current mapper and window.
struct ViewHost<'a> {
    mapper: CoordinateMapper,
    interval: Option<ActiveInterval>,
    data: &'a dyn GraphDataSource,
}

impl GraphHost for ViewHost<'_> {
    fn active_index_interval(&self) -> Option<ActiveInterval> {
        self.interval
    }

    fn point_location(&self, plot: &PlotId, index: usize) -> Option<Point> {
        if !self.interval.is_some_and(|interval| interval.contains(index)) {
            return None;
        }
        let value = self.data.value(plot, index);
        value
            .is_finite()
            .then(|| self.mapper.point_at(index, value))
    }

    fn zero_y_position(&self) -> f64 {
        self.mapper.zero_y_position()
    }
}

/// Stateful owner of a scrollable graph.
///
/// `GraphView` keeps the axis range in step with the visible window, owns the
/// plots and reference line engines, and turns their layers into a
/// `RenderFrame` for the renderer. Deferred value labels are driven by
/// [`GraphView::advance`].
pub struct GraphView<R: Renderer, D: GraphDataSource> {
    renderer: R,
    data: D,
    config: GraphConfig,
    mapper: CoordinateMapper,
    scroll_offset: f64,
    plots: IndexMap<PlotId, Plot>,
    reference: Vec<ReferenceLineEngine>,
    data_point_layer: LayerHandle,
    scheduler: LabelScheduler,
    measure: Rc<dyn TextMeasure>,
}

impl<R: Renderer, D: GraphDataSource> GraphView<R, D> {
    pub fn new(renderer: R, data: D, config: GraphConfig) -> ChartResult<Self> {
        config.validate()?;
        let mapper = CoordinateMapper::new(
            config.viewport,
            config.margins,
            config.range_policy.fixed,
        )?
        .with_spacing(config.spacing)?;

        let mut view = Self {
            renderer,
            data,
            config,
            mapper,
            scroll_offset: 0.0,
            plots: IndexMap::new(),
            reference: Vec::new(),
            data_point_layer: layer_handle(DrawingLayer::new(LayerKind::DataPointLabels, None)),
            scheduler: LabelScheduler::new(),
            measure: Rc::new(EstimatedTextMeasure::default()),
        };
        for lines in view.config.reference_lines.clone() {
            view.push_reference_engine(lines)?;
        }
        view.refresh_range();
        debug!(
            width = view.config.viewport.width,
            height = view.config.viewport.height,
            reference_sets = view.reference.len(),
            "graph view created"
        );
        Ok(view)
    }

    /// Creates a view from a JSON `GraphConfig` document.
    pub fn from_config(renderer: R, data: D, json: &str) -> ChartResult<Self> {
        let config = GraphConfig::from_json_str(json)?;
        Self::new(renderer, data, config)
    }

    /// Replaces the text measurement used by every label pass and lays
    /// everything out again.
    pub fn set_text_measure(&mut self, measure: Rc<dyn TextMeasure>) {
        self.measure = Rc::clone(&measure);
        self.reference = std::mem::take(&mut self.reference)
            .into_iter()
            .map(|engine| engine.with_text_measure(Rc::clone(&measure)))
            .collect();
        let labels = DataSourceLabels(&self.data);
        for engine in &mut self.reference {
            engine.rebuild(&labels);
        }
        self.rebuild_plots();
        self.rebuild_data_point_labels();
    }

    /// Registers a plot and builds its layers. Plot ids must be unique.
    pub fn add_plot(&mut self, plot: impl Into<Plot>) -> ChartResult<()> {
        let plot = plot.into();
        let id = plot.id().clone();
        if self.plots.contains_key(&id) {
            return Err(ChartError::InvalidData(format!(
                "plot `{id}` is already registered"
            )));
        }
        debug!(plot = %id, kind = plot.kind_name(), "plot added");
        self.plots.insert(id.clone(), plot);
        self.layout_plot(&id);
        if self.config.range_policy.adapt_to_visible {
            self.refresh_range();
        }
        Ok(())
    }

    pub fn remove_plot(&mut self, id: &PlotId) -> Option<Plot> {
        let plot = self.plots.shift_remove(id)?;
        let cancelled = self.scheduler.cancel_owner(id);
        debug!(plot = %id, cancelled, "plot removed");
        if self.config.range_policy.adapt_to_visible {
            self.refresh_range();
        }
        Some(plot)
    }

    pub fn add_reference_lines(&mut self, lines: ReferenceLines) -> ChartResult<()> {
        self.push_reference_engine(lines.clone())?;
        self.config.reference_lines.push(lines);
        Ok(())
    }

    /// Resizes the view. On error the previous layout is kept.
    pub fn set_viewport(&mut self, viewport: Viewport) -> ChartResult<()> {
        let mapper = CoordinateMapper::new(viewport, self.config.margins, self.mapper.range())
            .and_then(|mapper| mapper.with_spacing(self.config.spacing))
            .map_err(|err| {
                warn!(error = %err, "viewport update rejected");
                err
            })?;
        self.mapper = mapper;
        self.config.viewport = viewport;

        let labels = DataSourceLabels(&self.data);
        for engine in &mut self.reference {
            engine.set_viewport(viewport, &labels)?;
        }
        self.scroll_offset = self.clamp_scroll(self.scroll_offset);
        let ids: Vec<PlotId> = self.plots.keys().cloned().collect();
        for id in &ids {
            self.layout_plot(id);
        }
        self.refresh_range();
        Ok(())
    }

    /// Scrolls the content. The offset is clamped to the scrollable width; the
    /// range is recalculated when the active window changes.
    pub fn set_scroll_offset(&mut self, offset: f64) -> ChartResult<()> {
        if !offset.is_finite() {
            return Err(ChartError::InvalidData(
                "scroll offset must be finite".to_owned(),
            ));
        }
        let offset = self.clamp_scroll(offset);
        if offset == self.scroll_offset {
            return Ok(());
        }
        let before = self.active_interval();
        self.scroll_offset = offset;
        let after = self.active_interval();
        trace!(offset, "scroll offset updated");
        if after != before {
            self.refresh_range();
        }
        Ok(())
    }

    /// Indices that need geometry: the visible window widened by the
    /// configured off-screen buffer.
    #[must_use]
    pub fn active_interval(&self) -> Option<ActiveInterval> {
        self.config.spacing.index_window(
            self.scroll_offset,
            self.config.viewport.width,
            self.data.number_of_points(),
            self.config.offscreen_buffer,
        )
    }

    #[must_use]
    pub fn range(&self) -> AxisRange {
        self.mapper.range()
    }

    /// Recomputes the axis range for the active window and rebuilds every
    /// layer that depends on it.
    ///
    /// Call this after the data source changed.
    pub fn refresh_range(&mut self) -> AxisRange {
        let interval = self.active_interval();
        let range = {
            let data = &self.data;
            let ids: Vec<&PlotId> = self.plots.keys().collect();
            let values = interval
                .into_iter()
                .flat_map(ActiveInterval::iter)
                .flat_map(|index| ids.iter().map(move |id| data.value(id, index)));
            self.config.range_policy.resolve(values)
        };

        if range != self.mapper.range() {
            self.mapper = self.mapper.with_range(range);
            let labels = DataSourceLabels(&self.data);
            for engine in &mut self.reference {
                engine.set_range(range, &labels);
            }
            debug!(min = range.min(), max = range.max(), "axis range updated");
        }
        self.rebuild_plots();
        self.rebuild_data_point_labels();
        range
    }

    /// Snapshot of every layer, back to front: reference lines, plot layers
    /// by kind, then data point labels.
    #[must_use]
    pub fn build_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.mapper.viewport())
            .with_content_offset(self.scroll_offset);
        for engine in &self.reference {
            frame.push_layer(snapshot(&engine.layer()));
        }
        let mut plot_layers: Vec<DrawingLayer> = self
            .plots
            .values()
            .flat_map(Plot::current_layers)
            .map(|handle| snapshot(&handle))
            .collect();
        plot_layers.sort_by_key(|layer| layer.kind);
        frame.layers.extend(plot_layers);
        frame.push_layer(snapshot(&self.data_point_layer));
        frame
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame();
        self.renderer.render(&frame)?;
        trace!(layers = frame.layers.len(), labels = frame.label_count(), "frame rendered");
        Ok(())
    }

    /// Renders the frame into an external cairo context.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_frame();
        self.renderer.render_on_cairo_context(context, &frame)
    }

    /// Moves the label clock forward and attaches value labels whose deferral
    /// elapsed. Returns the number of plots that received labels.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let ready = self.scheduler.advance(elapsed);
        if ready.is_empty() {
            return 0;
        }

        let host = ViewHost {
            mapper: self.mapper,
            interval: self.active_interval(),
            data: &self.data,
        };
        let context = PlotContext {
            viewport: self.mapper.viewport(),
            host: &host,
            data: &self.data,
            measure: &*self.measure,
        };
        let mut attached = 0;
        for task in ready {
            let Some(plot) = self.plots.get_mut(&task.owner) else {
                trace!(owner = %task.owner, "label task for removed plot dropped");
                continue;
            };
            if plot.attach_value_labels(&task.layer, &context) {
                attached += 1;
            }
        }
        debug!(attached, "deferred value labels attached");
        attached
    }

    /// Data points of `plot` inside the active window.
    #[must_use]
    pub fn data_points(&self, plot: &PlotId) -> Vec<DataPoint> {
        let Some(interval) = self.active_interval() else {
            return Vec::new();
        };
        interval
            .iter()
            .filter_map(|index| {
                let value = self.data.value(plot, index);
                value
                    .is_finite()
                    .then(|| DataPoint::new(index, value, self.mapper.point_at(index, value)))
            })
            .collect()
    }

    /// Total scrollable content width in pixels.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.config
            .spacing
            .content_width(self.data.number_of_points())
    }

    #[must_use]
    pub fn value_at(&self, screen_y: f64) -> f64 {
        self.mapper.value_at(screen_y)
    }

    #[must_use]
    pub fn screen_y_at(&self, value: f64) -> f64 {
        self.mapper.screen_y_at(value)
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        self.mapper
    }

    #[must_use]
    pub fn plot(&self, id: &PlotId) -> Option<&Plot> {
        self.plots.get(id)
    }

    pub fn plot_ids(&self) -> impl Iterator<Item = &PlotId> {
        self.plots.keys()
    }

    #[must_use]
    pub fn reference_engines(&self) -> &[ReferenceLineEngine] {
        &self.reference
    }

    #[must_use]
    pub fn scheduler(&self) -> &LabelScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable data access; call [`GraphView::refresh_range`] afterwards.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn push_reference_engine(&mut self, lines: ReferenceLines) -> ChartResult<()> {
        let mut engine = ReferenceLineEngine::new(
            lines,
            self.mapper.viewport(),
            self.mapper.margins(),
            self.mapper.range(),
        )?
        .with_text_measure(Rc::clone(&self.measure));
        engine.rebuild(&DataSourceLabels(&self.data));
        self.reference.push(engine);
        Ok(())
    }

    /// Gives the plot fresh layers and queues its deferred labels.
    fn layout_plot(&mut self, id: &PlotId) {
        let host = ViewHost {
            mapper: self.mapper,
            interval: self.active_interval(),
            data: &self.data,
        };
        let context = PlotContext {
            viewport: self.mapper.viewport(),
            host: &host,
            data: &self.data,
            measure: &*self.measure,
        };
        let Some(plot) = self.plots.get_mut(id) else {
            return;
        };
        self.scheduler.cancel_owner(id);
        let layers = plot.layers(&context);
        trace!(plot = %id, layers = layers.len(), "plot layers created");
        queue_value_labels(&mut self.scheduler, plot);
    }

    fn rebuild_plots(&mut self) {
        let host = ViewHost {
            mapper: self.mapper,
            interval: self.active_interval(),
            data: &self.data,
        };
        let context = PlotContext {
            viewport: self.mapper.viewport(),
            host: &host,
            data: &self.data,
            measure: &*self.measure,
        };
        for plot in self.plots.values_mut() {
            plot.rebuild(&context);
            queue_value_labels(&mut self.scheduler, plot);
        }
    }

    fn rebuild_data_point_labels(&mut self) {
        let style = &self.config.data_point_labels;
        let mut labels = Vec::new();
        if let (true, Some(interval)) = (style.visible, self.active_interval()) {
            let top = self.mapper.graph_bottom() + style.offset;
            for index in interval {
                let text = self.data.label(index);
                if text.is_empty() {
                    continue;
                }
                let size = self.measure.measure(&text, &style.font);
                let origin = Point::new(self.mapper.x_at(index) - size.width / 2.0, top);
                let mut label = Label::new(text, style.font.clone(), style.color, size).at(origin);
                label.transform = self.data.label_transform(index);
                labels.push(label);
            }
        }
        let mut layer = self.data_point_layer.borrow_mut();
        layer.replace_labels(labels);
        layer.generation += 1;
    }

    fn clamp_scroll(&self, offset: f64) -> f64 {
        let max_offset = (self.content_width() - self.config.viewport.width).max(0.0);
        offset.clamp(0.0, max_offset)
    }
}

/// Keeps exactly one pending label task per plot while labels are pending.
fn queue_value_labels(scheduler: &mut LabelScheduler, plot: &Plot) {
    if plot.label_phase() != LabelPhase::Pending {
        return;
    }
    let Some(layer) = plot.label_layer() else {
        return;
    };
    if !scheduler.supersede(plot.id(), &layer) {
        scheduler.schedule(plot.id().clone(), &layer, VALUE_LABEL_DEFERRAL);
    }
}

fn snapshot(handle: &LayerHandle) -> DrawingLayer {
    handle.borrow().clone()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::GraphView;
    use crate::api::{BarPlot, GraphConfig, GraphDataSource, LabelPhase, LinePlot, Plot};
    use crate::core::{PlotId, RangePolicy, Viewport};
    use crate::reference::ReferenceLines;
    use crate::render::{LayerKind, NullRenderer};

    struct Series(Vec<f64>);

    impl GraphDataSource for Series {
        fn number_of_points(&self) -> usize {
            self.0.len()
        }

        fn value(&self, _plot: &PlotId, index: usize) -> f64 {
            self.0[index]
        }

        fn label(&self, index: usize) -> String {
            format!("D{index}")
        }

        fn auxiliary_value(&self, _plot: &PlotId, index: usize) -> Option<String> {
            Some(format!("{}", self.0[index]))
        }
    }

    fn view(values: Vec<f64>) -> GraphView<NullRenderer, Series> {
        let config = GraphConfig::new(Viewport::new(300.0, 200.0))
            .with_range_policy(RangePolicy::adaptive().with_zero_baseline())
            .with_reference_lines(ReferenceLines::default());
        GraphView::new(NullRenderer::default(), Series(values), config).expect("view")
    }

    #[test]
    fn adaptive_range_follows_added_plots() {
        let mut view = view(vec![10.0, 40.0, 25.0]);
        view.add_plot(LinePlot::new("line")).expect("line");
        assert_eq!(view.range().max(), 40.0);
        assert_eq!(view.range().min(), 0.0);
        assert!(view.add_plot(LinePlot::new("line")).is_err());
    }

    #[test]
    fn bar_labels_attach_after_deferral() {
        let mut view = view(vec![10.0, 40.0, 25.0]);
        view.add_plot(BarPlot::new("bars").with_values()).expect("bars");
        let id = PlotId::new("bars");
        assert_eq!(view.plot(&id).map(Plot::label_phase), Some(LabelPhase::Pending));

        assert_eq!(view.advance(Duration::from_secs(2)), 0);
        // A rebuild retargets the pending task without postponing it.
        view.refresh_range();
        assert_eq!(view.scheduler().pending().len(), 1);
        assert_eq!(view.advance(Duration::from_secs(1)), 1);
        assert_eq!(view.plot(&id).map(Plot::label_phase), Some(LabelPhase::Attached));

        let frame = view.build_frame();
        let bars = frame.layers_of(LayerKind::Bar);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].labels.len(), 3);
    }

    #[test]
    fn frame_orders_reference_layers_first() {
        let mut view = view(vec![1.0, 2.0]);
        view.add_plot(LinePlot::new("line")).expect("line");
        view.render().expect("render");
        let frame = view.build_frame();
        assert_eq!(frame.layers[0].kind, LayerKind::ReferenceLines);
        assert_eq!(
            frame.layers.last().map(|layer| layer.kind),
            Some(LayerKind::DataPointLabels)
        );
        assert_eq!(view.renderer().frames_rendered, 1);
    }
}
