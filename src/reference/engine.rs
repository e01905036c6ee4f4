use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{AxisRange, CoordinateMapper, Margins, Point, Rect, Size, Viewport};
use crate::error::ChartResult;
use crate::reference::{
    Gap, Gaps, GuardMode, LabelFormatter, LineSegment, LineSegments, ReferenceLabelPlacement,
    ReferenceLinePositioning, ReferenceLineRole, ReferenceLines, SegmentContext,
    SegmentTreatment, normalize_gaps, segment_treatment, split_line,
};
use crate::render::{
    DrawingLayer, EstimatedTextMeasure, GeneratedPath, Label, LayerHandle, LayerKind,
    LineStrokeStyle, ShapeLayer, StrokeStyle, TextHAlign, TextMeasure, layer_handle,
};

/// Horizontal padding added to each side of a placed label frame.
const LABEL_PADDING: f64 = 3.0;

/// Per-line label override lookup, usually backed by the graph data source.
pub trait ReferenceLabelText {
    /// `Some("")` hides the label; `None` keeps the formatted value.
    fn label_custom_text(&self, lines: &ReferenceLines, index: usize) -> Option<String>;
}

/// Lookup without overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomText;

impl ReferenceLabelText for NoCustomText {
    fn label_custom_text(&self, _lines: &ReferenceLines, _index: usize) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Constructed,
    PathBuilt,
}

/// Chart edge covered by a solid guard overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardEdge {
    Right,
    Bottom,
    Left,
}

/// One laid-out reference line of the last build.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub role: ReferenceLineRole,
    pub y: f64,
    pub value: f64,
    /// Label text shown on the line, `None` for unlabelled lines.
    pub text: Option<String>,
    /// Label gaps, left to right and disjoint.
    pub gaps: Gaps,
    pub segments: LineSegments,
}

#[derive(Debug)]
struct PlannedLine {
    role: ReferenceLineRole,
    y: f64,
    value: f64,
    text: Option<String>,
    labels: SmallVec<[Label; 2]>,
    gaps: Gaps,
    right_gap: Option<Gap>,
}

#[derive(Debug, Default)]
struct GuardOverlays {
    right: Option<GeneratedPath>,
    bottom: Option<GeneratedPath>,
    left: Option<GeneratedPath>,
    ticks: GeneratedPath,
}

/// Builds horizontal reference lines, their labels and guard overlays.
///
/// The engine starts in [`EngineState::Constructed`]. Every `set_range` or
/// `set_viewport` discards the previous path, labels and overlays and lays
/// everything out again.
#[derive(Debug)]
pub struct ReferenceLineEngine {
    settings: ReferenceLines,
    mapper: CoordinateMapper,
    measure: Rc<dyn TextMeasure>,
    layer: LayerHandle,
    state: EngineState,
    lines: Vec<ReferenceLine>,
    guard_edges: SmallVec<[GuardEdge; 3]>,
}

impl ReferenceLineEngine {
    pub fn new(
        settings: ReferenceLines,
        viewport: Viewport,
        margins: Margins,
        range: AxisRange,
    ) -> ChartResult<Self> {
        settings.validate()?;
        let mapper = CoordinateMapper::new(viewport, margins, range)?;
        Ok(Self {
            settings,
            mapper,
            measure: Rc::new(EstimatedTextMeasure::default()),
            layer: layer_handle(DrawingLayer::new(LayerKind::ReferenceLines, None)),
            state: EngineState::Constructed,
            lines: Vec::new(),
            guard_edges: SmallVec::new(),
        })
    }

    #[must_use]
    pub fn with_text_measure(mut self, measure: Rc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ReferenceLines {
        &self.settings
    }

    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        self.mapper
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn lines(&self) -> &[ReferenceLine] {
        &self.lines
    }

    #[must_use]
    pub fn guard_edges(&self) -> &[GuardEdge] {
        &self.guard_edges
    }

    #[must_use]
    pub fn layer(&self) -> LayerHandle {
        Rc::clone(&self.layer)
    }

    #[must_use]
    pub fn value_at(&self, screen_y: f64) -> f64 {
        self.mapper.value_at(screen_y)
    }

    #[must_use]
    pub fn screen_y_at(&self, value: f64) -> f64 {
        self.mapper.screen_y_at(value)
    }

    pub fn set_range(&mut self, range: AxisRange, source: &dyn ReferenceLabelText) {
        self.mapper = self.mapper.with_range(range);
        self.rebuild(source);
    }

    /// Resizes the drawing area. An invalid size is rejected and the previous
    /// geometry is kept.
    pub fn set_viewport(
        &mut self,
        viewport: Viewport,
        source: &dyn ReferenceLabelText,
    ) -> ChartResult<()> {
        let mapper = CoordinateMapper::new(viewport, self.mapper.margins(), self.mapper.range())
            .map_err(|err| {
                warn!(error = %err, "reference line viewport update rejected");
                err
            })?;
        self.mapper = mapper.with_spacing(self.mapper.spacing())?;
        self.rebuild(source);
        Ok(())
    }

    /// Discards the previous output and lays out every line again.
    pub fn rebuild(&mut self, source: &dyn ReferenceLabelText) {
        let planned = self.plan_lines(source);
        let width = self.mapper.viewport().width;
        let guard = self.settings.guard_mode();
        let boundary = match guard {
            GuardMode::Left => left_guard_boundary(&planned, 0.0, width),
            GuardMode::Right | GuardMode::Off => None,
        };

        let mut main = GeneratedPath::new();
        let mut overlays = GuardOverlays::default();
        let mut labels = Vec::with_capacity(planned.len() * 2);
        let mut lines = Vec::with_capacity(planned.len());

        for line in planned {
            self.add_placement_guards(&line, &mut main, &mut overlays);
            let segments = split_line(0.0, width, &line.gaps, guard != GuardMode::Off);
            for segment in &segments {
                self.emit_segment(*segment, line.role, line.y, boundary, &mut main, &mut overlays);
            }
            trace!(
                role = ?line.role,
                y = line.y,
                gaps = line.gaps.len(),
                segments = segments.len(),
                "reference line laid out"
            );
            labels.extend(line.labels);
            lines.push(ReferenceLine {
                role: line.role,
                y: line.y,
                value: line.value,
                text: line.text,
                gaps: normalize_gaps(&line.gaps),
                segments,
            });
        }

        let (overlay_layers, edges) = self.finish_overlays(overlays);
        let main_stroke = StrokeStyle::solid(self.settings.line_color, self.settings.line_thickness)
            .with_pattern(self.settings.style);

        let mut layer = self.layer.borrow_mut();
        layer.clear_attachments();
        layer.shape = ShapeLayer::stroked(main, main_stroke);
        layer.overlays = overlay_layers;
        layer.replace_labels(labels);
        layer.generation += 1;
        debug!(
            lines = lines.len(),
            overlays = layer.overlays.len(),
            labels = layer.labels.len(),
            generation = layer.generation,
            "reference lines rebuilt"
        );
        drop(layer);

        self.lines = lines;
        self.guard_edges = edges;
        self.state = EngineState::PathBuilt;
    }

    fn plan_lines(&self, source: &dyn ReferenceLabelText) -> Vec<PlannedLine> {
        let settings = &self.settings;
        let formatter = LabelFormatter::for_lines(settings);
        let units = settings.unit_suffix();

        let intermediate: Vec<f64> = match settings.position_type {
            ReferenceLinePositioning::Relative => settings
                .positions
                .iter()
                .copied()
                .filter(|position| {
                    !settings.include_min_max || (*position != 0.0 && *position != 1.0)
                })
                .map(|position| self.mapper.screen_y_at_fraction(position))
                .collect(),
            ReferenceLinePositioning::Absolute => settings
                .positions
                .iter()
                .map(|value| self.mapper.screen_y_at(*value))
                .collect(),
        };
        let intermediate_count = intermediate.len();

        let mut planned = Vec::with_capacity(intermediate_count + 2);
        if settings.include_min_max {
            let range = self.mapper.range();
            for (role, y, value) in [
                (ReferenceLineRole::Maximum, self.mapper.graph_top(), range.max()),
                (ReferenceLineRole::Minimum, self.mapper.graph_bottom(), range.min()),
            ] {
                let tag = format!("{}{units}", formatter.format(value));
                planned.push(self.plan_line(role, y, value, Some(tag), source, intermediate_count));
            }
        }

        for (ordinal, y) in intermediate.into_iter().enumerate() {
            let value = self.mapper.value_at(y);
            let tag = settings.add_labels_to_intermediate_lines.then(|| {
                let text = formatter.format(value);
                if settings.add_units_to_intermediate_labels {
                    format!("{text}{units}")
                } else {
                    text
                }
            });
            planned.push(self.plan_line(
                ReferenceLineRole::Intermediate(ordinal),
                y,
                value,
                tag,
                source,
                intermediate_count,
            ));
        }
        planned
    }

    fn plan_line(
        &self,
        role: ReferenceLineRole,
        y: f64,
        value: f64,
        tag: Option<String>,
        source: &dyn ReferenceLabelText,
        intermediate_count: usize,
    ) -> PlannedLine {
        let Some(tag) = tag else {
            return PlannedLine {
                role,
                y,
                value,
                text: None,
                labels: SmallVec::new(),
                gaps: Gaps::new(),
                right_gap: None,
            };
        };

        let settings = &self.settings;
        let custom = source.label_custom_text(settings, role.custom_text_index(intermediate_count));
        let hidden = custom.as_deref() == Some("");
        let text = custom.unwrap_or(tag);

        let mut size = if hidden {
            Size::ZERO
        } else {
            self.measure.measure(&text, &settings.label_font)
        };
        if let Some(transform) = settings.label_transform {
            size = transform.apply_to_size(size);
        }

        let width = self.mapper.viewport().width;
        let label_y = y - size.height / 2.0;
        let left_frame = Rect::new(settings.label_inset, label_y, size.width, size.height);
        let right_frame = Rect::new(
            width - settings.label_inset - size.width,
            label_y,
            size.width,
            size.height,
        );
        let left_gap = Gap::around(left_frame, settings.label_margin);
        let right_gap = Gap::around(right_frame, settings.label_margin);

        let mut placement = settings.label_placement;
        if placement == ReferenceLabelPlacement::Both
            && !hidden
            && left_gap.overlaps(right_gap.start, right_gap.end)
        {
            warn!(
                role = ?role,
                y,
                viewport_width = width,
                label_width = size.width,
                "opposite reference labels overlap; right label dropped"
            );
            placement = ReferenceLabelPlacement::Left;
        }

        let mut gaps = Gaps::new();
        let mut labels = SmallVec::new();
        if matches!(
            placement,
            ReferenceLabelPlacement::Left | ReferenceLabelPlacement::Both
        ) {
            if !hidden {
                gaps.push(left_gap);
            }
            labels.push(self.make_label(&text, size, left_frame, hidden, false));
        }
        if matches!(
            placement,
            ReferenceLabelPlacement::Right | ReferenceLabelPlacement::Both
        ) {
            if !hidden {
                gaps.push(right_gap);
            }
            labels.push(self.make_label(&text, size, right_frame, hidden, true));
        }

        PlannedLine {
            role,
            y,
            value,
            text: Some(text),
            labels,
            gaps,
            right_gap: (placement != ReferenceLabelPlacement::Left).then_some(right_gap),
        }
    }

    fn make_label(&self, text: &str, size: Size, frame: Rect, hidden: bool, right: bool) -> Label {
        let settings = &self.settings;
        let mut label = Label::new(
            text,
            settings.label_font.clone(),
            settings.label_color,
            size,
        );
        label.frame = frame.inset_horizontal(LABEL_PADDING);
        label.h_align = TextHAlign::Center;
        label.transform = settings.label_transform;
        if right {
            label.background = Some(settings.label_background_color);
        }
        if hidden {
            label.alpha = 0.0;
        }
        label
    }

    // Vertical guards tied to where labels sit, drawn before the line itself.
    fn add_placement_guards(
        &self,
        line: &PlannedLine,
        main: &mut GeneratedPath,
        overlays: &mut GuardOverlays,
    ) {
        let settings = &self.settings;
        let Some(right_gap) = line.right_gap else {
            return;
        };
        if !settings.guard_line_for_right_labels {
            return;
        }
        let offset = settings.guard_offset;
        let x = right_gap.start - offset;
        let bottom = self.mapper.graph_bottom() + offset;

        match settings.label_placement {
            ReferenceLabelPlacement::Right if line.role == ReferenceLineRole::Minimum => {
                let from = Point::new(x, self.mapper.graph_top() - offset);
                let to = Point::new(x, bottom);
                match settings.style {
                    LineStrokeStyle::Solid => main.add_segment(from, to),
                    LineStrokeStyle::Dashed if settings.outer_line_solid_when_dashed => {
                        overlays.right.get_or_insert_with(|| segment_path(from, to));
                    }
                    LineStrokeStyle::Dashed => {}
                }
            }
            ReferenceLabelPlacement::Both => {
                main.add_segment(Point::new(x, line.y - offset), Point::new(x, bottom));
            }
            _ => {}
        }
    }

    fn emit_segment(
        &self,
        segment: LineSegment,
        role: ReferenceLineRole,
        y: f64,
        boundary: Option<f64>,
        main: &mut GeneratedPath,
        overlays: &mut GuardOverlays,
    ) {
        let settings = &self.settings;
        let offset = settings.guard_offset;
        let from = Point::new(segment.from_x, y);
        let to = Point::new(segment.to_x, y);
        let treatment = segment_treatment(SegmentContext {
            style: settings.style,
            guard: settings.guard_mode(),
            outer_solid: settings.outer_line_solid_when_dashed,
            role,
            part: segment.part,
        });

        match treatment {
            SegmentTreatment::Stroke => main.add_segment(from, to),
            SegmentTreatment::Suppress => {}
            SegmentTreatment::BottomOverlay => {
                overlays
                    .bottom
                    .get_or_insert_with(GeneratedPath::new)
                    .add_segment(from, to);
            }
            SegmentTreatment::StrokeWithEndTick => {
                overlays.ticks.add_segment(to, to.offset(-offset, 0.0));
                main.add_segment(from, to);
            }
            SegmentTreatment::SplitAtLeftGuard => match boundary {
                Some(boundary) => {
                    let split = Point::new(boundary.clamp(from.x, to.x), y);
                    main.add_segment(from, split);
                    overlays.bottom = Some(segment_path(split, to));
                }
                None => overlays.bottom = Some(segment_path(from, to)),
            },
            SegmentTreatment::TickAtLeftGuard => {
                let tick_x = boundary.unwrap_or(from.x).max(from.x);
                overlays
                    .ticks
                    .add_segment(Point::new(tick_x, y), Point::new(tick_x + offset, y));
                if tick_x + offset < to.x {
                    main.add_segment(Point::new(tick_x + offset, y), to);
                }
                if role == ReferenceLineRole::Maximum && overlays.left.is_none() {
                    let x = tick_x + offset;
                    overlays.left = Some(segment_path(
                        Point::new(x, self.mapper.graph_top() - offset),
                        Point::new(x, self.mapper.graph_bottom() + offset),
                    ));
                }
            }
        }
    }

    fn finish_overlays(
        &self,
        overlays: GuardOverlays,
    ) -> (Vec<ShapeLayer>, SmallVec<[GuardEdge; 3]>) {
        let stroke = StrokeStyle::solid(self.settings.line_color, self.settings.line_thickness);
        let mut layers = Vec::with_capacity(4);
        let mut edges = SmallVec::new();
        for (edge, path) in [
            (GuardEdge::Right, overlays.right),
            (GuardEdge::Bottom, overlays.bottom),
            (GuardEdge::Left, overlays.left),
        ] {
            if let Some(path) = path {
                layers.push(ShapeLayer::stroked(path, stroke));
                edges.push(edge);
            }
        }
        if !overlays.ticks.is_empty() {
            layers.push(ShapeLayer::stroked(overlays.ticks, stroke));
        }
        (layers, edges)
    }
}

fn segment_path(from: Point, to: Point) -> GeneratedPath {
    let mut path = GeneratedPath::new();
    path.add_segment(from, to);
    path
}

/// Right end of the widest left-hand label gap, over single-gap lines whose
/// label sits on the shorter (left) side.
fn left_guard_boundary(lines: &[PlannedLine], from_x: f64, to_x: f64) -> Option<f64> {
    lines
        .iter()
        .filter_map(|line| match line.gaps.as_slice() {
            [gap] if gap.start - from_x <= to_x - gap.end => Some(gap.end),
            _ => None,
        })
        .fold(None, |longest: Option<f64>, x| {
            Some(longest.map_or(x, |longest| longest.max(x)))
        })
}

#[cfg(test)]
mod tests {
    use super::{EngineState, NoCustomText, ReferenceLabelText, ReferenceLineEngine};
    use crate::core::{AxisRange, Margins, Viewport};
    use crate::reference::{ReferenceLineRole, ReferenceLines};

    struct HideMax;

    impl ReferenceLabelText for HideMax {
        fn label_custom_text(&self, _lines: &ReferenceLines, index: usize) -> Option<String> {
            (index == 2).then(String::new)
        }
    }

    fn engine(settings: ReferenceLines) -> ReferenceLineEngine {
        ReferenceLineEngine::new(
            settings,
            Viewport::new(300.0, 200.0),
            Margins::new(10.0, 10.0),
            AxisRange::new(0.0, 100.0).expect("range"),
        )
        .expect("engine")
    }

    #[test]
    fn construction_does_not_build_geometry() {
        let engine = engine(ReferenceLines::default());
        assert_eq!(engine.state(), EngineState::Constructed);
        assert!(engine.layer().borrow().shape.path.is_empty());
        assert!(engine.lines().is_empty());
    }

    #[test]
    fn midline_sits_between_min_and_max() {
        let mut engine = engine(ReferenceLines::relative(vec![0.0, 0.5, 1.0]));
        engine.set_range(AxisRange::new(0.0, 100.0).expect("range"), &NoCustomText);

        assert_eq!(engine.state(), EngineState::PathBuilt);
        let lines = engine.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].role, ReferenceLineRole::Intermediate(0));
        assert_eq!(lines[2].y, 100.0);
        assert_eq!(lines[2].text.as_deref(), Some("50"));
        assert_eq!(lines[0].text.as_deref(), Some("100"));
        assert_eq!(lines[1].text.as_deref(), Some("0"));
    }

    #[test]
    fn empty_custom_text_hides_label_but_keeps_line_whole() {
        let mut engine = engine(ReferenceLines::relative(vec![0.5]));
        engine.set_range(AxisRange::new(0.0, 100.0).expect("range"), &HideMax);

        let max = &engine.lines()[0];
        assert_eq!(max.role, ReferenceLineRole::Maximum);
        assert_eq!(max.text.as_deref(), Some(""));
        assert!(max.gaps.is_empty());
        assert_eq!(max.segments.len(), 1);

        let layer = engine.layer();
        let layer = layer.borrow();
        let hidden = layer
            .labels
            .iter()
            .filter(|label| !label.is_visible())
            .count();
        assert_eq!(hidden, 1);
    }

    #[test]
    fn rebuild_replaces_previous_labels() {
        let mut engine = engine(ReferenceLines::relative(vec![0.25, 0.5, 0.75]));
        let range = AxisRange::new(0.0, 100.0).expect("range");
        engine.set_range(range, &NoCustomText);
        let first = engine.layer().borrow().labels.len();
        engine.set_range(range, &NoCustomText);
        engine
            .set_viewport(Viewport::new(320.0, 200.0), &NoCustomText)
            .expect("viewport");
        let layer = engine.layer();
        let layer = layer.borrow();
        assert_eq!(layer.labels.len(), first);
        assert_eq!(layer.generation, 3);
    }

    #[test]
    fn invalid_viewport_keeps_previous_geometry() {
        let mut engine = engine(ReferenceLines::default());
        engine.set_range(AxisRange::default(), &NoCustomText);
        let before = engine.lines().to_vec();
        assert!(
            engine
                .set_viewport(Viewport::new(300.0, 15.0), &NoCustomText)
                .is_err()
        );
        assert_eq!(engine.lines(), before.as_slice());
        assert_eq!(engine.mapper().viewport(), Viewport::new(300.0, 200.0));
    }
}
