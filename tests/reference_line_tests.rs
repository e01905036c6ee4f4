use scrollgraph::core::{AxisRange, Margins, Viewport};
use scrollgraph::reference::{
    Gap, GuardEdge, NoCustomText, ReferenceLabelPlacement, ReferenceLabelText,
    ReferenceLineEngine, ReferenceLineRole, ReferenceLines, SegmentPart, split_line,
};
use scrollgraph::render::LineStrokeStyle;

fn built(settings: ReferenceLines, source: &dyn ReferenceLabelText) -> ReferenceLineEngine {
    let mut engine = ReferenceLineEngine::new(
        settings,
        Viewport::new(300.0, 200.0),
        Margins::new(10.0, 10.0),
        AxisRange::new(0.0, 100.0).expect("range"),
    )
    .expect("engine");
    engine.set_range(AxisRange::new(0.0, 100.0).expect("range"), source);
    engine
}

struct Renamed;

impl ReferenceLabelText for Renamed {
    fn label_custom_text(&self, _lines: &ReferenceLines, index: usize) -> Option<String> {
        match index {
            0 => Some("floor".to_owned()),
            2 => Some("ceiling".to_owned()),
            _ => None,
        }
    }
}

#[test]
fn min_max_lines_are_not_duplicated_by_relative_bounds() {
    let engine = built(ReferenceLines::default(), &NoCustomText);
    let lines = engine.lines();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines.iter().filter(|line| line.y == 10.0).count(), 1);
    assert_eq!(lines.iter().filter(|line| line.y == 190.0).count(), 1);
}

#[test]
fn only_the_midline_is_added_between_the_bounds() {
    let engine = built(ReferenceLines::relative(vec![0.0, 0.5, 1.0]), &NoCustomText);
    let intermediate: Vec<_> = engine
        .lines()
        .iter()
        .filter(|line| matches!(line.role, ReferenceLineRole::Intermediate(_)))
        .collect();
    assert_eq!(intermediate.len(), 1);
    assert_eq!(intermediate[0].y, 100.0);
    assert_eq!(intermediate[0].value, 50.0);
}

#[test]
fn absolute_positions_follow_the_range() {
    let settings = ReferenceLines::absolute(vec![25.0]).with_min_max(false);
    let engine = built(settings, &NoCustomText);
    assert_eq!(engine.lines().len(), 1);
    assert_eq!(engine.lines()[0].y, 145.0);
    assert_eq!(engine.lines()[0].text.as_deref(), Some("25"));
}

#[test]
fn units_are_appended_to_bound_labels_only_by_default() {
    let settings = ReferenceLines::relative(vec![0.5]).with_units("kg");
    let engine = built(settings, &NoCustomText);
    let lines = engine.lines();
    assert_eq!(lines[0].text.as_deref(), Some("100 kg"));
    assert_eq!(lines[1].text.as_deref(), Some("0 kg"));
    assert_eq!(lines[2].text.as_deref(), Some("50"));
}

#[test]
fn custom_text_indexes_minimum_first_and_maximum_last() {
    let engine = built(ReferenceLines::relative(vec![0.5]), &Renamed);
    let text = |role: ReferenceLineRole| {
        engine
            .lines()
            .iter()
            .find(|line| line.role == role)
            .and_then(|line| line.text.clone())
    };
    assert_eq!(text(ReferenceLineRole::Minimum).as_deref(), Some("floor"));
    assert_eq!(text(ReferenceLineRole::Maximum).as_deref(), Some("ceiling"));
    assert_eq!(text(ReferenceLineRole::Intermediate(0)).as_deref(), Some("50"));
}

#[test]
fn labels_on_both_sides_split_each_line_into_three_segments() {
    let settings = ReferenceLines::relative(vec![0.5])
        .with_min_max(false)
        .with_placement(ReferenceLabelPlacement::Both);
    let engine = built(settings, &NoCustomText);
    let line = &engine.lines()[0];
    assert_eq!(line.gaps.len(), 2);
    assert!(line.gaps[0].end < line.gaps[1].start);
    assert_eq!(line.segments.len(), 3);
    for segment in &line.segments {
        assert_eq!(segment.part, SegmentPart::Plain);
        for gap in &line.gaps {
            assert!(!gap.overlaps(segment.from_x, segment.to_x));
        }
    }
    assert_eq!(engine.layer().borrow().labels.len(), 2);
}

#[test]
fn right_labels_get_a_background() {
    let settings = ReferenceLines::relative(vec![0.5])
        .with_min_max(false)
        .with_placement(ReferenceLabelPlacement::Right);
    let engine = built(settings, &NoCustomText);
    let layer = engine.layer();
    let layer = layer.borrow();
    assert_eq!(layer.labels.len(), 1);
    assert!(layer.labels[0].background.is_some());
    assert!(layer.labels[0].frame.right() < 300.0);
}

// Equal sides anchor on the right; kept as-is because existing layouts rely on it.
#[test]
fn guarded_split_with_equal_sides_anchors_on_the_right() {
    let segments = split_line(0.0, 100.0, &[Gap::new(40.0, 60.0)], true);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].part, SegmentPart::LabelSide);
    assert_eq!(segments[1].part, SegmentPart::Anchor);
}

#[test]
fn right_guard_adds_one_overlay_per_edge() {
    let mut settings = ReferenceLines::default()
        .with_style(LineStrokeStyle::Dashed)
        .with_placement(ReferenceLabelPlacement::Right);
    settings.guard_line_for_right_labels = true;
    settings.outer_line_solid_when_dashed = true;

    let mut engine = built(settings, &NoCustomText);
    assert_eq!(engine.guard_edges(), &[GuardEdge::Right, GuardEdge::Bottom]);
    assert_eq!(engine.layer().borrow().overlays.len(), 3);

    engine.set_range(AxisRange::new(0.0, 250.0).expect("range"), &NoCustomText);
    assert_eq!(engine.guard_edges(), &[GuardEdge::Right, GuardEdge::Bottom]);
    assert_eq!(engine.layer().borrow().overlays.len(), 3);
}

#[test]
fn right_guard_keeps_a_solid_bottom_edge_with_labels_on_both_sides() {
    let mut settings = ReferenceLines::default()
        .with_style(LineStrokeStyle::Dashed)
        .with_placement(ReferenceLabelPlacement::Both);
    settings.guard_line_for_right_labels = true;
    settings.outer_line_solid_when_dashed = true;

    let engine = built(settings, &NoCustomText);
    assert_eq!(engine.guard_edges(), &[GuardEdge::Bottom]);

    let bottom_line = engine
        .lines()
        .iter()
        .find(|line| line.role == ReferenceLineRole::Minimum)
        .expect("minimum line");
    assert_eq!(bottom_line.segments.len(), 3);
    assert!(bottom_line
        .segments
        .iter()
        .all(|segment| segment.part == SegmentPart::Between));

    let layer = engine.layer();
    let layer = layer.borrow();
    assert_eq!(layer.overlays.len(), 2);
    let bottom = layer.overlays[0].path.line_segments();
    assert_eq!(bottom.len(), 3);
    assert!(bottom.iter().all(|(from, to)| from.y == 190.0 && to.y == 190.0));
    assert_eq!(bottom[0].0.x, 0.0);
    assert_eq!(bottom[2].1.x, 300.0);

    let dashed_bottom = layer
        .shape
        .path
        .line_segments()
        .into_iter()
        .filter(|(from, to)| from.y == 190.0 && to.y == 190.0)
        .count();
    assert_eq!(dashed_bottom, 0);
}

#[test]
fn overlapping_opposite_labels_keep_only_the_left_one() {
    let settings = ReferenceLines::relative(vec![0.5])
        .with_min_max(false)
        .with_placement(ReferenceLabelPlacement::Both);
    let mut engine = ReferenceLineEngine::new(
        settings,
        Viewport::new(40.0, 200.0),
        Margins::new(10.0, 10.0),
        AxisRange::new(0.0, 100_000.0).expect("range"),
    )
    .expect("engine");
    engine.set_range(AxisRange::new(0.0, 100_000.0).expect("range"), &NoCustomText);

    let line = &engine.lines()[0];
    assert_eq!(line.text.as_deref(), Some("50000"));
    assert_eq!(line.gaps.len(), 1);
    assert_eq!(line.segments.len(), 2);
    for segment in &line.segments {
        assert!(!line.gaps[0].overlaps(segment.from_x, segment.to_x));
    }

    let layer = engine.layer();
    let layer = layer.borrow();
    assert_eq!(layer.labels.len(), 1);
    assert!(layer.labels[0].background.is_none());
    assert!(layer.labels[0].frame.left() < 10.0);
}

#[test]
fn left_guard_covers_bottom_and_left_edges() {
    let mut settings = ReferenceLines::default().with_style(LineStrokeStyle::Dashed);
    settings.guard_line_for_left_labels = true;
    settings.outer_line_solid_when_dashed = true;

    let engine = built(settings, &NoCustomText);
    assert_eq!(engine.guard_edges(), &[GuardEdge::Bottom, GuardEdge::Left]);
    let layer = engine.layer();
    let layer = layer.borrow();
    assert_eq!(layer.overlays.len(), 3);
    assert_eq!(layer.shape.stroke.map(|stroke| stroke.pattern), Some(LineStrokeStyle::Dashed));
}

#[test]
fn solid_style_ignores_guard_overlays() {
    let mut settings = ReferenceLines::default();
    settings.guard_line_for_left_labels = true;
    settings.outer_line_solid_when_dashed = true;
    let engine = built(settings, &NoCustomText);
    assert!(engine.guard_edges().is_empty());
    assert!(engine.layer().borrow().overlays.is_empty());
}
