use scrollgraph::core::{
    ActiveInterval, AxisRange, BarOverrides, BarShape, CoordinateMapper, DotPointType,
    LineInterpolation, Margins, Point, Viewport, build_bar_geometry, build_dot_path,
    build_line_geometry,
};
use scrollgraph::render::{Color, PathCommand};

fn mapper() -> CoordinateMapper {
    CoordinateMapper::new(
        Viewport::new(300.0, 200.0),
        Margins::new(10.0, 10.0),
        AxisRange::new(0.0, 100.0).expect("range"),
    )
    .expect("mapper")
}

const VALUES: [f64; 4] = [25.0, 75.0, 50.0, 100.0];

struct NarrowSecondBar;

impl BarOverrides for NarrowSecondBar {
    fn custom_width(&self, index: usize) -> Option<f64> {
        (index == 1).then_some(10.0)
    }

    fn custom_fill(&self, index: usize) -> Option<Color> {
        (index == 3).then_some(Color::rgb(0.9, 0.1, 0.1))
    }
}

#[test]
fn custom_bar_width_is_centred_on_the_point() {
    let mapper = mapper();
    let geometry = build_bar_geometry(
        Some(ActiveInterval::new(0, 3)),
        BarShape::default(),
        mapper.zero_y_position(),
        &NarrowSecondBar,
        |index| VALUES.get(index).map(|value| mapper.point_at(index, *value)),
    );

    let narrow = geometry.frames[&1];
    assert_eq!(narrow.width, 10.0);
    assert_eq!(narrow.center_x(), mapper.x_at(1));
    assert_eq!(narrow.top(), mapper.screen_y_at(75.0));
    assert_eq!(narrow.bottom(), 190.0);
    assert_eq!(geometry.frames[&0].width, 25.0);

    assert_eq!(geometry.fills.len(), 1);
    assert_eq!(geometry.fills[0].index, 3);
    assert_eq!(geometry.path.subpath_count(), 4);
}

#[test]
fn custom_dot_without_callback_draws_a_circle() {
    let mapper = mapper();
    let path = build_dot_path(
        Some(ActiveInterval::new(0, 1)),
        DotPointType::Custom,
        5.0,
        None,
        |index| VALUES.get(index).map(|value| mapper.point_at(index, *value)),
    );
    let arcs: Vec<_> = path
        .commands()
        .iter()
        .filter_map(|command| match command {
            PathCommand::Arc { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
        .collect();
    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0], (Point::new(50.0, 145.0), 5.0));
}

#[test]
fn missing_interval_produces_empty_paths() {
    let mapper = mapper();
    let location = |index: usize| VALUES.get(index).map(|value| mapper.point_at(index, *value));
    assert!(build_dot_path(None, DotPointType::Square, 5.0, None, location).is_empty());
    assert!(
        build_line_geometry(None, LineInterpolation::Smooth, None, location)
            .line
            .is_empty()
    );
}

#[test]
fn line_points_follow_the_mapper() {
    let mapper = mapper();
    let geometry = build_line_geometry(
        Some(ActiveInterval::new(0, 3)),
        LineInterpolation::Straight,
        Some(mapper.zero_y_position()),
        |index| VALUES.get(index).map(|value| mapper.point_at(index, *value)),
    );
    assert_eq!(geometry.points.len(), 4);
    assert_eq!(geometry.points[3], Point::new(170.0, 10.0));
    let fill = geometry.fill.expect("fill");
    assert_eq!(fill.bounds().map(|bounds| bounds.bottom()), Some(190.0));
}
