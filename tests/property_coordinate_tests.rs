use approx::abs_diff_eq;
use proptest::prelude::*;
use scrollgraph::core::{AxisRange, CoordinateMapper, Margins, Viewport};

proptest! {
    #[test]
    fn screen_y_round_trip_property(
        height in 40.0f64..4_000.0,
        top in 0.0f64..15.0,
        bottom in 0.0f64..15.0,
        min in -10_000.0f64..10_000.0,
        span in 1.0f64..100_000.0,
        fraction in 0.0f64..1.0
    ) {
        let viewport = Viewport::new(800.0, height);
        let range = AxisRange::new(min, min + span).expect("valid range");
        let mapper = CoordinateMapper::new(viewport, Margins::new(top, bottom), range)
            .expect("valid mapper");

        let y = top + fraction * mapper.graph_height();
        let recovered = mapper.screen_y_at(mapper.value_at(y));
        prop_assert!(abs_diff_eq!(recovered, y, epsilon = 1e-6));
    }

    #[test]
    fn mapped_values_stay_inside_the_graph_band(
        min in -1_000.0f64..1_000.0,
        span in 0.0f64..1_000.0,
        fraction in 0.0f64..=1.0
    ) {
        let range = AxisRange::new(min, min + span).expect("valid range");
        let mapper = CoordinateMapper::new(
            Viewport::new(300.0, 200.0),
            Margins::new(10.0, 10.0),
            range,
        )
        .expect("valid mapper");

        let y = mapper.screen_y_at(min + fraction * span);
        prop_assert!(y.is_finite());
        prop_assert!((10.0 - 1e-9..=190.0 + 1e-9).contains(&y));
        let zero = mapper.zero_y_position();
        prop_assert!((10.0..=190.0).contains(&zero));
    }
}
