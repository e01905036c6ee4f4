use crate::core::{ActiveInterval, PlotId, Point};
use crate::reference::{ReferenceLabelText, ReferenceLines};
use crate::render::{Color, Font, LabelTransform};

/// Per-index data and display overrides supplied by the application.
///
/// Every auxiliary accessor defaults to `None`, meaning "use the plot's own
/// default".
pub trait GraphDataSource {
    fn number_of_points(&self) -> usize;

    fn value(&self, plot: &PlotId, index: usize) -> f64;

    /// Text shown under the data point on the index axis.
    fn label(&self, index: usize) -> String;

    /// Value label text. Indices without one get no label.
    fn auxiliary_value(&self, _plot: &PlotId, _index: usize) -> Option<String> {
        None
    }

    fn auxiliary_value_font(&self, _plot: &PlotId, _index: usize) -> Option<Font> {
        None
    }

    fn auxiliary_value_text_color_outside(&self, _plot: &PlotId, _index: usize) -> Option<Color> {
        None
    }

    fn auxiliary_value_text_color_inside(&self, _plot: &PlotId, _index: usize) -> Option<Color> {
        None
    }

    fn auxiliary_value_place_outside(&self, _plot: &PlotId, _index: usize) -> Option<bool> {
        None
    }

    fn auxiliary_value_place_inside(&self, _plot: &PlotId, _index: usize) -> Option<bool> {
        None
    }

    fn auxiliary_value_location_offset(&self, _plot: &PlotId, _index: usize) -> Option<Point> {
        None
    }

    fn custom_bar_width(&self, _plot: &PlotId, _index: usize) -> Option<f64> {
        None
    }

    fn custom_bar_fill_color(&self, _plot: &PlotId, _index: usize) -> Option<Color> {
        None
    }

    fn label_transform(&self, _index: usize) -> Option<LabelTransform> {
        None
    }

    /// Replacement text for a reference line label; `Some("")` hides it.
    fn label_custom_text(&self, _lines: &ReferenceLines, _index: usize) -> Option<String> {
        None
    }
}

/// Geometry the owning view resolves for its plots.
pub trait GraphHost {
    fn active_index_interval(&self) -> Option<ActiveInterval>;

    fn point_location(&self, plot: &PlotId, index: usize) -> Option<Point>;

    /// Pixel row of the value baseline used by bars and fills.
    fn zero_y_position(&self) -> f64;
}

/// Routes reference line label overrides to a data source.
#[derive(Clone, Copy)]
pub struct DataSourceLabels<'a>(pub &'a dyn GraphDataSource);

impl ReferenceLabelText for DataSourceLabels<'_> {
    fn label_custom_text(&self, lines: &ReferenceLines, index: usize) -> Option<String> {
        self.0.label_custom_text(lines, index)
    }
}
