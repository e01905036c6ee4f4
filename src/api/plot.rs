use crate::core::{PlotId, Viewport};
use crate::render::{LayerHandle, TextMeasure};

use super::{BarPlot, DotPlot, GraphDataSource, GraphHost, LinePlot};

/// Collaborators a plot needs to build its layers.
#[derive(Clone, Copy)]
pub struct PlotContext<'a> {
    pub viewport: Viewport,
    pub host: &'a dyn GraphHost,
    pub data: &'a dyn GraphDataSource,
    pub measure: &'a dyn TextMeasure,
}

/// Lifecycle of deferred value labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPhase {
    /// The plot shows no value labels.
    #[default]
    Disabled,
    /// Geometry is built; labels wait for the deferred pass.
    Pending,
    /// Labels are attached and re-laid on every rebuild.
    Attached,
}

/// Closed set of plot kinds drawn by a graph view.
#[derive(Debug)]
pub enum Plot {
    Line(LinePlot),
    Bar(BarPlot),
    Dot(DotPlot),
}

impl Plot {
    #[must_use]
    pub fn id(&self) -> &PlotId {
        match self {
            Self::Line(plot) => plot.id(),
            Self::Bar(plot) => plot.id(),
            Self::Dot(plot) => plot.id(),
        }
    }

    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Bar(_) => "bar",
            Self::Dot(_) => "dot",
        }
    }

    /// Creates fresh layers for `context.viewport` and builds their geometry.
    ///
    /// Layers returned by an earlier call are abandoned.
    pub fn layers(&mut self, context: &PlotContext<'_>) -> Vec<LayerHandle> {
        match self {
            Self::Line(plot) => plot.layers(context),
            Self::Bar(plot) => plot.layers(context),
            Self::Dot(plot) => plot.layers(context),
        }
    }

    /// Rebuilds geometry inside the current layers.
    pub fn rebuild(&mut self, context: &PlotContext<'_>) {
        match self {
            Self::Line(plot) => plot.rebuild(context),
            Self::Bar(plot) => plot.rebuild(context),
            Self::Dot(plot) => plot.rebuild(context),
        }
    }

    /// Layers currently owned by the plot, back to front.
    #[must_use]
    pub fn current_layers(&self) -> Vec<LayerHandle> {
        match self {
            Self::Line(plot) => plot.current_layers(),
            Self::Bar(plot) => plot.current_layers(),
            Self::Dot(plot) => plot.current_layers(),
        }
    }

    #[must_use]
    pub fn label_phase(&self) -> LabelPhase {
        match self {
            Self::Line(_) => LabelPhase::Disabled,
            Self::Bar(plot) => plot.label_phase(),
            Self::Dot(plot) => plot.label_phase(),
        }
    }

    /// Layer that receives deferred value labels, if any.
    #[must_use]
    pub fn label_layer(&self) -> Option<LayerHandle> {
        match self {
            Self::Line(_) => None,
            Self::Bar(plot) => plot.current_layers().into_iter().next(),
            Self::Dot(plot) => plot.current_layers().into_iter().next(),
        }
    }

    /// Runs the deferred label pass against `layer`.
    ///
    /// Returns `false` when `layer` no longer belongs to this plot.
    pub fn attach_value_labels(&mut self, layer: &LayerHandle, context: &PlotContext<'_>) -> bool {
        match self {
            Self::Line(_) => false,
            Self::Bar(plot) => plot.attach_value_labels(layer, context),
            Self::Dot(plot) => plot.attach_value_labels(layer, context),
        }
    }
}

impl From<LinePlot> for Plot {
    fn from(plot: LinePlot) -> Self {
        Self::Line(plot)
    }
}

impl From<BarPlot> for Plot {
    fn from(plot: BarPlot) -> Self {
        Self::Bar(plot)
    }
}

impl From<DotPlot> for Plot {
    fn from(plot: DotPlot) -> Self {
        Self::Dot(plot)
    }
}
