//! Stateful graph façade and the plots it owns.

mod bar_plot;
mod config;
mod data_source;
mod dot_plot;
mod graph;
mod line_plot;
mod plot;
mod scheduler;

pub use bar_plot::BarPlot;
pub use config::{DataPointLabelStyle, GraphConfig};
pub use data_source::{DataSourceLabels, GraphDataSource, GraphHost};
pub use dot_plot::DotPlot;
pub use graph::GraphView;
pub use line_plot::LinePlot;
pub use plot::{LabelPhase, Plot, PlotContext};
pub use scheduler::{LabelScheduler, LabelTask, ReadyLabelTask, VALUE_LABEL_DEFERRAL};
