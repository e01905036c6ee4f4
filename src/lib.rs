//! scrollgraph: geometry and path generation for scrollable charts.
//!
//! Data values are mapped into viewport pixels, turned into line, bar and dot
//! paths, and overlaid with labelled horizontal reference lines. Rendering
//! backends only ever see the resulting `RenderFrame`.

pub mod api;
pub mod core;
pub mod error;
pub mod reference;
pub mod render;
pub mod telemetry;

pub use api::{GraphConfig, GraphDataSource, GraphView};
pub use error::{ChartError, ChartResult};
