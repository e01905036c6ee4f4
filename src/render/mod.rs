mod frame;
mod label;
mod layer;
mod null_renderer;
mod path;
mod primitives;

pub use frame::RenderFrame;
pub use label::{EstimatedTextMeasure, Label, TextHAlign, TextMeasure};
pub use layer::{DrawingLayer, LayerHandle, LayerKind, ShapeLayer, layer_handle};
pub use null_renderer::NullRenderer;
pub use path::{GeneratedPath, PathCommand};
pub use primitives::{Color, Font, LabelTransform, LineStrokeStyle, StrokeStyle};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` so drawing code stays
/// isolated from range, layout and data-source logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
