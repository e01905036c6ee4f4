use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawingLayer, LayerKind};

/// Backend-agnostic scene for one chart draw pass.
///
/// Layers are snapshots taken from live layer handles; the frame owns them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    /// Horizontal scroll offset applied to plot layers by the backend.
    pub content_offset_x: f64,
    pub layers: Vec<DrawingLayer>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            content_offset_x: 0.0,
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_content_offset(mut self, offset_x: f64) -> Self {
        self.content_offset_x = offset_x;
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: DrawingLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push_layer(&mut self, layer: DrawingLayer) {
        self.layers.push(layer);
    }

    /// Reference lines are drawn in viewport space and never scroll.
    #[must_use]
    pub fn scrolls_with_content(kind: LayerKind) -> bool {
        !matches!(kind, LayerKind::ReferenceLines)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.content_offset_x.is_finite() {
            return Err(ChartError::InvalidData(
                "content offset must be finite".to_owned(),
            ));
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn layers_of(&self, kind: LayerKind) -> Vec<&DrawingLayer> {
        self.layers.iter().filter(|layer| layer.kind == kind).collect()
    }

    #[must_use]
    pub fn label_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.labels.len()).sum()
    }

    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.overlays.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|layer| {
            layer.shape.path.is_empty() && layer.overlays.is_empty() && layer.labels.is_empty()
        })
    }
}
