use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::PlotId;
use crate::error::ChartResult;
use crate::render::{Color, GeneratedPath, Label, StrokeStyle};

/// Role of a drawing layer; variants are listed in back-to-front order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    ReferenceLines,
    Fill,
    Line,
    Bar,
    Dot,
    DataPointLabels,
}

/// One path with a single fill/stroke pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeLayer {
    pub path: GeneratedPath,
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
}

impl ShapeLayer {
    #[must_use]
    pub fn stroked(path: GeneratedPath, stroke: StrokeStyle) -> Self {
        Self {
            path,
            fill: None,
            stroke: Some(stroke),
        }
    }

    #[must_use]
    pub fn filled(path: GeneratedPath, fill: Color) -> Self {
        Self {
            path,
            fill: Some(fill),
            stroke: None,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.path.validate()?;
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        Ok(())
    }
}

/// Drawable output of a plot or of the reference-line engine.
///
/// `overlays` composite above `shape` in order; `labels` draw last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingLayer {
    pub kind: LayerKind,
    /// Plot that produced this layer, resolved through the plot registry.
    pub owner: Option<PlotId>,
    /// Bumped on every rebuild so stale deferred work can detect replacement.
    pub generation: u64,
    pub shape: ShapeLayer,
    pub overlays: Vec<ShapeLayer>,
    pub labels: Vec<Label>,
}

impl DrawingLayer {
    #[must_use]
    pub fn new(kind: LayerKind, owner: Option<PlotId>) -> Self {
        Self {
            kind,
            owner,
            generation: 0,
            shape: ShapeLayer::default(),
            overlays: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: ShapeLayer) -> Self {
        self.shape = shape;
        self
    }

    /// Drops every overlay and label attached by a previous pass.
    pub fn clear_attachments(&mut self) {
        self.overlays.clear();
        self.labels.clear();
    }

    pub fn replace_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.shape.validate()?;
        for overlay in &self.overlays {
            overlay.validate()?;
        }
        for label in &self.labels {
            label.validate()?;
        }
        Ok(())
    }
}

/// Shared handle to a layer; deferred tasks keep only `Weak` references.
pub type LayerHandle = Rc<RefCell<DrawingLayer>>;

#[must_use]
pub fn layer_handle(layer: DrawingLayer) -> LayerHandle {
    Rc::new(RefCell::new(layer))
}
