//! Horizontal reference lines drawn behind the plots.

mod config;
mod engine;
mod format;
mod gaps;
mod guard;

pub use config::{
    GuardMode, NumberLocale, NumberStyle, ReferenceLabelPlacement, ReferenceLinePositioning,
    ReferenceLines,
};
pub use engine::{
    EngineState, GuardEdge, NoCustomText, ReferenceLabelText, ReferenceLine,
    ReferenceLineEngine,
};
pub use format::LabelFormatter;
pub use gaps::{Gap, Gaps, LineSegment, LineSegments, SegmentPart, normalize_gaps, split_line};
pub use guard::{ReferenceLineRole, SegmentContext, SegmentTreatment, segment_treatment};
