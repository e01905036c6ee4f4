//! Guard-line rules for reference line segments.
//!
//! Every drawn segment is classified by a small decision table instead of
//! branching on style, guard mode and line role at each call site.

use crate::reference::{GuardMode, SegmentPart};
use crate::render::LineStrokeStyle;

/// Which reference line a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceLineRole {
    /// Bottom line at the range minimum.
    Minimum,
    /// Top line at the range maximum.
    Maximum,
    /// Relative or absolute line, by position in the configured list.
    Intermediate(usize),
}

impl ReferenceLineRole {
    /// Index passed to the custom label text lookup.
    ///
    /// The minimum is `0`, intermediate lines follow from `1`, and the
    /// maximum comes right after the last intermediate line.
    #[must_use]
    pub fn custom_text_index(self, intermediate_count: usize) -> usize {
        match self {
            Self::Minimum => 0,
            Self::Intermediate(ordinal) => ordinal + 1,
            Self::Maximum => intermediate_count + 1,
        }
    }
}

/// How one segment is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentTreatment {
    /// Plain segment in the main path.
    Stroke,
    /// Not drawn.
    Suppress,
    /// Solid bottom edge overlay shared by every piece of the bottom line.
    BottomOverlay,
    /// Main path segment plus a short solid tick at its right end.
    StrokeWithEndTick,
    /// Main path up to the left guard boundary, solid overlay after it.
    SplitAtLeftGuard,
    /// Solid tick at the left guard boundary, main path after it.
    TickAtLeftGuard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentContext {
    pub style: LineStrokeStyle,
    pub guard: GuardMode,
    pub outer_solid: bool,
    pub role: ReferenceLineRole,
    pub part: SegmentPart,
}

#[must_use]
pub fn segment_treatment(context: SegmentContext) -> SegmentTreatment {
    let solid_edges_over_dashes =
        context.outer_solid && context.style == LineStrokeStyle::Dashed;

    match (context.part, context.guard, solid_edges_over_dashes, context.role) {
        (SegmentPart::Plain, ..) => SegmentTreatment::Stroke,
        (SegmentPart::Between, _, false, _) | (SegmentPart::Between, GuardMode::Off, ..) => {
            SegmentTreatment::Stroke
        }
        (SegmentPart::Between, _, true, ReferenceLineRole::Minimum) => {
            SegmentTreatment::BottomOverlay
        }
        (SegmentPart::Between, GuardMode::Right, true, _) => SegmentTreatment::StrokeWithEndTick,
        (SegmentPart::Between, GuardMode::Left, true, _) => SegmentTreatment::Stroke,
        (SegmentPart::LabelSide, _, true, _) => SegmentTreatment::Suppress,
        (SegmentPart::LabelSide, _, false, _) => SegmentTreatment::Stroke,
        (SegmentPart::Anchor, _, false, _) | (SegmentPart::Anchor, GuardMode::Off, ..) => {
            SegmentTreatment::Stroke
        }
        (SegmentPart::Anchor, GuardMode::Right, true, ReferenceLineRole::Minimum) => {
            SegmentTreatment::BottomOverlay
        }
        (SegmentPart::Anchor, GuardMode::Right, true, _) => SegmentTreatment::StrokeWithEndTick,
        (SegmentPart::Anchor, GuardMode::Left, true, ReferenceLineRole::Minimum) => {
            SegmentTreatment::SplitAtLeftGuard
        }
        (SegmentPart::Anchor, GuardMode::Left, true, _) => SegmentTreatment::TickAtLeftGuard,
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferenceLineRole, SegmentContext, SegmentTreatment, segment_treatment};
    use crate::reference::{GuardMode, SegmentPart};
    use crate::render::LineStrokeStyle;

    fn context(
        style: LineStrokeStyle,
        guard: GuardMode,
        role: ReferenceLineRole,
        part: SegmentPart,
    ) -> SegmentContext {
        SegmentContext {
            style,
            guard,
            outer_solid: true,
            role,
            part,
        }
    }

    #[test]
    fn solid_style_always_strokes_anchor_and_label_side() {
        for guard in [GuardMode::Off, GuardMode::Right, GuardMode::Left] {
            for part in [
                SegmentPart::Anchor,
                SegmentPart::LabelSide,
                SegmentPart::Between,
                SegmentPart::Plain,
            ] {
                let treatment = segment_treatment(context(
                    LineStrokeStyle::Solid,
                    guard,
                    ReferenceLineRole::Minimum,
                    part,
                ));
                assert_eq!(treatment, SegmentTreatment::Stroke);
            }
        }
    }

    #[test]
    fn dashed_with_outer_solid_follows_guard_mode() {
        let dashed = LineStrokeStyle::Dashed;
        let cases = [
            (GuardMode::Right, ReferenceLineRole::Minimum, SegmentTreatment::BottomOverlay),
            (GuardMode::Right, ReferenceLineRole::Maximum, SegmentTreatment::StrokeWithEndTick),
            (
                GuardMode::Right,
                ReferenceLineRole::Intermediate(0),
                SegmentTreatment::StrokeWithEndTick,
            ),
            (GuardMode::Left, ReferenceLineRole::Minimum, SegmentTreatment::SplitAtLeftGuard),
            (GuardMode::Left, ReferenceLineRole::Maximum, SegmentTreatment::TickAtLeftGuard),
            (GuardMode::Off, ReferenceLineRole::Minimum, SegmentTreatment::Stroke),
        ];
        for (guard, role, expected) in cases {
            let treatment = segment_treatment(context(dashed, guard, role, SegmentPart::Anchor));
            assert_eq!(treatment, expected, "{guard:?} {role:?}");
        }

        let label_side = segment_treatment(context(
            dashed,
            GuardMode::Right,
            ReferenceLineRole::Intermediate(1),
            SegmentPart::LabelSide,
        ));
        assert_eq!(label_side, SegmentTreatment::Suppress);
    }

    #[test]
    fn pieces_between_two_labels_keep_their_line_role() {
        let dashed = LineStrokeStyle::Dashed;
        let cases = [
            (GuardMode::Right, ReferenceLineRole::Minimum, SegmentTreatment::BottomOverlay),
            (GuardMode::Right, ReferenceLineRole::Maximum, SegmentTreatment::StrokeWithEndTick),
            (GuardMode::Left, ReferenceLineRole::Minimum, SegmentTreatment::BottomOverlay),
            (GuardMode::Left, ReferenceLineRole::Intermediate(0), SegmentTreatment::Stroke),
        ];
        for (guard, role, expected) in cases {
            let treatment = segment_treatment(context(dashed, guard, role, SegmentPart::Between));
            assert_eq!(treatment, expected, "{guard:?} {role:?}");
        }

        let solid = segment_treatment(context(
            LineStrokeStyle::Solid,
            GuardMode::Right,
            ReferenceLineRole::Minimum,
            SegmentPart::Between,
        ));
        assert_eq!(solid, SegmentTreatment::Stroke);
    }

    #[test]
    fn dashed_without_outer_solid_keeps_plain_strokes() {
        let mut ctx = context(
            LineStrokeStyle::Dashed,
            GuardMode::Left,
            ReferenceLineRole::Minimum,
            SegmentPart::LabelSide,
        );
        ctx.outer_solid = false;
        assert_eq!(segment_treatment(ctx), SegmentTreatment::Stroke);
        ctx.part = SegmentPart::Anchor;
        assert_eq!(segment_treatment(ctx), SegmentTreatment::Stroke);
    }

    #[test]
    fn custom_text_indices_bracket_intermediate_lines() {
        assert_eq!(ReferenceLineRole::Minimum.custom_text_index(3), 0);
        assert_eq!(ReferenceLineRole::Intermediate(0).custom_text_index(3), 1);
        assert_eq!(ReferenceLineRole::Intermediate(2).custom_text_index(3), 3);
        assert_eq!(ReferenceLineRole::Maximum.custom_text_index(3), 4);
    }
}
