use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::Rect;

/// Horizontal interval of a reference line kept free for a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub start: f64,
    pub end: f64,
}

impl Gap {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Gap covering `frame` plus `margin` on both sides.
    #[must_use]
    pub fn around(frame: Rect, margin: f64) -> Self {
        Self::new(frame.left() - margin, frame.right() + margin)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.end - self.start
    }

    /// `true` when the open interval `(from, to)` overlaps the gap.
    #[must_use]
    pub fn overlaps(self, from: f64, to: f64) -> bool {
        from < self.end && self.start < to
    }
}

pub type Gaps = SmallVec<[Gap; 2]>;

/// Role of a sub-segment produced by gap-splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentPart {
    /// Whole line, or the longer side of a guarded single-gap line.
    Anchor,
    /// Shorter, label-side remainder of a guarded single-gap line.
    LabelSide,
    /// Piece of a guarded line split by two or more gaps.
    Between,
    /// Any piece of an unguarded line.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from_x: f64,
    pub to_x: f64,
    pub part: SegmentPart,
}

impl LineSegment {
    #[must_use]
    pub fn new(from_x: f64, to_x: f64, part: SegmentPart) -> Self {
        Self { from_x, to_x, part }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.to_x - self.from_x
    }
}

pub type LineSegments = SmallVec<[LineSegment; 3]>;

/// Sorts gaps left to right and merges any that overlap.
#[must_use]
pub fn normalize_gaps(gaps: &[Gap]) -> Gaps {
    let mut sorted: Gaps = gaps.iter().copied().collect();
    sorted.sort_by_key(|gap| OrderedFloat(gap.start));

    let mut merged = Gaps::new();
    for gap in sorted {
        match merged.last_mut() {
            Some(last) if gap.start <= last.end => last.end = last.end.max(gap.end),
            _ => merged.push(gap),
        }
    }
    merged
}

/// Splits the line `from_x..to_x` around `gaps`, left to right.
///
/// N disjoint gaps give N + 1 segments. With `guarded` set, a single gap
/// marks the longer side as the anchor and the other as the label side; on
/// equal lengths the right side is the anchor. Guarded lines with more gaps
/// mark every piece as [`SegmentPart::Between`]. Segments of negative length
/// (a gap reaching past a line end) are dropped.
#[must_use]
pub fn split_line(from_x: f64, to_x: f64, gaps: &[Gap], guarded: bool) -> LineSegments {
    let gaps = normalize_gaps(gaps);
    let mut segments = LineSegments::new();

    match gaps.as_slice() {
        [] => segments.push(LineSegment::new(from_x, to_x, SegmentPart::Anchor)),
        [gap] if guarded => {
            if gap.start - from_x > to_x - gap.end {
                segments.push(LineSegment::new(from_x, gap.start, SegmentPart::Anchor));
                segments.push(LineSegment::new(gap.end, to_x, SegmentPart::LabelSide));
            } else {
                segments.push(LineSegment::new(from_x, gap.start, SegmentPart::LabelSide));
                segments.push(LineSegment::new(gap.end, to_x, SegmentPart::Anchor));
            }
        }
        gaps => {
            let part = if guarded {
                SegmentPart::Between
            } else {
                SegmentPart::Plain
            };
            let mut cursor = from_x;
            for gap in gaps {
                segments.push(LineSegment::new(cursor, gap.start, part));
                cursor = gap.end;
            }
            segments.push(LineSegment::new(cursor, to_x, part));
        }
    }

    segments.retain(|segment| segment.length() >= 0.0);
    segments
}

#[cfg(test)]
mod tests {
    use super::{Gap, SegmentPart, normalize_gaps, split_line};
    use crate::core::Rect;

    #[test]
    fn gap_wraps_frame_with_margin() {
        let gap = Gap::around(Rect::new(10.0, 0.0, 20.0, 12.0), 4.0);
        assert_eq!((gap.start, gap.end), (6.0, 34.0));
        assert_eq!(gap.width(), 28.0);
    }

    #[test]
    fn two_gaps_give_three_plain_segments() {
        let segments = split_line(
            0.0,
            300.0,
            &[Gap::new(256.0, 294.0), Gap::new(6.0, 34.0)],
            false,
        );
        assert_eq!(segments.len(), 3);
        assert_eq!((segments[0].from_x, segments[0].to_x), (0.0, 6.0));
        assert_eq!((segments[1].from_x, segments[1].to_x), (34.0, 256.0));
        assert_eq!((segments[2].from_x, segments[2].to_x), (294.0, 300.0));
        assert!(segments.iter().all(|segment| segment.part == SegmentPart::Plain));

        let guarded = split_line(
            0.0,
            300.0,
            &[Gap::new(256.0, 294.0), Gap::new(6.0, 34.0)],
            true,
        );
        assert_eq!(guarded.len(), 3);
        assert!(guarded.iter().all(|segment| segment.part == SegmentPart::Between));
    }

    #[test]
    fn guarded_single_gap_anchors_the_longer_side() {
        let left_label = split_line(0.0, 300.0, &[Gap::new(6.0, 34.0)], true);
        assert_eq!(left_label[0].part, SegmentPart::LabelSide);
        assert_eq!(left_label[1].part, SegmentPart::Anchor);

        let right_label = split_line(0.0, 300.0, &[Gap::new(256.0, 294.0)], true);
        assert_eq!(right_label[0].part, SegmentPart::Anchor);
        assert_eq!(right_label[1].part, SegmentPart::LabelSide);
    }

    #[test]
    fn overlapping_gaps_merge() {
        let merged = normalize_gaps(&[Gap::new(10.0, 50.0), Gap::new(40.0, 80.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (10.0, 80.0));
        assert_eq!(split_line(0.0, 100.0, &merged, false).len(), 2);
    }

    #[test]
    fn gap_past_line_end_drops_empty_side() {
        let segments = split_line(0.0, 100.0, &[Gap::new(90.0, 120.0)], false);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].to_x, 90.0);
    }
}
