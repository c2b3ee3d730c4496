use bellows_core::{AxisExtents, DrawingSurface, PartCount, Point2, Segment, SegmentKind};
use serde::Serialize;

use crate::schedule::FoldSchedule;
use crate::taper::{TaperProfile, round_half_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
}

/// One axis of the bellows as seen by [`PanelLayout`].
///
/// `parity_swapped` flips which fold rows sit on the inner rail. Height panels are
/// swapped relative to width panels so the two axes interleave once the tube is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDescriptor {
    pub axis: Axis,
    pub extents: AxisExtents,
    pub parity_swapped: bool,
}

impl AxisDescriptor {
    #[must_use]
    pub const fn width(extents: AxisExtents) -> Self {
        Self {
            axis: Axis::Width,
            extents,
            parity_swapped: false,
        }
    }

    #[must_use]
    pub const fn height(extents: AxisExtents) -> Self {
        Self {
            axis: Axis::Height,
            extents,
            parity_swapped: true,
        }
    }

    /// Whether fold row `i` is a valley fold across the inner extent.
    #[must_use]
    pub fn is_inner_row(&self, i: u32) -> bool {
        (i % 2 == 0) != self.parity_swapped
    }

    /// Left edge is a free edge (needs a cut) rather than a joined seam.
    #[must_use]
    pub fn cuts_left_edge(&self, side: u8, parts: PartCount) -> bool {
        match self.axis {
            Axis::Width => {
                side == 1
                    || parts == PartCount::Four
                    || (parts == PartCount::Two && side == 3)
            }
            Axis::Height => parts == PartCount::Four,
        }
    }

    #[must_use]
    pub fn cuts_right_edge(&self, side: u8, parts: PartCount) -> bool {
        match self.axis {
            Axis::Width => parts == PartCount::Four,
            Axis::Height => parts != PartCount::One || side == 4,
        }
    }
}

/// Placement-independent frame of one panel: its local origin and the horizontal shift
/// of the front edge relative to the back edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelInstance {
    pub axis: Axis,
    pub side: u8,
    pub x: f64,
    pub y: f64,
    pub front_offset: f64,
}

impl PanelInstance {
    #[must_use]
    pub fn new(descriptor: &AxisDescriptor, side: u8, schedule: &FoldSchedule) -> Self {
        let e = &descriptor.extents;
        Self {
            axis: descriptor.axis,
            side,
            x: -e.back_outer / 2.0,
            y: -schedule.length / 2.0,
            front_offset: round_half_up((e.back_outer - e.front_outer) / 2.0),
        }
    }
}

/// Flat pattern of a single panel, in panel-local coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayout<'a> {
    descriptor: &'a AxisDescriptor,
    schedule: &'a FoldSchedule,
    parts: PartCount,
    instance: PanelInstance,
}

impl<'a> PanelLayout<'a> {
    #[must_use]
    pub fn new(
        descriptor: &'a AxisDescriptor,
        side: u8,
        parts: PartCount,
        schedule: &'a FoldSchedule,
    ) -> Self {
        Self {
            descriptor,
            schedule,
            parts,
            instance: PanelInstance::new(descriptor, side, schedule),
        }
    }

    #[must_use]
    pub fn instance(&self) -> &PanelInstance {
        &self.instance
    }

    fn inner_rail(&self) -> f64 {
        let e = &self.descriptor.extents;
        self.instance.x + (e.back_outer - e.back_inner) / 2.0
    }

    fn outer_rail(&self) -> f64 {
        self.instance.x
    }

    fn inner_taper(&self) -> TaperProfile {
        let e = &self.descriptor.extents;
        TaperProfile::new(e.back_inner, e.front_inner, self.schedule.length)
    }

    fn outer_taper(&self) -> TaperProfile {
        let e = &self.descriptor.extents;
        TaperProfile::new(e.back_outer, e.front_outer, self.schedule.length)
    }

    fn row_y(&self, i: u32) -> f64 {
        self.instance.y + self.schedule.row(i)
    }

    /// Cut lines: the free side edges, then the back (top) and front (bottom) edges.
    #[must_use]
    pub fn outline(&self) -> Vec<Segment> {
        let e = &self.descriptor.extents;
        let PanelInstance {
            x,
            y,
            front_offset,
            side,
            ..
        } = self.instance;
        let length = self.schedule.length;
        let bottom = y + length;

        let mut out = Vec::with_capacity(4);
        if self.descriptor.cuts_left_edge(side, self.parts) {
            out.push(Segment::cut(
                Point2::new(x, y),
                Point2::new(x + front_offset, bottom),
            ));
        }
        if self.descriptor.cuts_right_edge(side, self.parts) {
            out.push(Segment::cut(
                Point2::new(x + e.back_outer, y),
                Point2::new(x + e.back_outer - front_offset, bottom),
            ));
        }
        out.push(Segment::cut(
            Point2::new(x, y),
            Point2::new(x + e.back_outer, y),
        ));
        out.push(Segment::cut(
            Point2::new(x + front_offset, bottom),
            Point2::new(x + e.front_outer + front_offset, bottom),
        ));
        out
    }

    /// Horizontal folds on rows `1..fold_count`, alternating valley (inner extent) and
    /// mountain (outer extent).
    #[must_use]
    pub fn fold_lines(&self) -> Vec<Segment> {
        let e = &self.descriptor.extents;
        let inner = self.inner_rail();
        let outer = self.outer_rail();
        let inner_taper = self.inner_taper();
        let outer_taper = self.outer_taper();

        (1..self.schedule.fold_count)
            .map(|i| {
                let y = self.row_y(i);
                let pos = self.schedule.row(i);
                if self.descriptor.is_inner_row(i) {
                    let t = inner_taper.at(pos);
                    Segment::new(
                        SegmentKind::FoldAway,
                        Point2::new(inner + t, y),
                        Point2::new(inner + e.back_inner - t, y),
                    )
                } else {
                    let t = outer_taper.at(pos);
                    Segment::new(
                        SegmentKind::FoldToward,
                        Point2::new(outer + t, y),
                        Point2::new(outer + e.back_outer - t, y),
                    )
                }
            })
            .collect()
    }

    /// Diagonal corner creases on the left edge, one per fold band, zig-zagging between
    /// the inner and outer rails.
    #[must_use]
    pub fn left_corners(&self) -> Vec<Segment> {
        let inner = self.inner_rail();
        let outer = self.outer_rail();
        self.corner_band(|inner_row, t, t2| {
            if inner_row {
                (inner + t, outer + t2)
            } else {
                (outer + t, inner + t2)
            }
        })
    }

    /// Mirror of [`PanelLayout::left_corners`] on the right edge.
    #[must_use]
    pub fn right_corners(&self) -> Vec<Segment> {
        let e = &self.descriptor.extents;
        let inner_right = self.inner_rail() + e.back_inner;
        let outer_right = self.outer_rail() + e.back_outer;
        self.corner_band(|inner_row, t, t2| {
            if inner_row {
                (inner_right - t, outer_right - t2)
            } else {
                (outer_right - t, inner_right - t2)
            }
        })
    }

    fn corner_band(&self, xs: impl Fn(bool, f64, f64) -> (f64, f64)) -> Vec<Segment> {
        let taper = self.inner_taper();
        (0..self.schedule.fold_count)
            .map(|i| {
                let t = taper.at(self.schedule.row(i));
                let t2 = taper.at(self.schedule.row(i + 1));
                let (x0, x1) = xs(self.descriptor.is_inner_row(i), t, t2);
                Segment::new(
                    SegmentKind::FoldAway,
                    Point2::new(x0, self.row_y(i)),
                    Point2::new(x1, self.row_y(i + 1)),
                )
            })
            .collect()
    }

    /// Every segment of the panel in drawing order.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = self.outline();
        out.extend(self.fold_lines());
        out.extend(self.left_corners());
        out.extend(self.right_corners());
        out
    }

    pub fn emit<S: DrawingSurface>(&self, surface: &mut S, dash: [f64; 2]) -> Result<(), S::Error> {
        for segment in self.segments() {
            surface.draw_segment(&segment, dash)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn schedule() -> FoldSchedule {
        FoldSchedule::derive(&AxisExtents::straight(472.0, 591.0), 3307.0).unwrap()
    }

    fn count(segments: &[Segment], kind: SegmentKind) -> usize {
        segments.iter().filter(|s| s.kind == kind).count()
    }

    #[test]
    fn instance_origin_is_centered() {
        let s = schedule();
        let d = AxisDescriptor::width(AxisExtents::new(472.0, 591.0, 600.0, 720.0));
        let inst = PanelInstance::new(&d, 1, &s);
        assert_abs_diff_eq!(inst.x, -360.0);
        assert_abs_diff_eq!(inst.y, -s.length / 2.0);
        // (720 - 591) / 2 = 64.5 rounds up.
        assert_abs_diff_eq!(inst.front_offset, 65.0);
    }

    #[test]
    fn height_rows_are_swapped() {
        let w = AxisDescriptor::width(AxisExtents::straight(1.0, 2.0));
        let h = AxisDescriptor::height(AxisExtents::straight(1.0, 2.0));
        for i in 0..6 {
            assert_ne!(w.is_inner_row(i), h.is_inner_row(i));
        }
        assert!(w.is_inner_row(2));
        assert!(h.is_inner_row(1));
    }

    #[test]
    fn width_fold_one_is_a_mountain_across_the_outer_extent() {
        let s = schedule();
        let d = AxisDescriptor::width(AxisExtents::straight(472.0, 591.0));
        let layout = PanelLayout::new(&d, 1, PartCount::One, &s);
        let folds = layout.fold_lines();
        assert_eq!(folds[0].kind, SegmentKind::FoldToward);
        assert_abs_diff_eq!(folds[0].from.x, -295.5);
        assert_abs_diff_eq!(folds[0].to.x, 295.5);
        assert_eq!(folds[1].kind, SegmentKind::FoldAway);
        assert_abs_diff_eq!(folds[1].from.x, -236.0);
        assert_abs_diff_eq!(folds[1].to.x, 236.0);
    }

    #[test]
    fn height_fold_one_is_a_valley() {
        let s = schedule();
        let d = AxisDescriptor::height(AxisExtents::straight(472.0, 591.0));
        let layout = PanelLayout::new(&d, 2, PartCount::One, &s);
        assert_eq!(layout.fold_lines()[0].kind, SegmentKind::FoldAway);
    }

    #[test]
    fn straight_panel_corners_zig_zag_between_rails() {
        let s = schedule();
        let d = AxisDescriptor::width(AxisExtents::straight(472.0, 591.0));
        let layout = PanelLayout::new(&d, 1, PartCount::One, &s);
        let left = layout.left_corners();
        // Row 0 is an inner row on the width axis: inner rail down to outer rail.
        assert_abs_diff_eq!(left[0].from.x, -236.0);
        assert_abs_diff_eq!(left[0].to.x, -295.5);
        assert_abs_diff_eq!(left[1].from.x, -295.5);
        assert_abs_diff_eq!(left[1].to.x, -236.0);
        let right = layout.right_corners();
        assert_abs_diff_eq!(right[0].from.x, 236.0);
        assert_abs_diff_eq!(right[0].to.x, 295.5);
    }

    #[test]
    fn dashed_line_count_matches_fold_count() {
        let s = schedule();
        let n = s.fold_count as usize;
        for d in [
            AxisDescriptor::width(AxisExtents::straight(472.0, 591.0)),
            AxisDescriptor::height(AxisExtents::new(400.0, 500.0, 472.0, 591.0)),
        ] {
            let segments = PanelLayout::new(&d, 2, PartCount::Two, &s).segments();
            let dashed = segments.iter().filter(|seg| seg.kind.is_dashed()).count();
            assert_eq!(dashed, (n - 1) + 2 * n);
        }
    }

    #[test]
    fn side_edges_follow_part_mode() {
        let s = schedule();
        let w = AxisDescriptor::width(AxisExtents::straight(472.0, 591.0));
        let h = AxisDescriptor::height(AxisExtents::straight(472.0, 591.0));
        let cuts = |d: &AxisDescriptor, side, parts| {
            count(
                &PanelLayout::new(d, side, parts, &s).outline(),
                SegmentKind::Cut,
            )
        };

        // One piece: only the two ends of the strip are free.
        assert_eq!(cuts(&w, 1, PartCount::One), 3);
        assert_eq!(cuts(&h, 2, PartCount::One), 2);
        assert_eq!(cuts(&w, 3, PartCount::One), 2);
        assert_eq!(cuts(&h, 4, PartCount::One), 3);

        // Two pieces: W1+H2 and W3+H4.
        assert_eq!(cuts(&w, 1, PartCount::Two), 3);
        assert_eq!(cuts(&h, 2, PartCount::Two), 3);
        assert_eq!(cuts(&w, 3, PartCount::Two), 3);
        assert_eq!(cuts(&h, 4, PartCount::Two), 3);

        // Four pieces: every panel stands alone.
        for (d, side) in [(&w, 1), (&h, 2), (&w, 3), (&h, 4)] {
            assert_eq!(cuts(d, side, PartCount::Four), 4);
        }
    }

    #[test]
    fn bottom_edge_is_shifted_by_front_offset() {
        let s = schedule();
        let d = AxisDescriptor::width(AxisExtents::new(472.0, 591.0, 600.0, 719.0));
        let layout = PanelLayout::new(&d, 1, PartCount::One, &s);
        let outline = layout.outline();
        let bottom = outline.last().unwrap();
        assert_abs_diff_eq!(bottom.from.x, -359.5 + 64.0);
        assert_abs_diff_eq!(bottom.to.x - bottom.from.x, 591.0);
        assert_abs_diff_eq!(bottom.from.y, s.length / 2.0);
    }
}
