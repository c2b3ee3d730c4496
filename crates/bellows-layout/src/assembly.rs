use bellows_core::{BellowsSpec, DrawingSurface, PageSetup, PartCount};
use serde::Serialize;
use tracing::debug;

use crate::panel::{Axis, AxisDescriptor, PanelLayout};
use crate::schedule::FoldSchedule;
use crate::taper::round_half_up;

/// Where one panel goes relative to the previous one.
///
/// Applied in order: translate by `(seam_gap, 0)`, translate by `advance`, rotate by
/// `rotation`, then draw the panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub axis: Axis,
    pub side: u8,
    pub seam_gap: f64,
    pub advance: (f64, f64),
    pub rotation: f64,
}

/// The fixed W, H, W, H strip and the transforms that chain its panels together.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyPlan {
    pub origin: (f64, f64),
    pub angle_w: f64,
    pub angle_h: f64,
    pub placements: [Placement; 4],
}

impl AssemblyPlan {
    #[must_use]
    pub fn new(spec: &BellowsSpec, schedule: &FoldSchedule, page: &PageSetup) -> Self {
        let w = &spec.width;
        let h = &spec.height;
        let length = schedule.length;

        let angle_w = ((w.back_outer - w.front_outer) / length).atan();
        let angle_h = ((h.back_outer - h.front_outer) / length).atan();
        // Both axes share one joint angle; the true per-axis angles differ.
        let rotation = (angle_w + angle_h) / 2.0;

        let step = (w.back_outer / 2.0 + h.back_outer / 2.0)
            - ((w.back_outer - w.front_inner) + (h.back_outer - h.front_inner)) / 4.0;
        let parts = spec.parts;

        let gap_before_h2 = if parts == PartCount::Four {
            h.back_outer - h.back_inner + 0.2 * w.back_outer
        } else {
            0.0
        };
        let gap_before_w3 = if matches!(parts, PartCount::Two | PartCount::Four) {
            w.back_outer - w.back_inner
        } else {
            0.0
        };
        let gap_before_h4 = if parts == PartCount::Four {
            h.back_outer - h.back_inner
        } else {
            0.0
        };

        let joint = |axis, side, seam_gap| Placement {
            axis,
            side,
            seam_gap,
            advance: (step, spec.align),
            rotation,
        };

        Self {
            origin: (round_half_up(page.width / 2.0), round_half_up(page.height / 2.0)),
            angle_w,
            angle_h,
            placements: [
                Placement {
                    axis: Axis::Width,
                    side: 1,
                    seam_gap: 0.0,
                    advance: (-w.back_outer - h.back_outer / 2.0, 0.0),
                    rotation,
                },
                joint(Axis::Height, 2, gap_before_h2),
                joint(Axis::Width, 3, gap_before_w3),
                joint(Axis::Height, 4, gap_before_h4),
            ],
        }
    }

    /// Draw the four panels. Leaves the surface transform at the last panel's frame.
    pub fn draw<S: DrawingSurface>(
        &self,
        surface: &mut S,
        spec: &BellowsSpec,
        schedule: &FoldSchedule,
        dash: [f64; 2],
    ) -> Result<(), S::Error> {
        let widths = AxisDescriptor::width(spec.width);
        let heights = AxisDescriptor::height(spec.height);

        surface.translate(self.origin.0, self.origin.1);
        for placement in &self.placements {
            let descriptor = match placement.axis {
                Axis::Width => &widths,
                Axis::Height => &heights,
            };
            if placement.seam_gap != 0.0 {
                surface.translate(placement.seam_gap, 0.0);
            }
            surface.translate(placement.advance.0, placement.advance.1);
            surface.rotate(placement.rotation);
            debug!(
                axis = ?placement.axis,
                side = placement.side,
                seam_gap = placement.seam_gap,
                "placing panel"
            );
            PanelLayout::new(descriptor, placement.side, spec.parts, schedule).emit(surface, dash)?;
        }
        Ok(())
    }
}
