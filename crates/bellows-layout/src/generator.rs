use bellows_core::{
    BellowsSpec, ConfigurationError, DrawCommand, DrawingSurface, MM_PER_INCH, PageSetup, Point2,
    Recorder, Rgba, Segment,
};
use tracing::{debug, info};

use crate::assembly::AssemblyPlan;
use crate::error::GenerateError;
use crate::legend::draw_legend;
use crate::panel::{Axis, AxisDescriptor, PanelLayout};
use crate::schedule::FoldSchedule;

/// Dash on/off lengths for fold lines: 1 mm on, 0.5 mm off.
#[must_use]
pub fn fold_dash(resolution: f64) -> [f64; 2] {
    let dots_per_mm = resolution / MM_PER_INCH;
    [dots_per_mm, dots_per_mm * 0.5]
}

/// A validated bellows pattern, ready to be drawn onto any surface.
#[derive(Debug, Clone)]
pub struct Generator {
    spec: BellowsSpec,
    page: PageSetup,
    schedule: FoldSchedule,
    plan: AssemblyPlan,
}

impl Generator {
    /// Validate `spec` and `page` and derive the fold schedule. Nothing is drawn yet.
    pub fn new(spec: BellowsSpec, page: PageSetup) -> Result<Self, ConfigurationError> {
        spec.validate()?;
        page.validate()?;
        let schedule = FoldSchedule::derive(&spec.width, spec.max_length)?;
        let plan = AssemblyPlan::new(&spec, &schedule, &page);
        debug!(
            pitch = schedule.pitch,
            folds = schedule.fold_count,
            length = schedule.length,
            angle_w = plan.angle_w,
            angle_h = plan.angle_h,
            "derived fold schedule"
        );
        Ok(Self {
            spec,
            page,
            schedule,
            plan,
        })
    }

    #[must_use]
    pub fn spec(&self) -> &BellowsSpec {
        &self.spec
    }

    #[must_use]
    pub fn page(&self) -> &PageSetup {
        &self.page
    }

    #[must_use]
    pub fn schedule(&self) -> &FoldSchedule {
        &self.schedule
    }

    #[must_use]
    pub fn plan(&self) -> &AssemblyPlan {
        &self.plan
    }

    #[must_use]
    pub fn dash(&self) -> [f64; 2] {
        fold_dash(self.spec.resolution)
    }

    /// Panel-local segments of the four panels in strip order.
    #[must_use]
    pub fn panel_segments(&self) -> Vec<Vec<Segment>> {
        let widths = AxisDescriptor::width(self.spec.width);
        let heights = AxisDescriptor::height(self.spec.height);
        self.plan
            .placements
            .iter()
            .map(|p| {
                let descriptor = match p.axis {
                    Axis::Width => &widths,
                    Axis::Height => &heights,
                };
                PanelLayout::new(descriptor, p.side, self.spec.parts, &self.schedule).segments()
            })
            .collect()
    }

    /// Draw the full page: background, optional legend, then the four-panel strip.
    pub fn render<S: DrawingSurface>(&self, surface: &mut S) -> Result<(), S::Error> {
        let dash = self.dash();
        surface.fill_rect(
            Point2::new(0.0, 0.0),
            self.page.width,
            self.page.height,
            Rgba::WHITE,
        )?;
        if self.page.legend {
            draw_legend(surface, self.spec.resolution, dash)?;
        }
        self.plan.draw(surface, &self.spec, &self.schedule, dash)?;
        info!(
            folds = self.schedule.fold_count,
            parts = self.spec.parts.get(),
            "rendered bellows net"
        );
        Ok(())
    }

    /// Render onto a [`Recorder`] and return its commands.
    #[must_use]
    pub fn record(&self) -> Vec<DrawCommand> {
        let mut recorder = Recorder::new();
        match self.render(&mut recorder) {
            Ok(()) => recorder.into_commands(),
            Err(never) => match never {},
        }
    }
}

/// Validate, then draw onto `surface` in one call.
///
/// Configuration problems are reported before the surface sees a single command.
pub fn generate<S: DrawingSurface>(
    spec: BellowsSpec,
    page: PageSetup,
    surface: &mut S,
) -> Result<Generator, GenerateError<S::Error>> {
    let generator = Generator::new(spec, page)?;
    generator.render(surface).map_err(GenerateError::Surface)?;
    Ok(generator)
}
