//! Bellows net geometry: fold schedule, per-panel flat patterns and the four-panel
//! assembly that turns them into one printable strip.

pub mod assembly;
pub mod error;
pub mod generator;
pub mod legend;
pub mod panel;
pub mod schedule;
pub mod taper;

pub use assembly::{AssemblyPlan, Placement};
pub use error::GenerateError;
pub use generator::{Generator, fold_dash, generate};
pub use panel::{Axis, AxisDescriptor, PanelInstance, PanelLayout};
pub use schedule::FoldSchedule;
pub use taper::{TaperProfile, round_half_up, taper};
