//! Shared primitives for bellows nets: points, transforms, typed segments, the input
//! spec and the drawing-surface contract every backend implements.

mod error;
mod point;
mod segment;
mod spec;
mod surface;

pub use error::ConfigurationError;
pub use point::{Affine, Point2};
pub use segment::{Rgba, Segment, SegmentKind, TextStyle};
pub use spec::{AxisExtents, BellowsSpec, MM_PER_INCH, PageSetup, PartCount};
pub use surface::{DrawCommand, DrawingSurface, PendingPath, Recorder, rect_corners};
