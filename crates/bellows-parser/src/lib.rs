//! Bellows option files (YAML or JSON) and their conversion to dots.

pub mod config;
pub mod error;
pub mod units;

pub use config::{BellowsConfig, DEFAULT_RESOLUTION, ResolvedConfig};
pub use error::Error;
pub use units::{Scale, Units, mm_to_dots};
