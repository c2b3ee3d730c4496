use thiserror::Error;

/// A geometric input or derived quantity that cannot produce a valid net.
///
/// Always raised before anything is drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{what} must be a positive finite number (got {value})")]
    NonPositive { what: &'static str, value: f64 },

    #[error("{what} must be finite")]
    NonFinite { what: &'static str },

    #[error("{axis} {what} extent must be a positive finite number (got {value})")]
    NonPositiveExtent {
        axis: &'static str,
        what: &'static str,
        value: f64,
    },

    #[error("{axis} {end} outer extent ({outer}) is smaller than the inner extent ({inner})")]
    OuterSmallerThanInner {
        axis: &'static str,
        end: &'static str,
        inner: f64,
        outer: f64,
    },

    #[error(
        "fold pitch must be positive: front outer width ({front_outer}) must exceed front inner width ({front_inner})"
    )]
    NonPositivePitch { front_inner: f64, front_outer: f64 },

    #[error("maximum length {max_length} is shorter than one fold pitch ({pitch})")]
    NoFolds { max_length: f64, pitch: f64 },

    #[error("part count must be 1, 2 or 4 (got {0})")]
    InvalidPartCount(u32),
}
