use bellows_core::{AxisExtents, ConfigurationError};
use serde::Serialize;

/// Fold pitch and count shared by all four panels.
///
/// Derived from the front width only, so height panels fold on exactly the same rows
/// as width panels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoldSchedule {
    pub pitch: f64,
    pub fold_count: u32,
    pub length: f64,
}

impl FoldSchedule {
    pub fn derive(width: &AxisExtents, max_length: f64) -> Result<Self, ConfigurationError> {
        let pitch = (width.front_outer - width.front_inner) / 2.0;
        if !pitch.is_finite() || pitch <= 0.0 {
            return Err(ConfigurationError::NonPositivePitch {
                front_inner: width.front_inner,
                front_outer: width.front_outer,
            });
        }
        if !max_length.is_finite() || max_length <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                what: "maximum length",
                value: max_length,
            });
        }

        let folds = (max_length / pitch).floor();
        if folds < 1.0 {
            return Err(ConfigurationError::NoFolds { max_length, pitch });
        }
        if folds > f64::from(u32::MAX) {
            return Err(ConfigurationError::NonFinite {
                what: "fold count",
            });
        }
        let fold_count = folds as u32;

        Ok(Self {
            pitch,
            fold_count,
            length: f64::from(fold_count) * pitch,
        })
    }

    /// Distance of fold row `i` from the back edge.
    #[must_use]
    pub fn row(&self, i: u32) -> f64 {
        f64::from(i) * self.pitch
    }
}
