use bellows_core::MM_PER_INCH;
use serde::{Deserialize, Serialize};

/// Unit the lengths of a config file are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Printer dots at the configured resolution.
    #[default]
    Dots,
    #[serde(alias = "millimeters", alias = "millimetres")]
    Mm,
}

/// Converts config lengths to dots at one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub units: Units,
    pub dots_per_mm: f64,
}

impl Scale {
    #[must_use]
    pub fn new(units: Units, resolution: f64) -> Self {
        Self {
            units,
            dots_per_mm: resolution / MM_PER_INCH,
        }
    }

    /// A length that is used as-is after conversion (max length, align).
    #[must_use]
    pub fn length(&self, value: f64) -> f64 {
        match self.units {
            Units::Dots => value,
            Units::Mm => value * self.dots_per_mm,
        }
    }

    /// An opening extent; millimetre values snap to whole dots.
    #[must_use]
    pub fn extent(&self, value: f64) -> f64 {
        match self.units {
            Units::Dots => value,
            Units::Mm => mm_to_dots(value, self.dots_per_mm),
        }
    }
}

/// Millimetres to whole dots, rounding ties up.
#[must_use]
pub fn mm_to_dots(mm: f64, dots_per_mm: f64) -> f64 {
    (mm * dots_per_mm + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_pass_through() {
        let s = Scale::new(Units::Dots, 300.0);
        assert_eq!(s.extent(591.0), 591.0);
        assert_eq!(s.length(3307.5), 3307.5);
    }

    #[test]
    fn mm_extents_snap_to_dots() {
        let s = Scale::new(Units::Mm, 300.0);
        assert_eq!(s.extent(50.0), 591.0);
        assert_eq!(s.extent(40.0), 472.0);
        assert!((s.length(280.0) - 3307.086_614).abs() < 1e-5);
    }
}
