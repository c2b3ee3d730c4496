use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Millimetres per inch; `resolution / MM_PER_INCH` converts millimetres to dots.
pub const MM_PER_INCH: f64 = 25.4;

/// Front/back, inner/outer extents of one axis of the bellows, in dots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtents {
    pub front_inner: f64,
    pub front_outer: f64,
    pub back_inner: f64,
    pub back_outer: f64,
}

impl AxisExtents {
    #[must_use]
    pub const fn new(front_inner: f64, front_outer: f64, back_inner: f64, back_outer: f64) -> Self {
        Self {
            front_inner,
            front_outer,
            back_inner,
            back_outer,
        }
    }

    /// Same opening at both ends.
    #[must_use]
    pub const fn straight(inner: f64, outer: f64) -> Self {
        Self::new(inner, outer, inner, outer)
    }

    fn validate(&self, axis: &'static str) -> Result<(), ConfigurationError> {
        for (what, value) in [
            ("front inner", self.front_inner),
            ("front outer", self.front_outer),
            ("back inner", self.back_inner),
            ("back outer", self.back_outer),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::NonPositiveExtent { axis, what, value });
            }
        }
        for (end, inner, outer) in [
            ("front", self.front_inner, self.front_outer),
            ("back", self.back_inner, self.back_outer),
        ] {
            if outer < inner {
                return Err(ConfigurationError::OuterSmallerThanInner {
                    axis,
                    end,
                    inner,
                    outer,
                });
            }
        }
        Ok(())
    }
}

/// How many physical pieces the net is cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum PartCount {
    #[default]
    One,
    Two,
    Four,
}

impl PartCount {
    #[must_use]
    pub const fn get(self) -> u8 {
        match self {
            PartCount::One => 1,
            PartCount::Two => 2,
            PartCount::Four => 4,
        }
    }
}

impl TryFrom<u8> for PartCount {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PartCount::One),
            2 => Ok(PartCount::Two),
            4 => Ok(PartCount::Four),
            other => Err(ConfigurationError::InvalidPartCount(u32::from(other))),
        }
    }
}

impl From<PartCount> for u8 {
    fn from(value: PartCount) -> Self {
        value.get()
    }
}

/// Everything the geometry needs, in dots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BellowsSpec {
    /// Dots per inch.
    pub resolution: f64,
    pub max_length: f64,
    /// Vertical registration correction added at every panel joint.
    pub align: f64,
    pub parts: PartCount,
    pub width: AxisExtents,
    pub height: AxisExtents,
}

impl BellowsSpec {
    /// Dots per millimetre.
    #[must_use]
    pub fn dots_per_mm(&self) -> f64 {
        self.resolution / MM_PER_INCH
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                what: "resolution",
                value: self.resolution,
            });
        }
        if !self.max_length.is_finite() || self.max_length <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                what: "maximum length",
                value: self.max_length,
            });
        }
        if !self.align.is_finite() {
            return Err(ConfigurationError::NonFinite { what: "align" });
        }
        self.width.validate("width")?;
        self.height.validate("height")
    }
}

/// Page the net is laid out on, in dots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    /// Draw the line-style key in the top-left corner.
    pub legend: bool,
}

impl PageSetup {
    /// US letter at `resolution` dots per inch.
    #[must_use]
    pub fn letter(resolution: f64) -> Self {
        Self {
            width: resolution * 8.5,
            height: resolution * 11.0,
            legend: true,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (what, value) in [("page width", self.width), ("page height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::NonPositive { what, value });
            }
        }
        Ok(())
    }
}
