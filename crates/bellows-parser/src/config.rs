use std::path::Path;

use bellows_core::{AxisExtents, BellowsSpec, PageSetup, PartCount};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::units::{Scale, Units, mm_to_dots};

pub const DEFAULT_RESOLUTION: f64 = 300.0;
const DEFAULT_INNER_MM: f64 = 40.0;
const DEFAULT_OUTER_MM: f64 = 50.0;
const DEFAULT_MAX_LENGTH_MM: f64 = 280.0;

/// Bellows options as written in a YAML or JSON file. Every field is optional.
///
/// Keys follow the short option names (`frontIW`, `backOH`, `maxLength`, ...); the
/// long snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BellowsConfig {
    #[serde(default)]
    pub units: Units,

    #[serde(alias = "resolution", skip_serializing_if = "Option::is_none")]
    pub dpi: Option<f64>,

    #[serde(rename = "pageW", alias = "page_width", skip_serializing_if = "Option::is_none")]
    pub page_width: Option<f64>,
    #[serde(rename = "pageH", alias = "page_height", skip_serializing_if = "Option::is_none")]
    pub page_height: Option<f64>,

    #[serde(rename = "frontIW", alias = "front_inner_width", skip_serializing_if = "Option::is_none")]
    pub front_inner_width: Option<f64>,
    #[serde(rename = "frontOW", alias = "front_outer_width", skip_serializing_if = "Option::is_none")]
    pub front_outer_width: Option<f64>,
    #[serde(rename = "frontIH", alias = "front_inner_height", skip_serializing_if = "Option::is_none")]
    pub front_inner_height: Option<f64>,
    #[serde(rename = "frontOH", alias = "front_outer_height", skip_serializing_if = "Option::is_none")]
    pub front_outer_height: Option<f64>,

    #[serde(rename = "backIW", alias = "back_inner_width", skip_serializing_if = "Option::is_none")]
    pub back_inner_width: Option<f64>,
    #[serde(rename = "backOW", alias = "back_outer_width", skip_serializing_if = "Option::is_none")]
    pub back_outer_width: Option<f64>,
    #[serde(rename = "backIH", alias = "back_inner_height", skip_serializing_if = "Option::is_none")]
    pub back_inner_height: Option<f64>,
    #[serde(rename = "backOH", alias = "back_outer_height", skip_serializing_if = "Option::is_none")]
    pub back_outer_height: Option<f64>,

    #[serde(rename = "maxLength", alias = "max_length", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<u32>,

    #[serde(rename = "key", alias = "legend", skip_serializing_if = "Option::is_none")]
    pub legend: Option<bool>,
}

/// A config with every default filled in, converted to dots.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub spec: BellowsSpec,
    pub page: PageSetup,
}

impl BellowsConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, Error> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "read bellows config");
        Self::from_yaml_str(&raw)
    }

    /// Fill defaults and convert to dots. Geometry is validated later, by the generator.
    pub fn resolve(&self) -> Result<ResolvedConfig, Error> {
        let resolution = self.dpi.unwrap_or(DEFAULT_RESOLUTION);
        let scale = Scale::new(self.units, resolution);
        let inner = mm_to_dots(DEFAULT_INNER_MM, scale.dots_per_mm);
        let outer = mm_to_dots(DEFAULT_OUTER_MM, scale.dots_per_mm);
        let extent = |value: Option<f64>, default: f64| value.map_or(default, |v| scale.extent(v));

        let parts = match self.parts {
            None => PartCount::default(),
            Some(n) => {
                let n = u8::try_from(n)
                    .map_err(|_| bellows_core::ConfigurationError::InvalidPartCount(n))?;
                PartCount::try_from(n)?
            }
        };

        let spec = BellowsSpec {
            resolution,
            max_length: self
                .max_length
                .map_or(DEFAULT_MAX_LENGTH_MM * scale.dots_per_mm, |v| scale.length(v)),
            align: self.align.map_or(0.0, |v| scale.length(v)),
            parts,
            width: AxisExtents {
                front_inner: extent(self.front_inner_width, inner),
                front_outer: extent(self.front_outer_width, outer),
                back_inner: extent(self.back_inner_width, inner),
                back_outer: extent(self.back_outer_width, outer),
            },
            height: AxisExtents {
                front_inner: extent(self.front_inner_height, inner),
                front_outer: extent(self.front_outer_height, outer),
                back_inner: extent(self.back_inner_height, inner),
                back_outer: extent(self.back_outer_height, outer),
            },
        };

        let letter = PageSetup::letter(resolution);
        let page = PageSetup {
            width: self.page_width.unwrap_or(letter.width),
            height: self.page_height.unwrap_or(letter.height),
            legend: self.legend.unwrap_or(true),
        };

        Ok(ResolvedConfig { spec, page })
    }
}
