use std::path::PathBuf;

use bellows_core::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
