use bellows_core::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError<E>
where
    E: std::error::Error + 'static,
{
    #[error("invalid bellows configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("drawing surface failed: {0}")]
    Surface(#[source] E),
}
