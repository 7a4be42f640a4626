use std::path::PathBuf;
use thiserror::Error;

/// Setup failures. All of them are raised before the rotator starts;
/// once running, rotation has no error path.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no slides to rotate")]
    NoSlides,

    #[error("a rotating set needs at least 3 slides after duplication, got {count}")]
    TooFewSlides { count: usize },

    #[error("options.interval must be greater than zero (got {0})")]
    NonPositiveInterval(i64),

    #[error("transition.time must not be negative (got {0})")]
    NegativeTransition(i64),

    #[error("effects.direction must be one of left, right, top, bottom or none (got '{0}')")]
    UnknownAxis(String),

    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}
