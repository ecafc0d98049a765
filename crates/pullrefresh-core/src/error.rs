use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid pull threshold: {0} (must be a finite value greater than 0)")]
    InvalidThreshold(f64),

    #[error("Invalid max pull distance: {max} (must be finite and at least the pull threshold {threshold})")]
    InvalidMaxPull { max: f64, threshold: f64 },

    #[error("Invalid animation duration: {0}")]
    InvalidDuration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
