use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} concurrency rate must be between 0 and 100 (got {1})")]
    InvalidConcurrencyRate(&'static str, f64),
    #[error("{0} must not be negative (got {1})")]
    NegativeValue(&'static str, f64),
    #[error("{0} must be a finite number")]
    NonFiniteValue(&'static str),
    #[error("unknown component '{0}'")]
    UnknownComponent(String),
    #[error("invalid recommendations: {0}")]
    InvalidRecommendations(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
