use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Indicator period `{0}` must be greater than 0")]
    InvalidPeriod(String),

    #[error("Series length mismatch: {0}")]
    LengthMismatch(String),
}
