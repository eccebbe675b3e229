use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Candle series for {0} is not sorted by open time")]
    UnsortedSeries(String),
}
