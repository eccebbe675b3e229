use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Invalid blacklist pattern `{pattern}`: {source}")]
    InvalidBlacklistPattern {
        pattern: String,
        source: regex::Error,
    },
}
