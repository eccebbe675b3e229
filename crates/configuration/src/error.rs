use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    /// A setting failed validation. `field` is the dotted config path
    /// (e.g. `kelly.reward_risk_ratio`) so a broken file is easy to fix.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}
