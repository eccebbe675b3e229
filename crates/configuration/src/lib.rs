// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    BacktestSettings, Config, EntrySettings, IndicatorSettings, KellySettings, RegimeSettings,
    ScannerSettings, StopLossSettings, TrailingStopSettings,
};

/// Loads the engine configuration from the `config.toml` file.
///
/// Every numeric threshold and switch used by the components lives in this
/// file; missing sections fall back to the documented defaults. The loaded
/// tree is validated before it is returned, so an invalid configuration
/// fails here rather than mid-evaluation.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
