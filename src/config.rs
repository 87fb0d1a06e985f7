//! One-time configuration loading for a run.
//!
//! The run parameters (profile selection, distance) and the control tick
//! period come from a TOML file read once at startup; nothing is
//! reconfigurable while a run is active.

use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub run: RunSettings,
    pub control: ControlSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    /// Operator-facing profile selection: 1 = constant, 2 = trapezoidal.
    pub profile: u8,
    /// Target travel distance in meters.
    pub distance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ControlSettings {
    /// Control tick period in seconds (nominal 0.01, i.e. 100 Hz).
    pub tick_interval_s: f64,
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .build()
        .and_then(Config::try_deserialize::<Settings>);

    match settings {
        Ok(settings) => {
            validate(&settings)?;
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Reject settings no run could be scheduled against. Distance and profile
/// selection are validated by the profile library before planning.
fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let tick = settings.control.tick_interval_s;
    if !tick.is_finite() || tick <= 0.0 {
        let e = ConfigError::Message(
            "control.tick_interval_s must be positive and finite".to_string(),
        );
        error!("Invalid configuration: {}", e);
        return Err(e);
    }
    Ok(())
}
