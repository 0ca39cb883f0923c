use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};
use trundle_drive::devices::sim::DEFAULT_PWM_FREQUENCY_HZ;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Shortest settling interlock accepted from configuration, in milliseconds.
const MIN_SETTLE_MS: u64 = 250;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: NetworkSettings,
    pub drive: DriveSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub bind_address: String,
    pub port: u16,
    /// Host the control surface should address; the connection's local
    /// address is used when unset.
    pub advertised_host: Option<String>,
    pub max_request_bytes: usize,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        NetworkSettings {
            bind_address: "0.0.0.0".to_string(),
            port: 80,
            advertised_host: None,
            max_request_bytes: 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriveSettings {
    pub pwm_frequency_hz: u32,
    pub settle_ms: u64,
    pub pins: PinMap,
}

impl DriveSettings {
    pub fn settle_time(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for DriveSettings {
    fn default() -> Self {
        DriveSettings {
            pwm_frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
            settle_ms: MIN_SETTLE_MS,
            pins: PinMap::default(),
        }
    }
}

/// GPIO numbers of the drive outputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub left_pwm: u8,
    pub right_pwm: u8,
    pub left_forward: u8,
    pub left_reverse: u8,
    pub right_forward: u8,
    pub right_reverse: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        PinMap {
            left_pwm: 14,
            right_pwm: 15,
            left_forward: 10,
            left_reverse: 11,
            right_forward: 12,
            right_reverse: 13,
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.drive.settle_ms < MIN_SETTLE_MS {
            return Err(ConfigError::Message(format!(
                "drive.settle_ms must be at least {} (got {})",
                MIN_SETTLE_MS, self.drive.settle_ms
            )));
        }
        if self.drive.pwm_frequency_hz == 0 {
            return Err(ConfigError::Message(
                "drive.pwm_frequency_hz must be positive".to_string(),
            ));
        }
        if self.network.max_request_bytes == 0 {
            return Err(ConfigError::Message(
                "network.max_request_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("TRUNDLE")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(parse_settings);

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

fn parse_settings(config: Config) -> Result<Settings, ConfigError> {
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
