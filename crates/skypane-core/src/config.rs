use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "SKYPANE_WEATHER_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_WEATHERAPI_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Display preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Geolocation fix
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// WeatherAPI.com access key
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// API root, `current.json` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

fn default_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// Keeps the key out of logs and panic messages.
impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"REDACTED")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl WeatherConfig {
    /// Check if the key is set (not empty, not the placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the query input stays flagged after a failed lookup
    #[serde(default = "default_error_flash_ms")]
    pub error_flash_ms: u64,

    /// IANA zone for the last-updated time; local zone when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

fn default_error_flash_ms() -> u64 {
    500
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_flash_ms: default_error_flash_ms(),
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationConfig {
    /// Both coordinates, if configured
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skypane")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load()?)
    }

    /// Like [`Config::load_validated`] for an explicit path
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load_from(path)?)
    }

    fn validated(config: Self) -> Result<(Self, ValidationResult)> {
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using weather API key from {}", API_KEY_ENV);
            self.weather.api_key = key;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured - set it here or via {}", API_KEY_ENV),
            );
        }

        if self.weather.timeout_seconds == 0 {
            result.add_error("weather.timeout_seconds", "Timeout must be greater than 0");
        } else if self.weather.timeout_seconds > 300 {
            result.add_error("weather.timeout_seconds", "Timeout cannot exceed 300 seconds");
        }

        if self.ui.error_flash_ms == 0 {
            result.add_error("ui.error_flash_ms", "Error flash must be greater than 0");
        } else if self.ui.error_flash_ms > 10_000 {
            result.add_error("ui.error_flash_ms", "Error flash cannot exceed 10000 ms");
        }

        if let Some(tz) = &self.ui.timezone {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                result.add_error("ui.timezone", format!("Unknown time zone: {}", tz));
            }
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (None, None) => {}
            _ => result.add_warning(
                "location",
                "Only one coordinate set - geolocation fix is ignored",
            ),
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.scheme() == "http" {
                    result.add_warning(field_name, "API key will be sent over plain http");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skypane");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.weather.api_key = "0123456789abcdef".to_string();
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert_eq!(config.ui.error_flash_ms, 500);
        assert_eq!(config.weather.base_url, "https://api.weatherapi.com/v1");
    }

    #[test]
    fn test_placeholder_key_is_warning() {
        let result = Config::default().validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));

        let result = configured().validate();
        assert!(!result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = configured();
        config.weather.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = configured();
        config.weather.base_url = "ftp://api.weatherapi.com/v1".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = configured();
        config.weather.timeout_seconds = 0;
        assert!(!config.validate().is_valid());
        config.weather.timeout_seconds = 301;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_zero_error_flash() {
        let mut config = configured();
        config.ui.error_flash_ms = 0;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "ui.error_flash_ms"));
    }

    #[test]
    fn test_timezone_validation() {
        let mut config = configured();
        config.ui.timezone = Some("Europe/Amsterdam".to_string());
        assert!(config.validate().is_valid());
        config.ui.timezone = Some("Mars/Olympus_Mons".to_string());
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_location_validation() {
        let mut config = configured();
        config.location.latitude = Some(95.0);
        config.location.longitude = Some(10.0);
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));

        config.location.latitude = Some(10.0);
        config.location.longitude = None;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "location"));
        assert_eq!(config.location.coordinates(), None);
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_overrides(|name| {
            (name == API_KEY_ENV).then(|| "key-from-env".to_string())
        });
        assert_eq!(config.weather.api_key, "key-from-env");

        config.apply_env_overrides(|_| Some("   ".to_string()));
        assert_eq!(config.weather.api_key, "key-from-env");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", configured());
        assert!(!debug.contains("0123456789abcdef"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.ui.error_flash_ms, 500);
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[weather]\nbase_url = \"http://localhost:8080/v1\"\n\n[location]\nlatitude = 10.0\nlongitude = 10.0\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.base_url, "http://localhost:8080/v1");
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.location.coordinates(), Some((10.0, 10.0)));
    }

    #[test]
    fn test_load_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
