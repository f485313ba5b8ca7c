use core::fmt::{Display, Formatter};

/// Configuration members that can be empty or overridden at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    WifiSsid,
    WifiPassword,
    StationName,
    StationId,
    ApiKey,
    BaseUrl,
    LivePath,
    ArchivePath,
}

impl ConfigField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::WifiSsid => "wifi_ssid",
            ConfigField::WifiPassword => "wifi_password",
            ConfigField::StationName => "station_name",
            ConfigField::StationId => "station_id",
            ConfigField::ApiKey => "api_key",
            ConfigField::BaseUrl => "base_url",
            ConfigField::LivePath => "live_path",
            ConfigField::ArchivePath => "archive_path",
        }
    }
}

impl Display for ConfigField {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building or checking the configuration set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingField(ConfigField),
    #[error("{0} exceeds its capacity")]
    ValueTooLong(ConfigField),
    #[error("template must contain {token} exactly once, found {found}")]
    InvalidTemplate { token: &'static str, found: usize },
    #[error("invalid base address")]
    InvalidBaseUrl,
    #[error("only plain http:// base addresses are supported")]
    UnsupportedScheme,
    #[error("malformed configuration overrides")]
    MalformedOverrides,
}

/// Unified application error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    // Endpoint / payload errors
    #[error("request URL too long")]
    UrlTooLong,
    #[error("payload exceeds {capacity} byte buffer")]
    PayloadTooLarge { capacity: usize },

    // Display errors
    #[error("display surface is {width}x{height}")]
    DisplayMismatch { width: u32, height: u32 },

    // Poll cycle errors
    #[error("fetch cycle failed")]
    CycleFailed,
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn config_errors_name_the_field() {
        let e = ConfigError::MissingField(ConfigField::StationId);
        assert_eq!(e.to_string(), "station_id is not set");
    }

    #[test]
    fn app_error_wraps_config_error() {
        let e: AppError = ConfigError::UnsupportedScheme.into();
        assert_eq!(
            e.to_string(),
            "configuration error: only plain http:// base addresses are supported"
        );
    }

    #[test]
    fn missing_field_reads_as_retry_reason() {
        let e = AppError::from(ConfigError::MissingField(ConfigField::ApiKey));
        assert_eq!(e.to_string(), "configuration error: api_key is not set");
    }
}
