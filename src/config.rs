use embassy_time::Duration;
use heapless::{String, Vec};
use serde::Deserialize;
use serde_json_core as json_core;

use crate::{
    endpoint::{StationUrls, validate_template},
    error::{AppError, ConfigError, ConfigField},
};

// Build-time secrets, empty unless exported when building
macro_rules! env_or_empty {
    ($name:literal) => {
        match option_env!($name) {
            Some(value) => value,
            None => "",
        }
    };
}

// Display constants
pub const DISPLAY_W: u32 = 128;
pub const DISPLAY_H: u32 = 64;

// Inbound JSON payload capacity [bytes]
pub const JSON_BUFFER_SIZE: usize = 12288;

// Wifi constants
pub const WIFI_SSID: &str = env_or_empty!("SSID");
pub const WIFI_PASSWORD: &str = env_or_empty!("PASSWORD");

// Holfuy constants
pub const HOLFUY_URL: &str = "http://api.holfuy.com";
pub const HOLFUY_LIVE: &str = "/live/?s=STATION&pw=API-KEY&m=JSON&avg=0&su=km/h";
pub const HOLFUY_ARCHIVE: &str = "/archive/?s=STATION&pw=API-KEY&m=JSON&avg=0&cnt=60";
pub const STATION_NAME: &str = env_or_empty!("HOLFUY_STATION_NAME");
pub const STATION_ID: &str = env_or_empty!("HOLFUY_STATION_ID");
pub const API_KEY: &str = env_or_empty!("HOLFUY_API_KEY");

// Poll interval [sec]
pub const UPDATE_INTERVAL: u64 = 120;

const _: () = assert!(DISPLAY_W > 0 && DISPLAY_H > 0);
const _: () = assert!(JSON_BUFFER_SIZE > 0);
const _: () = assert!(UPDATE_INTERVAL > 0);

// Field capacities
pub const SSID_LEN: usize = 32;
pub const PASSWORD_LEN: usize = 64;
pub const STATION_NAME_LEN: usize = 32;
pub const STATION_ID_LEN: usize = 16;
pub const API_KEY_LEN: usize = 64;
pub const BASE_URL_LEN: usize = 64;
pub const PATH_LEN: usize = 96;

// Unescape scratch, sized to the largest overridable field
const UNESCAPE_LEN: usize = PASSWORD_LEN;
const _: () = assert!(UNESCAPE_LEN >= API_KEY_LEN && UNESCAPE_LEN >= BASE_URL_LEN);

const REDACTED: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String<SSID_LEN>,
    pub password: String<PASSWORD_LEN>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub base_url: String<BASE_URL_LEN>,
    pub live_path: String<PATH_LEN>,
    pub archive_path: String<PATH_LEN>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub name: String<STATION_NAME_LEN>,
    pub id: String<STATION_ID_LEN>,
    pub api_key: String<API_KEY_LEN>,
}

/// The immutable configuration set, built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub display_width: u32,
    pub display_height: u32,
    pub json_buffer_size: usize,
    pub wifi: WifiCredentials,
    pub service: ServiceEndpoints,
    pub station: Station,
    pub update_interval: Duration,
}

/// Optional runtime replacements for the build-time strings.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ConfigOverrides {
    pub wifi_ssid: Option<String<SSID_LEN>>,
    pub wifi_password: Option<String<PASSWORD_LEN>>,
    pub station_name: Option<String<STATION_NAME_LEN>>,
    pub station_id: Option<String<STATION_ID_LEN>>,
    pub api_key: Option<String<API_KEY_LEN>>,
    pub base_url: Option<String<BASE_URL_LEN>>,
}

impl core::convert::TryFrom<&[u8]> for ConfigOverrides {
    type Error = ConfigError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        // escaped strings are decoded through the scratch buffer; returns (T, consumed)
        let mut unescape = [0u8; UNESCAPE_LEN];
        let (parsed, _consumed) =
            json_core::from_slice_escaped::<ConfigOverrides>(value, &mut unescape).map_err(
                |e| {
                    log::error!("Failed to parse configuration overrides: {:?}", e);
                    ConfigError::MalformedOverrides
                },
            )?;
        Ok(parsed)
    }
}

fn copy_field<const N: usize>(value: &str, field: ConfigField) -> Result<String<N>, ConfigError> {
    String::try_from(value).map_err(|_| ConfigError::ValueTooLong(field))
}

impl Config {
    /// Build the configuration from the compile-time constants.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            WIFI_SSID,
            WIFI_PASSWORD,
            STATION_NAME,
            STATION_ID,
            API_KEY,
        )
    }

    /// Build a configuration with the shipped constants and the given identity strings.
    pub fn from_parts(
        ssid: &str,
        password: &str,
        station_name: &str,
        station_id: &str,
        api_key: &str,
    ) -> Result<Self, ConfigError> {
        validate_template(HOLFUY_LIVE)?;
        validate_template(HOLFUY_ARCHIVE)?;

        Ok(Self {
            display_width: DISPLAY_W,
            display_height: DISPLAY_H,
            json_buffer_size: JSON_BUFFER_SIZE,
            wifi: WifiCredentials {
                ssid: copy_field(ssid, ConfigField::WifiSsid)?,
                password: copy_field(password, ConfigField::WifiPassword)?,
            },
            service: ServiceEndpoints {
                base_url: copy_field(HOLFUY_URL, ConfigField::BaseUrl)?,
                live_path: copy_field(HOLFUY_LIVE, ConfigField::LivePath)?,
                archive_path: copy_field(HOLFUY_ARCHIVE, ConfigField::ArchivePath)?,
            },
            station: Station {
                name: copy_field(station_name, ConfigField::StationName)?,
                id: copy_field(station_id, ConfigField::StationId)?,
                api_key: copy_field(api_key, ConfigField::ApiKey)?,
            },
            update_interval: Duration::from_secs(UPDATE_INTERVAL),
        })
    }

    /// Overlay a JSON overrides document on top of this configuration.
    ///
    /// Only the credential, station and base address strings can be replaced;
    /// display geometry, buffer capacity, templates and the poll interval stay fixed.
    pub fn with_overrides(mut self, json: &[u8]) -> Result<Self, ConfigError> {
        let overrides = ConfigOverrides::try_from(json)?;

        if let Some(ssid) = overrides.wifi_ssid {
            self.wifi.ssid = ssid;
        }
        if let Some(password) = overrides.wifi_password {
            self.wifi.password = password;
        }
        if let Some(name) = overrides.station_name {
            self.station.name = name;
        }
        if let Some(id) = overrides.station_id {
            self.station.id = id;
        }
        if let Some(key) = overrides.api_key {
            self.station.api_key = key;
        }
        if let Some(base_url) = overrides.base_url {
            self.service.base_url = base_url;
        }
        Ok(self)
    }

    /// Every identity member that is still empty.
    pub fn missing_fields(&self) -> Vec<ConfigField, 5> {
        let mut missing = Vec::new();
        let fields = [
            (ConfigField::WifiSsid, self.wifi.ssid.is_empty()),
            (ConfigField::WifiPassword, self.wifi.password.is_empty()),
            (ConfigField::StationName, self.station.name.is_empty()),
            (ConfigField::StationId, self.station.id.is_empty()),
            (ConfigField::ApiKey, self.station.api_key.is_empty()),
        ];
        for (field, empty) in fields {
            if empty {
                // capacity matches the number of candidates
                let _ = missing.push(field);
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// `Ok` when the configuration is usable for network access.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.missing_fields().first() {
            Some(field) => Err(ConfigError::MissingField(*field)),
            None => Ok(()),
        }
    }

    /// Resolve the live and archive request URLs for the configured station.
    pub fn urls(&self) -> Result<StationUrls, AppError> {
        StationUrls::resolve(
            &self.service.base_url,
            &self.service.live_path,
            &self.service.archive_path,
            &self.station.id,
            &self.station.api_key,
        )
    }

    pub fn log_summary(&self) {
        log::info!(
            "Display {}x{}, JSON buffer {} bytes, poll every {} secs",
            self.display_width,
            self.display_height,
            self.json_buffer_size,
            self.update_interval.as_secs()
        );
        log::info!(
            "WiFi SSID: '{}' password: {}",
            self.wifi.ssid,
            redact(&self.wifi.password)
        );
        log::info!(
            "Station '{}' ({}) via {} key: {}",
            self.station.name,
            self.station.id,
            self.service.base_url,
            redact(&self.station.api_key)
        );
        for field in self.missing_fields() {
            log::warn!("Configuration incomplete: {} is not set", field);
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { REDACTED }
}
