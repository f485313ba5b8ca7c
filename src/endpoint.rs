use core::fmt::Write as _;
use heapless::String;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::{AppError, ConfigError};

pub const STATION_TOKEN: &str = "STATION";
pub const API_KEY_TOKEN: &str = "API-KEY";

pub const URL_LEN: usize = 256;
pub const TARGET_LEN: usize = 192;
pub const HOST_LEN: usize = 64;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";
const DEFAULT_PORT: u16 = 80;

// Everything outside the RFC 3986 unreserved set (ALPHA / DIGIT / "-" / "." / "_" / "~")
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    // common separators / punctuation / reserved characters:
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// The two Holfuy operations the device polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Live,
    Archive,
}

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::Live, Endpoint::Archive];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Live => "live",
            Endpoint::Archive => "archive",
        }
    }

    /// The shipped path template for this endpoint.
    pub fn template(&self) -> &'static str {
        match self {
            Endpoint::Live => crate::config::HOLFUY_LIVE,
            Endpoint::Archive => crate::config::HOLFUY_ARCHIVE,
        }
    }
}

pub fn url_encode_component<const N: usize>(component: &str) -> Result<String<N>, AppError> {
    let mut buf = String::new();
    write!(buf, "{}", utf8_percent_encode(component, QUERY_ENCODE_SET))
        .map_err(|_| AppError::UrlTooLong)?;
    Ok(buf)
}

/// Number of non-overlapping occurrences of `token` in `template`.
pub fn count_token(template: &str, token: &str) -> usize {
    template.matches(token).count()
}

/// Check that a path template carries each placeholder exactly once.
pub fn validate_template(template: &str) -> Result<(), ConfigError> {
    for token in [STATION_TOKEN, API_KEY_TOKEN] {
        let found = count_token(template, token);
        if found != 1 {
            return Err(ConfigError::InvalidTemplate { token, found });
        }
    }
    Ok(())
}

/// Substitute the station identifier and access key into a path template.
///
/// Both values are percent-encoded so that characters such as `&` or `=`
/// cannot alter the surrounding query parameters.
pub fn fill_template<const N: usize>(
    template: &str,
    station_id: &str,
    api_key: &str,
) -> Result<String<N>, AppError> {
    validate_template(template)?;

    let station: String<N> = url_encode_component(station_id)?;
    let key: String<N> = url_encode_component(api_key)?;

    let mut out: String<N> = String::new();
    let mut rest = template;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix(STATION_TOKEN) {
            out.push_str(&station).map_err(|_| AppError::UrlTooLong)?;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(API_KEY_TOKEN) {
            out.push_str(&key).map_err(|_| AppError::UrlTooLong)?;
            rest = tail;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c).map_err(|_| AppError::UrlTooLong)?;
            }
            rest = chars.as_str();
        }
    }
    Ok(out)
}

/// A plain-HTTP service base address such as `http://api.holfuy.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: String<HOST_LEN>,
    host: String<HOST_LEN>,
    port: u16,
}

impl BaseUrl {
    pub fn parse(base: &str) -> Result<Self, ConfigError> {
        if base.starts_with(HTTPS_SCHEME) {
            return Err(ConfigError::UnsupportedScheme);
        }
        let authority = base
            .strip_prefix(HTTP_SCHEME)
            .ok_or(ConfigError::InvalidBaseUrl)?;
        let authority = authority.strip_suffix('/').unwrap_or(authority);

        if authority.is_empty() || authority.contains(['/', '?', '#', '@']) {
            return Err(ConfigError::InvalidBaseUrl);
        }

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>()
                    .map_err(|_| ConfigError::InvalidBaseUrl)?,
            ),
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() || port == 0 {
            return Err(ConfigError::InvalidBaseUrl);
        }

        let mut url = String::new();
        write!(url, "{}{}", HTTP_SCHEME, authority).map_err(|_| ConfigError::InvalidBaseUrl)?;
        let host = String::try_from(host).map_err(|_| ConfigError::InvalidBaseUrl)?;

        Ok(Self { url, host, port })
    }

    /// The address without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Build a full request URL from a base address and a path template.
pub fn build_url<const N: usize>(
    base: &BaseUrl,
    template: &str,
    station_id: &str,
    api_key: &str,
) -> Result<String<N>, AppError> {
    let target: String<TARGET_LEN> = fill_template(template, station_id, api_key)?;
    let mut url: String<N> = String::new();
    write!(url, "{}{}", base.as_str(), target).map_err(|_| AppError::UrlTooLong)?;
    Ok(url)
}

/// Both request URLs of a station, resolved once at startup.
#[derive(Debug, Clone)]
pub struct StationUrls {
    base: BaseUrl,
    live: String<URL_LEN>,
    archive: String<URL_LEN>,
}

impl StationUrls {
    pub fn resolve(
        base: &str,
        live_template: &str,
        archive_template: &str,
        station_id: &str,
        api_key: &str,
    ) -> Result<Self, AppError> {
        let base = BaseUrl::parse(base)?;
        let live = build_url(&base, live_template, station_id, api_key)?;
        let archive = build_url(&base, archive_template, station_id, api_key)?;
        Ok(Self {
            base,
            live,
            archive,
        })
    }

    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Live => &self.live,
            Endpoint::Archive => &self.archive,
        }
    }

    /// Path and query only, as used on an HTTP request line.
    pub fn target(&self, endpoint: Endpoint) -> &str {
        let url = self.url(endpoint);
        url.get(self.base.as_str().len()..).unwrap_or(url)
    }
}
