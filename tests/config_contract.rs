use embassy_time::{Duration, Instant};
use holfuy_station::{
    config::{
        API_KEY, Config, DISPLAY_H, DISPLAY_W, HOLFUY_ARCHIVE, HOLFUY_LIVE, HOLFUY_URL,
        JSON_BUFFER_SIZE, STATION_ID, STATION_NAME, UPDATE_INTERVAL, WIFI_PASSWORD, WIFI_SSID,
    },
    display::{DISPLAY_SIZE, canvas},
    endpoint::{API_KEY_TOKEN, Endpoint, STATION_TOKEN, StationUrls, count_token},
    error::ConfigError,
    payload::PayloadBuffer,
    schedule::PollSchedule,
};

#[test]
fn numeric_constants_are_fixed() {
    assert_eq!(JSON_BUFFER_SIZE, 12288);
    assert_eq!((DISPLAY_W, DISPLAY_H), (128, 64));
    assert_eq!(UPDATE_INTERVAL, 120);
    assert_eq!(PayloadBuffer::new().capacity(), JSON_BUFFER_SIZE);
    assert_eq!(canvas().size, DISPLAY_SIZE);
}

#[test]
fn templates_hold_each_placeholder_once() {
    for template in [HOLFUY_LIVE, HOLFUY_ARCHIVE] {
        assert_eq!(count_token(template, STATION_TOKEN), 1);
        assert_eq!(count_token(template, API_KEY_TOKEN), 1);
    }
}

#[test]
fn live_url_scenario() {
    let urls = StationUrls::resolve(HOLFUY_URL, HOLFUY_LIVE, HOLFUY_ARCHIVE, "42", "xyz").unwrap();
    assert_eq!(
        urls.url(Endpoint::Live),
        "http://api.holfuy.com/live/?s=42&pw=xyz&m=JSON&avg=0&su=km/h"
    );
}

#[test]
fn build_config_never_panics() {
    let cfg = Config::from_build_env().unwrap();
    let shipped_empty = [WIFI_SSID, WIFI_PASSWORD, STATION_NAME, STATION_ID, API_KEY]
        .iter()
        .filter(|value| value.is_empty())
        .count();
    assert_eq!(cfg.missing_fields().len(), shipped_empty);
    assert_eq!(cfg.is_complete(), shipped_empty == 0);
    if !cfg.is_complete() {
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingField(_))));
    }
}

#[test]
fn schedule_follows_configured_interval() {
    let cfg = Config::from_parts("home", "pw", "Lake", "42", "xyz").unwrap();
    let mut schedule = PollSchedule::new(cfg.update_interval);
    schedule.mark_fetched(Instant::from_secs(10));
    assert!(!schedule.is_due(Instant::from_secs(129)));
    assert!(schedule.is_due(Instant::from_secs(130)));
    assert_eq!(schedule.interval(), Duration::from_secs(UPDATE_INTERVAL));
}
