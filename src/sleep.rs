use esp_hal::rtc_cntl::Rtc;
use esp_hal::rtc_cntl::sleep::TimerWakeupSource;

use crate::error::AppError;

/// Park the device until the next boot because the station cannot be polled.
///
/// The reason is logged before sleeping; after `retry_secs` the device resets
/// and rebuilds its configuration from scratch. Never returns.
pub fn sleep_until_retry(mut rtc: Rtc, reason: &AppError, retry_secs: u64) -> ! {
    log::error!("Station unusable ({}), retrying in {} secs", reason, retry_secs);

    let wakeup = TimerWakeupSource::new(core::time::Duration::from_secs(retry_secs));
    rtc.sleep_deep(&[&wakeup]);
}
