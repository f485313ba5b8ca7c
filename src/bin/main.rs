#![no_std]
#![no_main]

use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::{rtc_cntl::Rtc, timer::timg::TimerGroup};
use esp_println::logger::init_logger;
use holfuy_station::{
    config::Config,
    endpoint::{Endpoint, StationUrls},
    error::AppError,
    schedule::{PollCycle, PollSchedule, poll_forever},
    sleep::sleep_until_retry,
};
use log::info;

const SLEEP_ON_ERROR_SECS: u64 = 60 * 5;

esp_bootloader_esp_idf::esp_app_desc!();

/// Announces each due fetch; the HTTP, decode and render stages plug in here.
struct AnnounceCycle<'a> {
    station_name: &'a str,
    cycles: u32,
}

impl PollCycle for AnnounceCycle<'_> {
    async fn run(&mut self, urls: &StationUrls) -> Result<(), AppError> {
        self.cycles = self.cycles.wrapping_add(1);
        for endpoint in Endpoint::ALL {
            info!(
                "[{}] {} reading due for '{}' at {}:{}",
                self.cycles,
                endpoint.name(),
                self.station_name,
                urls.base().host(),
                urls.base().port()
            );
        }
        Ok(())
    }
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    // Initialize logger for esp-println
    init_logger(log::LevelFilter::Info);

    info!("Initialize peripherals");
    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Initialize RTC for deep sleep
    let rtc = Rtc::new(peripherals.LPWR);

    // Initialize and start RTOS timer
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let config = match Config::from_build_env() {
        Ok(config) => config,
        Err(e) => sleep_until_retry(rtc, &AppError::from(e), SLEEP_ON_ERROR_SECS),
    };
    config.log_summary();

    if let Err(e) = config.validate() {
        sleep_until_retry(rtc, &AppError::from(e), SLEEP_ON_ERROR_SECS);
    }

    let urls = match config.urls() {
        Ok(urls) => urls,
        Err(e) => sleep_until_retry(rtc, &e, SLEEP_ON_ERROR_SECS),
    };

    let mut cycle = AnnounceCycle {
        station_name: &config.station.name,
        cycles: 0,
    };
    poll_forever(PollSchedule::new(config.update_interval), &urls, &mut cycle).await
}
