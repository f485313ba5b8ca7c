use embassy_time::{Duration, Instant, Timer};

use crate::{config::UPDATE_INTERVAL, endpoint::StationUrls, error::AppError};

/// Fetch cycles are never started more often than this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(UPDATE_INTERVAL);

/// Tracks when the last fetch cycle started and when the next one may begin.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    last_fetch: Option<Instant>,
}

impl PollSchedule {
    /// Intervals shorter than [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            log::warn!(
                "Poll interval {} secs below minimum, using {} secs",
                interval.as_secs(),
                MIN_POLL_INTERVAL.as_secs()
            );
        }
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            last_fetch: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_fetch(&self) -> Option<Instant> {
        self.last_fetch
    }

    /// `None` until the first fetch, which is due immediately.
    pub fn next_due(&self) -> Option<Instant> {
        self.last_fetch.map(|last| last + self.interval)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.next_due() {
            Some(due) => now >= due,
            None => true,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.next_due() {
            Some(due) => due.saturating_duration_since(now),
            None => Duration::from_ticks(0),
        }
    }

    /// Record the start of a fetch cycle. Times earlier than the last fetch are ignored.
    pub fn mark_fetched(&mut self, now: Instant) {
        match self.last_fetch {
            Some(last) if now < last => {
                log::warn!("Ignoring fetch time earlier than the previous one");
            }
            _ => self.last_fetch = Some(now),
        }
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(MIN_POLL_INTERVAL)
    }
}

/// One fetch cycle against the station endpoints, supplied by the caller.
#[allow(async_fn_in_trait)]
pub trait PollCycle {
    async fn run(&mut self, urls: &StationUrls) -> Result<(), AppError>;
}

/// Wait until the schedule is due, then run a single cycle.
///
/// The start time is recorded before the cycle runs, so a failed cycle still
/// holds off the next one for a full interval.
pub async fn poll_once<C: PollCycle>(
    schedule: &mut PollSchedule,
    urls: &StationUrls,
    cycle: &mut C,
) -> Result<(), AppError> {
    let wait = schedule.time_until_due(Instant::now());
    if wait > Duration::from_ticks(0) {
        log::debug!("Next fetch cycle in {} secs", wait.as_secs());
        Timer::after(wait).await;
    }

    schedule.mark_fetched(Instant::now());
    log::info!("Starting fetch cycle for {}", urls.base().host());

    match cycle.run(urls).await {
        Ok(()) => {
            log::info!("Fetch cycle complete");
            Ok(())
        }
        Err(e) => {
            log::error!("Fetch cycle failed: {}", e);
            Err(e)
        }
    }
}

pub async fn poll_forever<C: PollCycle>(
    mut schedule: PollSchedule,
    urls: &StationUrls,
    cycle: &mut C,
) -> ! {
    loop {
        // failures are logged by poll_once and retried on the next interval
        let _ = poll_once(&mut schedule, urls, cycle).await;
    }
}
