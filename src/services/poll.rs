//! Fixed-interval polling bounded by a wall-clock budget.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between fetches.
    pub interval: Duration,
    /// Budget measured from the first fetch.
    pub timeout: Duration,
}

/// Time source for polling loops.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real time, via the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        (**self).sleep(duration)
    }
}

/// How a polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The fetch produced a terminal value.
    Done { value: T, attempts: u32 },
    /// The budget ran out first. Carries the last value seen.
    TimedOut { last: Option<T>, attempts: u32 },
}

/// Call `fetch` until `is_terminal` accepts its value or the budget is spent.
///
/// Each round fetches first, then checks the budget, then sleeps. Fetch errors
/// end the loop immediately.
pub async fn poll_until<C, T, F, Fut, P>(
    clock: &C,
    settings: PollSettings,
    mut fetch: F,
    is_terminal: P,
) -> Result<PollOutcome<T>>
where
    C: Clock,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let started = clock.now();
    let mut attempts = 0u32;

    loop {
        let value = fetch().await?;
        attempts += 1;

        if is_terminal(&value) {
            return Ok(PollOutcome::Done { value, attempts });
        }

        if clock.now().duration_since(started) > settings.timeout {
            return Ok(PollOutcome::TimedOut {
                last: Some(value),
                attempts,
            });
        }

        clock.sleep(settings.interval).await;
    }
}

/// Clock that advances only when slept on, recording every sleep.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct FakeClock {
    start: Instant,
    offset: std::cell::Cell<Duration>,
    pub sleeps: std::cell::RefCell<Vec<Duration>>,
}

#[cfg(test)]
impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: std::cell::Cell::new(Duration::ZERO),
            sleeps: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

#[cfg(test)]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.offset.set(self.offset.get() + duration);
        self.sleeps.borrow_mut().push(duration);
        std::future::ready(())
    }
}
