//! Wall-clock bounded retries for "wait until this shows up" logic
//!
//! The deadline is only checked between attempts; a running attempt is never
//! interrupted.

use std::fmt::Display;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Result of a bounded retry loop
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T> {
    /// The operation produced a value
    Ready(T),
    /// The deadline passed without a value
    TimedOut { attempts: u32, elapsed: Duration },
}

impl<T> RetryOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, RetryOutcome::Ready(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            RetryOutcome::Ready(value) => Some(value),
            RetryOutcome::TimedOut { .. } => None,
        }
    }
}

/// Re-run `operation` until it yields `Some`, or until `timeout` has passed
/// since the first attempt.
///
/// Errors are logged and count as a failed attempt. `interval` is slept after
/// every failed attempt.
pub fn retry_with_timeout<T, E, F>(
    timeout: Duration,
    interval: Duration,
    mut operation: F,
) -> RetryOutcome<T>
where
    F: FnMut() -> Result<Option<T>, E>,
    E: Display,
{
    let start = Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout {
        attempts += 1;
        match operation() {
            Ok(Some(value)) => {
                log::debug!("Succeeded on attempt {} after {:?}", attempts, start.elapsed());
                return RetryOutcome::Ready(value);
            }
            Ok(None) => {}
            Err(e) => log::error!("Attempt {} failed: {}", attempts, e),
        }
        sleep(interval);
    }

    let elapsed = start.elapsed();
    log::debug!("Gave up after {} attempts in {:?}", attempts, elapsed);
    RetryOutcome::TimedOut { attempts, elapsed }
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until<F>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    retry_with_timeout(timeout, interval, || {
        Ok::<_, std::convert::Infallible>(condition().then_some(()))
    })
    .is_ready()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_do_not_abort_the_loop() {
        let mut calls = 0;
        let outcome = retry_with_timeout(Duration::from_millis(600), Duration::from_millis(20), || {
            calls += 1;
            if calls < 3 {
                Err(format!("not yet ({calls})"))
            } else {
                Ok(Some("ready"))
            }
        });

        assert_eq!(outcome, RetryOutcome::Ready("ready"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_always_empty_times_out() {
        let mut calls = 0u32;
        let timeout = Duration::from_millis(150);
        let outcome = retry_with_timeout(timeout, Duration::from_millis(40), || {
            calls += 1;
            Ok::<Option<()>, String>(None)
        });

        match outcome {
            RetryOutcome::TimedOut { attempts, elapsed } => {
                assert_eq!(attempts, calls);
                assert!(attempts >= 1);
                assert!(elapsed >= timeout);
            }
            RetryOutcome::Ready(_) => panic!("should have timed out"),
        }
    }

    #[test]
    fn test_no_attempts_after_deadline() {
        let mut first_call: Option<Instant> = None;
        let mut last_call: Option<Instant> = None;
        let timeout = Duration::from_millis(100);

        let outcome = retry_with_timeout(timeout, Duration::from_millis(30), || {
            let now = Instant::now();
            first_call.get_or_insert(now);
            last_call = Some(now);
            Ok::<Option<()>, String>(None)
        });

        assert!(!outcome.is_ready());
        let (first, last) = (first_call.unwrap(), last_call.unwrap());
        assert!(last.duration_since(first) < timeout);
    }

    #[test]
    fn test_zero_timeout_never_calls() {
        let mut calls = 0;
        let outcome = retry_with_timeout(Duration::ZERO, Duration::from_millis(1), || {
            calls += 1;
            Ok::<_, String>(Some(1))
        });
        assert_eq!(outcome.into_option(), None);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_wait_until() {
        let mut polls = 0;
        assert!(wait_until(Duration::from_millis(500), Duration::from_millis(5), || {
            polls += 1;
            polls == 4
        }));
        assert!(!wait_until(Duration::from_millis(30), Duration::from_millis(5), || false));
    }
}
