use crate::ephemeris::provider::{EphemerisError, PositionProvider};
use crate::ephemeris::types::{Body, Position};
use crate::time::Instant;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender, TrySendError};
use log::{debug, warn};
use std::thread;
use std::time::Duration;

/// Lookups allowed to wait behind the one in progress.
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

struct Job {
    body: Body,
    instant: Instant,
    reply: Sender<Result<Position, EphemerisError>>,
}

/// Bounds every lookup of an inner provider by a deadline.
///
/// The inner provider runs on a dedicated worker thread. A lookup that does
/// not answer within the deadline, or a worker that has gone away, yields
/// [`EphemerisError::ProviderUnavailable`]. A late answer is discarded.
/// Lookups that find the queue full fail at once the same way, so a hung
/// provider cannot pile up work.
pub struct TimeoutProvider {
    jobs: Sender<Job>,
    timeout: Duration,
    range: (f64, f64),
    name: String,
}

impl TimeoutProvider {
    pub fn new<P: PositionProvider + 'static>(inner: P, timeout: Duration) -> Result<Self, EphemerisError> {
        Self::with_queue_depth(inner, timeout, DEFAULT_QUEUE_DEPTH)
    }

    pub fn with_queue_depth<P: PositionProvider + 'static>(
        inner: P,
        timeout: Duration,
        depth: usize,
    ) -> Result<Self, EphemerisError> {
        let range = inner.supported_range();
        let name = format!("{} (timeout {}ms)", inner.name(), timeout.as_millis());
        let (jobs, job_rx) = bounded::<Job>(depth.max(1));

        thread::Builder::new()
            .name("urania-ephemeris".into())
            .spawn(move || {
                for job in job_rx.iter() {
                    let result = inner.position_at(job.body, job.instant);
                    // the caller may have timed out already
                    let _ = job.reply.send(result);
                }
                debug!("ephemeris worker exiting");
            })
            .map_err(|e| EphemerisError::ProviderUnavailable(format!("cannot spawn ephemeris worker: {e}")))?;

        Ok(Self {
            jobs,
            timeout,
            range,
            name,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PositionProvider for TimeoutProvider {
    fn position_at(&self, body: Body, instant: Instant) -> Result<Position, EphemerisError> {
        let (reply, reply_rx) = bounded(1);
        match self.jobs.try_send(Job { body, instant, reply }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("ephemeris worker busy, rejecting lookup for {body}");
                return Err(EphemerisError::ProviderUnavailable(
                    "ephemeris worker busy, lookup queue full".into(),
                ));
            }
            Err(TrySendError::Disconnected(_)) => {
                return Err(EphemerisError::ProviderUnavailable("ephemeris worker stopped".into()));
            }
        }

        match reply_rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!("position lookup for {body} timed out after {:?}", self.timeout);
                Err(EphemerisError::ProviderUnavailable(format!(
                    "lookup for {body} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
            Err(RecvTimeoutError::Disconnected) => Err(EphemerisError::ProviderUnavailable(
                "ephemeris worker dropped the request".into(),
            )),
        }
    }

    fn supported_range(&self) -> (f64, f64) {
        self.range
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::fixed::FixedPositions;

    #[test]
    fn passes_through_fast_answers() {
        let fixed = FixedPositions::new(Instant::from_jd(2_451_545.0)).with_body(Body::Venus, 42.0, 1.2);
        let provider = TimeoutProvider::new(fixed, Duration::from_secs(5)).unwrap();
        let pos = provider.position_at(Body::Venus, Instant::from_jd(2_451_545.0)).unwrap();
        assert_eq!(pos.lon, 42.0);
    }

    #[test]
    fn slow_provider_becomes_unavailable() {
        let slow = FixedPositions::new(Instant::from_jd(2_451_545.0)).with_delay(Duration::from_millis(500));
        let provider = TimeoutProvider::new(slow, Duration::from_millis(20)).unwrap();
        let err = provider
            .position_at(Body::Sun, Instant::from_jd(2_451_545.0))
            .unwrap_err();
        assert!(matches!(err, EphemerisError::ProviderUnavailable(_)));
    }

    #[test]
    fn hung_provider_fills_the_queue() {
        let at = Instant::from_jd(2_451_545.0);
        let hung = FixedPositions::new(at).with_delay(Duration::from_millis(400));
        let provider = TimeoutProvider::with_queue_depth(hung, Duration::from_millis(20), 1).unwrap();

        // the first lookup occupies the worker and the second waits in the queue
        assert!(provider.position_at(Body::Sun, at).is_err());
        assert!(provider.position_at(Body::Moon, at).is_err());

        let started = std::time::Instant::now();
        let err = provider.position_at(Body::Mars, at).unwrap_err();
        assert!(started.elapsed() < Duration::from_millis(20));
        match err {
            EphemerisError::ProviderUnavailable(reason) => assert!(reason.contains("queue full"), "{reason}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn out_of_range_is_not_masked() {
        let fixed = FixedPositions::new(Instant::from_jd(2_451_545.0)).with_range(2_400_000.0, 2_500_000.0);
        let provider = TimeoutProvider::new(fixed, Duration::from_secs(5)).unwrap();
        let err = provider.position_at(Body::Sun, Instant::from_jd(1.0)).unwrap_err();
        assert!(matches!(err, EphemerisError::OutOfRange { .. }));
    }
}
