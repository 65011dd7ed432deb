use crate::session::{Session, SessionId};

/// One point of the live wpm time series, taken at a whole elapsed second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WpmSample {
    pub at_second: u64,
    pub wpm: f64,
}

/// Proof that sampling was started for a particular session. Ticks carry
/// the handle back; a handle from a cancelled or replaced session is inert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerHandle {
    session: SessionId,
}

/// Periodic (1 Hz, driven by the caller's tick loop) recorder of raw wpm
/// snapshots into the active session's series.
#[derive(Debug, Default)]
pub struct Sampler {
    active: Option<SessionId>,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin sampling `session`. Any previously active session is dropped.
    pub fn start(&mut self, session: &Session) -> SamplerHandle {
        self.active = Some(session.id());
        SamplerHandle {
            session: session.id(),
        }
    }

    /// Stop sampling for the handle's session. A handle for some other
    /// session (already replaced) is a no-op.
    pub fn cancel(&mut self, handle: SamplerHandle) {
        if self.active == Some(handle.session) {
            self.active = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Record one sample if the tick is current.
    ///
    /// A tick is ignored when the handle no longer matches the sampler's
    /// active session, when it does not match the session it is applied
    /// to, or before the session's timer has armed. Missed ticks simply
    /// leave gaps in the series.
    pub fn tick(
        &mut self,
        handle: SamplerHandle,
        session: &mut Session,
        now_ms: i64,
    ) -> Option<WpmSample> {
        if self.active != Some(handle.session) || session.id() != handle.session {
            return None;
        }
        if !session.has_started() {
            return None;
        }

        let sample = WpmSample {
            at_second: session.elapsed_seconds(now_ms),
            wpm: session.live_metrics(now_ms).raw_wpm,
        };
        session.samples.push(sample);
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_session(target: &str, input: &str, at_ms: i64) -> Session {
        let mut session = Session::new(target.to_string());
        session.set_input(input, at_ms);
        session
    }

    #[test]
    fn test_tick_before_start_records_nothing() {
        let mut session = Session::new("hello".to_string());
        let mut sampler = Sampler::new();
        let handle = sampler.start(&session);

        assert_eq!(sampler.tick(handle, &mut session, 5_000), None);
        assert!(session.samples.is_empty());
    }

    #[test]
    fn test_five_seconds_of_ticks_give_five_samples() {
        let mut session = started_session("hello world hello", "hello", 0);
        let mut sampler = Sampler::new();
        let handle = sampler.start(&session);

        for sec in 1..=5 {
            sampler.tick(handle, &mut session, sec * 1_000);
        }

        assert_eq!(session.samples.len(), 5);
        let seconds: Vec<u64> = session.samples.iter().map(|s| s.at_second).collect();
        assert_eq!(seconds, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_at_second_is_non_decreasing() {
        let mut session = started_session("hello world", "hel", 0);
        let mut sampler = Sampler::new();
        let handle = sampler.start(&session);

        // Irregular tick arrival, including two in the same second.
        for now in [900, 1_100, 1_900, 3_500, 7_200] {
            sampler.tick(handle, &mut session, now);
        }

        let seconds: Vec<u64> = session.samples.iter().map(|s| s.at_second).collect();
        assert!(seconds.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sample_wpm_matches_live_raw_wpm() {
        let mut session = started_session("hello", "hello", 0);
        let mut sampler = Sampler::new();
        let handle = sampler.start(&session);

        let sample = sampler.tick(handle, &mut session, 60_000).unwrap();
        assert!((sample.wpm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_stops_sampling() {
        let mut session = started_session("hello", "h", 0);
        let mut sampler = Sampler::new();
        let handle = sampler.start(&session);

        sampler.cancel(handle);

        assert!(!sampler.is_active());
        assert_eq!(sampler.tick(handle, &mut session, 2_000), None);
        assert!(session.samples.is_empty());
    }

    #[test]
    fn test_stale_handle_cannot_touch_new_session() {
        let mut session = started_session("hello", "h", 0);
        let mut sampler = Sampler::new();
        let stale = sampler.start(&session);

        session.reset("world".to_string());
        session.set_input("w", 0);
        let fresh = sampler.start(&session);

        // A tick left over from before the reset must be ignored.
        assert_eq!(sampler.tick(stale, &mut session, 3_000), None);
        assert!(session.samples.is_empty());

        assert!(sampler.tick(fresh, &mut session, 3_000).is_some());
        assert_eq!(session.samples.len(), 1);
    }

    #[test]
    fn test_cancel_of_stale_handle_keeps_current_session_active() {
        let mut session = started_session("hello", "h", 0);
        let mut sampler = Sampler::new();
        let stale = sampler.start(&session);

        session.reset("world".to_string());
        let fresh = sampler.start(&session);

        sampler.cancel(stale);
        assert!(sampler.is_active());

        session.set_input("w", 0);
        assert!(sampler.tick(fresh, &mut session, 1_000).is_some());
    }

    #[test]
    fn test_fresh_series_starts_at_baseline_after_reset() {
        let mut session = started_session("hello", "h", 0);
        let mut sampler = Sampler::new();
        let handle = sampler.start(&session);
        for sec in 1..=3 {
            sampler.tick(handle, &mut session, sec * 1_000);
        }
        assert_eq!(session.samples.len(), 3);

        sampler.cancel(handle);
        session.reset("world".to_string());
        let handle = sampler.start(&session);

        // New session's clock starts over.
        session.set_input("w", 100_000);
        let sample = sampler.tick(handle, &mut session, 100_500).unwrap();
        assert_eq!(sample.at_second, 0);
        assert_eq!(session.samples.len(), 1);
    }
}
