use crate::metrics::{compute_live, LiveMetrics};
use crate::sampler::WpmSample;
use crate::store::SessionRecord;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for one practice attempt. Sampler ticks are
/// keyed to it so a cancelled session's ticks can never touch a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Invoked once per accepted input character; the seam for key-feedback
/// collaborators (sound, haptics) outside the core.
pub type KeystrokeHook = Box<dyn FnMut(char) + Send>;

/// One practice attempt: the target text, the input typed so far, the
/// timer, and the per-second wpm series.
///
/// The input is replaced wholesale through [`Session::set_input`]; the
/// timer arms exactly once, on the first non-empty input. All time-aware
/// operations take an explicit `now_ms` so callers (and tests) own the
/// clock.
pub struct Session {
    id: SessionId,
    target: String,
    input: String,
    started_at_ms: Option<i64>,
    pub samples: Vec<WpmSample>,
    keystroke_hook: Option<KeystrokeHook>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("input", &self.input)
            .field("started_at_ms", &self.started_at_ms)
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(target: String) -> Self {
        Self {
            id: SessionId::next(),
            target,
            input: String::new(),
            started_at_ms: None,
            samples: Vec::new(),
            keystroke_hook: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_keystroke_hook(&mut self, hook: KeystrokeHook) {
        self.keystroke_hook = Some(hook);
    }

    /// Replace the input with the full current value.
    ///
    /// Arms the timer on the first non-empty input and fires the keystroke
    /// hook once for every character appended beyond the previous value.
    pub fn set_input(&mut self, value: &str, now_ms: i64) {
        if self.started_at_ms.is_none() && !value.is_empty() {
            self.started_at_ms = Some(now_ms);
        }

        let previous_len = self.input.chars().count();
        if let Some(hook) = self.keystroke_hook.as_mut() {
            for c in value.chars().skip(previous_len) {
                hook(c);
            }
        }

        self.input = value.to_string();
    }

    pub fn has_started(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Whole seconds since the timer armed; 0 before that. Saturates at
    /// zero if the caller's clock stepped backwards.
    pub fn elapsed_seconds(&self, now_ms: i64) -> u64 {
        match self.started_at_ms {
            Some(started) => ((now_ms - started).max(0) / 1000) as u64,
            None => 0,
        }
    }

    pub fn live_metrics(&self, now_ms: i64) -> LiveMetrics {
        compute_live(&self.input, &self.target, self.elapsed_seconds(now_ms))
    }

    /// The input has reached the target length. Wrong trailing characters
    /// still complete the session; accuracy carries the penalty.
    pub fn is_complete(&self) -> bool {
        self.input.chars().count() >= self.target.chars().count()
    }

    /// Freeze the attempt into a record for the session log.
    pub fn finalize(&self, now_ms: i64) -> SessionRecord {
        let metrics = self.live_metrics(now_ms);
        SessionRecord {
            timestamp: now_ms,
            wpm: metrics.raw_wpm,
            accuracy: metrics.accuracy,
        }
    }

    /// Discard the attempt and start over with a new target.
    ///
    /// Gets a fresh id, so sampler handles issued for the old attempt go
    /// stale. The keystroke hook survives the reset.
    pub fn reset(&mut self, new_target: String) {
        self.id = SessionId::next();
        self.target = new_target;
        self.input.clear();
        self.started_at_ms = None;
        self.samples.clear();
    }
}
