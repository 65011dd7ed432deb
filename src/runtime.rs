use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// What the trainer loop reacts to: a keystroke, or a sampling tick when
/// no key arrived within the sampling interval.
#[derive(Clone, Debug)]
pub enum TrainerEvent {
    Key(KeyEvent),
    Tick,
}

/// Where keystrokes come from. Production reads the terminal; tests feed
/// a channel.
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for the next keystroke.
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError>;
}

/// Terminal keystrokes, pumped from a reader thread into a channel so the
/// trainer loop can wait on them with a timeout.
pub struct KeyboardSource {
    rx: Receiver<TrainerEvent>,
}

impl KeyboardSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(TrainerEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for KeyboardSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for KeyboardSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-backed source for driving the loop without a terminal.
pub struct ChannelSource {
    rx: Receiver<TrainerEvent>,
}

impl ChannelSource {
    pub fn pair() -> (Sender<TrainerEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl EventSource for ChannelSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrainerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the trainer one event at a time: the next keystroke if one
/// arrives within `sample_every`, otherwise a `Tick` for the sampler.
/// Keystrokes and ticks interleave on the caller's thread, so session
/// state never needs locking.
pub struct Runner<E: EventSource> {
    source: E,
    sample_every: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, sample_every: Duration) -> Self {
        Self {
            source,
            sample_every,
        }
    }

    pub fn step(&self) -> TrainerEvent {
        match self.source.recv_timeout(self.sample_every) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                TrainerEvent::Tick
            }
        }
    }
}
