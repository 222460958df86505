use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum VizEvent {
    Key(KeyEvent),
    Resize,
    /// Terminal focus gained (`true`) or lost (`false`).
    Focus(bool),
    /// A scheduled wakeup with no input attached.
    Tick,
}

/// Source of terminal events (keyboard, resize, focus)
pub trait VizEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<VizEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<VizEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => VizEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => VizEvent::Resize,
                Ok(CtEvent::FocusGained) => VizEvent::Focus(true),
                Ok(CtEvent::FocusLost) => VizEvent::Focus(false),
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VizEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<VizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Upper bound on how long the runner sleeps with nothing scheduled
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<VizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<VizEvent>) -> Self {
        Self { rx }
    }
}

impl VizEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<VizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Monotonic time since the runner started.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

/// Runner that waits for the next input or scheduled wakeup
pub struct Runner<E: VizEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: VizEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks until an event arrives, `wakeup` passes, or the ticker
    /// interval elapses; returns Tick in the latter two cases
    pub fn step(&self, now: Duration, wakeup: Option<Duration>) -> VizEvent {
        let idle = self.ticker.interval();
        let timeout = match wakeup {
            Some(at) => at.saturating_sub(now).min(idle),
            None => idle,
        };
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => VizEvent::Tick,
        }
    }
}
