use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};

use crate::{engine::Session, environment::Environment};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_DONE_PAUSE: Duration = Duration::from_millis(1800);
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayConfig {
    /// Time between automatic forward steps.
    pub interval: Duration,
    /// Dwell on the last snapshot before starting over.
    pub done_pause: Duration,
}

impl AutoplayConfig {
    pub fn new(interval: Duration, done_pause: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            done_pause: done_pause.max(MIN_INTERVAL),
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_DONE_PAUSE)
    }
}

/// Caller-supplied "something else is animating" check.
pub type BusyPredicate = Box<dyn Fn() -> bool>;

/// Cancels an autoplay task. Stopping is final.
#[derive(Debug, Clone, Default)]
pub struct AutoplayHandle {
    stopped: Rc<Cell<bool>>,
}

impl AutoplayHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayPhase {
    Stepping,
    /// Parked on the last snapshot; the next fire resets.
    Dwelling,
}

/// Repeating task that steps a session forward on a wall-clock cadence.
pub struct Autoplay {
    config: AutoplayConfig,
    env: Box<dyn Environment>,
    busy: Option<BusyPredicate>,
    handle: AutoplayHandle,
    enabled: bool,
    phase: AutoplayPhase,
    next_due: Duration,
}

impl Autoplay {
    /// Schedule the first fire one interval after `now`. Returns `None`
    /// when reduced motion is preferred: stepping is then manual only.
    pub fn new(config: AutoplayConfig, env: Box<dyn Environment>, now: Duration) -> Option<Self> {
        if env.prefers_reduced_motion() {
            debug!("reduced motion preferred, autoplay not started");
            return None;
        }
        Some(Self {
            config,
            env,
            busy: None,
            handle: AutoplayHandle::default(),
            enabled: true,
            phase: AutoplayPhase::Stepping,
            next_due: now + config.interval,
        })
    }

    pub fn with_busy(mut self, busy: BusyPredicate) -> Self {
        self.busy = Some(busy);
        self
    }

    pub fn handle(&self) -> AutoplayHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> AutoplayConfig {
        self.config
    }

    pub fn phase(&self) -> AutoplayPhase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.is_stopped()
    }

    /// Pause or resume. Resuming restarts the cadence from `now`.
    pub fn set_enabled(&mut self, enabled: bool, now: Duration) {
        if self.is_stopped() || self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.next_due = now + self.config.interval;
        }
        debug!(enabled, "autoplay toggled");
    }

    /// When the task next wants to run; `None` once stopped.
    pub fn next_due(&self) -> Option<Duration> {
        (!self.is_stopped()).then_some(self.next_due)
    }

    /// Run the task if it is due. Returns whether it fired.
    pub fn poll(&mut self, now: Duration, session: &mut dyn Session) -> bool {
        match self.next_due() {
            Some(due) if now >= due => {
                self.fire(now, session);
                true
            }
            _ => false,
        }
    }

    fn suspended(&self, session: &dyn Session) -> bool {
        !self.enabled
            || !session.is_ready()
            || !self.env.is_page_visible()
            || !session.is_active()
            || session.is_animating()
            || self.busy.as_ref().is_some_and(|busy| busy())
    }

    fn fire(&mut self, now: Duration, session: &mut dyn Session) {
        if self.suspended(session) {
            self.next_due = now + self.config.interval;
            return;
        }

        if self.phase == AutoplayPhase::Dwelling {
            if session.is_at_end() {
                info!(engine = session.name(), "autoplay restarting");
                session.reset();
                self.phase = AutoplayPhase::Stepping;
                self.next_due = now + self.config.interval;
                return;
            }
            // stepped back by hand during the dwell
            debug!(engine = session.name(), "left the last snapshot, stepping on");
            self.phase = AutoplayPhase::Stepping;
        }

        if !session.is_at_end() {
            session.step_forward(now);
        }
        if session.destination() + 1 >= session.len() {
            self.phase = AutoplayPhase::Dwelling;
            self.next_due = now + self.config.done_pause;
        } else {
            self.next_due = now + self.config.interval;
        }
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        if !self.is_stopped() {
            self.handle.stop();
            info!("autoplay stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineOptions, TransitionMode};
    use crate::environment::SharedEnvironment;
    use crate::render::DrawState;
    use crate::snapshot::TextSnapshot;
    use assert_matches::assert_matches;
    use ratatui::{buffer::Buffer, layout::Rect};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn instant_engine(env: &SharedEnvironment, len: usize) -> Box<dyn Session> {
        Box::new(Engine::new(
            "seq",
            Box::new(move || (0..len).map(|i| TextSnapshot(format!("s{i}"))).collect()),
            |_: &DrawState<'_, TextSnapshot>, _: &mut Buffer| {},
            EngineOptions {
                transition: TransitionMode::Instant,
                ..EngineOptions::default()
            },
            Box::new(env.clone()),
            Rect::new(0, 0, 8, 2),
        ))
    }

    fn autoplay(env: &SharedEnvironment) -> Autoplay {
        Autoplay::new(AutoplayConfig::default(), Box::new(env.clone()), ms(0))
            .expect("motion allowed")
    }

    #[test]
    fn reduced_motion_never_starts() {
        let env = SharedEnvironment::new(true);
        assert!(Autoplay::new(AutoplayConfig::default(), Box::new(env), ms(0)).is_none());
    }

    #[test]
    fn not_due_does_not_fire() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let mut ap = autoplay(&env);

        assert!(!ap.poll(ms(999), session.as_mut()));
        assert_eq!(session.step_index(), 0);
        assert!(ap.poll(ms(1000), session.as_mut()));
        assert_eq!(session.step_index(), 1);
        assert_eq!(ap.next_due(), Some(ms(2000)));
    }

    #[test]
    fn dwell_then_reset() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let mut ap = autoplay(&env);

        ap.poll(ms(1000), session.as_mut());
        ap.poll(ms(2000), session.as_mut());
        assert_eq!(session.step_index(), 2);
        assert_matches!(ap.phase(), AutoplayPhase::Dwelling);
        assert_eq!(ap.next_due(), Some(ms(3800)));

        assert!(!ap.poll(ms(3799), session.as_mut()));
        assert_eq!(session.step_index(), 2);

        ap.poll(ms(3800), session.as_mut());
        assert_eq!(session.step_index(), 0);
        assert_matches!(ap.phase(), AutoplayPhase::Stepping);
        assert_eq!(ap.next_due(), Some(ms(4800)));
    }

    #[test]
    fn manual_arrival_at_end_starts_dwell() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let mut ap = autoplay(&env);

        session.step_forward(ms(10));
        session.step_forward(ms(20));
        ap.poll(ms(1000), session.as_mut());
        assert_eq!(session.step_index(), 2);
        assert_matches!(ap.phase(), AutoplayPhase::Dwelling);
        assert_eq!(ap.next_due(), Some(ms(2800)));
    }

    #[test]
    fn dwell_without_the_last_snapshot_keeps_stepping() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let mut ap = autoplay(&env);

        ap.poll(ms(1000), session.as_mut());
        ap.poll(ms(2000), session.as_mut());
        assert_matches!(ap.phase(), AutoplayPhase::Dwelling);

        session.step_backward();
        ap.poll(ms(3800), session.as_mut());
        assert_eq!(session.step_index(), 2);
        assert_matches!(ap.phase(), AutoplayPhase::Dwelling);
        assert_eq!(ap.next_due(), Some(ms(5600)));
    }

    #[test]
    fn hidden_page_suspends() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let mut ap = autoplay(&env);

        env.set_visible(false);
        assert!(ap.poll(ms(1000), session.as_mut()));
        assert_eq!(session.step_index(), 0);
        assert_eq!(ap.next_due(), Some(ms(2000)));
    }

    #[test]
    fn inactive_panel_and_busy_suspend() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let busy = Rc::new(Cell::new(false));
        let flag = busy.clone();
        let mut ap = autoplay(&env).with_busy(Box::new(move || flag.get()));

        session.set_active(false);
        ap.poll(ms(1000), session.as_mut());
        assert_eq!(session.step_index(), 0);

        session.set_active(true);
        busy.set(true);
        ap.poll(ms(2000), session.as_mut());
        assert_eq!(session.step_index(), 0);

        busy.set(false);
        ap.poll(ms(3000), session.as_mut());
        assert_eq!(session.step_index(), 1);
    }

    #[test]
    fn pause_and_resume() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 4);
        let mut ap = autoplay(&env);

        ap.set_enabled(false, ms(500));
        assert!(!ap.is_enabled());
        ap.poll(ms(1000), session.as_mut());
        ap.poll(ms(2000), session.as_mut());
        assert_eq!(session.step_index(), 0);

        ap.set_enabled(true, ms(2500));
        assert_eq!(ap.next_due(), Some(ms(3500)));
        ap.poll(ms(3500), session.as_mut());
        assert_eq!(session.step_index(), 1);
    }

    #[test]
    fn stop_is_final() {
        let env = SharedEnvironment::default();
        let mut session = instant_engine(&env, 3);
        let mut ap = autoplay(&env);
        let handle = ap.handle();

        handle.stop();
        assert!(ap.is_stopped());
        assert_eq!(ap.next_due(), None);
        assert!(!ap.poll(ms(5000), session.as_mut()));

        ap.set_enabled(true, ms(6000));
        assert!(!ap.is_enabled());
        assert_eq!(session.step_index(), 0);
    }

    #[test]
    fn dropping_the_task_stops_the_handle() {
        let env = SharedEnvironment::default();
        let handle = autoplay(&env).handle();
        assert!(handle.is_stopped());
    }
}
