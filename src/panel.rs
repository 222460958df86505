use std::time::Duration;

use ratatui::layout::Rect;

use crate::{
    autoplay::{Autoplay, AutoplayHandle},
    engine::Session,
    environment::Environment,
};

/// Display refresh cadence for transition frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// One hosted visualization: its engine, its autoplay task, and the two
/// timer sources that drive them on a single thread.
pub struct Panel {
    title: String,
    session: Box<dyn Session>,
    autoplay: Option<Autoplay>,
    env: Box<dyn Environment>,
    last_tick: Duration,
}

impl Panel {
    pub fn new(
        title: impl Into<String>,
        session: Box<dyn Session>,
        autoplay: Option<Autoplay>,
        env: Box<dyn Environment>,
    ) -> Self {
        Self {
            title: title.into(),
            session,
            autoplay,
            env,
            last_tick: Duration::ZERO,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }

    pub fn autoplay(&self) -> Option<&Autoplay> {
        self.autoplay.as_ref()
    }

    pub fn autoplay_handle(&self) -> Option<AutoplayHandle> {
        self.autoplay.as_ref().map(Autoplay::handle)
    }

    pub fn set_active(&mut self, active: bool) {
        self.session.set_active(active);
    }

    pub fn resize(&mut self, area: Rect) {
        self.session.resize(area);
    }

    pub fn step_forward(&mut self, now: Duration) {
        self.sync_frame_clock(now);
        self.session.step_forward(now);
    }

    pub fn step_backward(&mut self) {
        self.session.step_backward();
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Pause or resume autoplay. Ignored when there is none.
    pub fn toggle_autoplay(&mut self, now: Duration) {
        if let Some(autoplay) = self.autoplay.as_mut() {
            let enabled = autoplay.is_enabled();
            autoplay.set_enabled(!enabled, now);
        }
    }

    fn frames_wanted(&self) -> bool {
        self.session.is_animating() && self.env.is_page_visible()
    }

    // A transition started outside `tick` lines its frames up from `now`.
    fn sync_frame_clock(&mut self, now: Duration) {
        self.last_tick = self.last_tick.max(now);
    }

    /// Deliver everything due at `now`: a transition frame first, then the
    /// autoplay task.
    pub fn tick(&mut self, now: Duration) {
        if self.frames_wanted() {
            self.session.on_frame(now);
        }
        if let Some(autoplay) = self.autoplay.as_mut() {
            autoplay.poll(now, self.session.as_mut());
        }
        self.sync_frame_clock(now);
    }

    /// Earliest time this panel needs a tick.
    pub fn next_wakeup(&self) -> Option<Duration> {
        let frame = self
            .frames_wanted()
            .then_some(self.last_tick + FRAME_INTERVAL);
        let autoplay = self.autoplay.as_ref().and_then(Autoplay::next_due);
        match (frame, autoplay) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run every tick due up to and including `until`, in time order.
    pub fn advance_to(&mut self, until: Duration) {
        while let Some(at) = self.next_wakeup() {
            if at > until {
                break;
            }
            self.tick(at.max(self.last_tick));
        }
    }
}
