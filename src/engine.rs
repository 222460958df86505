use std::time::Duration;

use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::{
    ease::Ease,
    environment::Environment,
    render::{DrawState, Renderer},
    snapshot::{load_sequence, Factory, Snapshot},
    surface::Surface,
};

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(400);

/// What `reset` does besides rewinding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Snap back to the first snapshot of the same sequence.
    Rewind,
    /// Rebuild the sequence from the factory, then rewind.
    Regenerate,
}

/// How a forward step is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    Animated(Duration),
    Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub reset_mode: ResetMode,
    pub transition: TransitionMode,
    pub ease: Ease,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            reset_mode: ResetMode::Rewind,
            transition: TransitionMode::Animated(DEFAULT_TRANSITION),
            ease: Ease::InOutCubic,
        }
    }
}

/// An animated move from the current step to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub target: usize,
    pub started_at: Duration,
    /// Linear progress in `[0, 1]`; easing is applied at render time.
    pub progress: f64,
}

/// Enabled state of the three triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub reset: bool,
}

/// Object-safe view of an engine, used by autoplay and the host.
pub trait Session {
    fn name(&self) -> &str;

    fn step_forward(&mut self, now: Duration);
    fn step_backward(&mut self);
    fn reset(&mut self);
    /// Advance the in-flight transition, if any.
    fn on_frame(&mut self, now: Duration);
    /// Size-change notification for the drawing surface.
    fn resize(&mut self, area: Rect);

    fn set_active(&mut self, active: bool);
    fn is_active(&self) -> bool;

    /// False once construction failed; the session is inert for good.
    fn is_ready(&self) -> bool;
    fn is_animating(&self) -> bool;
    fn step_index(&self) -> usize;
    fn len(&self) -> usize;
    fn transition(&self) -> Option<Transition>;
    fn status(&self) -> &str;
    fn controls(&self) -> Controls;
    fn surface(&self) -> &Surface;
    fn reduced_motion(&self) -> bool;
    fn render_count(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index the session is at or heading to.
    fn destination(&self) -> usize {
        self.transition()
            .map(|t| t.target)
            .unwrap_or_else(|| self.step_index())
    }

    fn is_at_end(&self) -> bool {
        !self.is_empty() && self.step_index() + 1 == self.len()
    }
}

/// Steps through a precomputed snapshot sequence, tweening forward moves.
pub struct Engine<S, R> {
    name: String,
    factory: Factory<S>,
    renderer: R,
    options: EngineOptions,
    env: Box<dyn Environment>,
    reduced_motion: bool,

    snapshots: Vec<S>,
    step: usize,
    transition: Option<Transition>,
    disabled: Option<String>,
    active: bool,

    surface: Surface,
    status: String,
    controls: Controls,
    renders: u64,
}

impl<S: Snapshot, R: Renderer<S>> Engine<S, R> {
    /// Build the sequence and draw the first frame. An empty sequence puts
    /// the engine into a permanent disabled state instead of failing.
    pub fn new(
        name: impl Into<String>,
        mut factory: Factory<S>,
        renderer: R,
        options: EngineOptions,
        env: Box<dyn Environment>,
        area: Rect,
    ) -> Self {
        let name = name.into();
        let reduced_motion = env.prefers_reduced_motion();

        let (snapshots, disabled) = match load_sequence(&name, &mut factory) {
            Ok(snapshots) => (snapshots, None),
            Err(err) => {
                warn!(engine = %name, error = %err, "visualization disabled");
                (Vec::new(), Some(err.to_string()))
            }
        };

        let mut engine = Self {
            name,
            factory,
            renderer,
            options,
            env,
            reduced_motion,
            snapshots,
            step: 0,
            transition: None,
            disabled,
            active: true,
            surface: Surface::new(area),
            status: String::new(),
            controls: Controls::default(),
            renders: 0,
        };
        engine.render();
        engine
    }

    pub fn snapshots(&self) -> &[S] {
        &self.snapshots
    }

    pub fn current(&self) -> Option<&S> {
        self.snapshots.get(self.step)
    }

    fn animates(&self) -> bool {
        !self.reduced_motion && matches!(self.options.transition, TransitionMode::Animated(_))
    }

    fn transition_duration(&self) -> Duration {
        match self.options.transition {
            TransitionMode::Animated(d) => d,
            TransitionMode::Instant => Duration::ZERO,
        }
    }

    fn render(&mut self) {
        self.renders += 1;

        if let Some(message) = &self.disabled {
            self.surface.show_error(message);
            self.status = message.clone();
            self.controls = Controls::default();
            return;
        }

        let viewport = self.surface.prepare(self.env.pixel_ratio());
        let (target, progress, animating) = match self.transition {
            Some(t) => (t.target, self.options.ease.apply(t.progress), true),
            None => (self.step, 1.0, false),
        };

        if !viewport.is_empty() {
            let state = DrawState {
                current: &self.snapshots[self.step],
                target: &self.snapshots[target],
                progress,
                animating,
                viewport,
            };
            self.renderer.render(&state, self.surface.buffer_mut());
        }

        self.status = status_line(target, self.snapshots.len(), self.snapshots[target].text());

        let last = self.snapshots.len() - 1;
        self.controls = Controls {
            forward: !animating && self.step < last,
            backward: !animating && self.step > 0,
            reset: true,
        };
    }
}

/// Status text for the displayed snapshot: plain on the first step, then
/// prefixed with a `[index/last]` counter.
pub fn status_line(index: usize, len: usize, text: &str) -> String {
    if index == 0 {
        text.to_string()
    } else {
        format!("[{}/{}] {}", index, len.saturating_sub(1), text)
    }
}

impl<S: Snapshot, R: Renderer<S>> Session for Engine<S, R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn step_forward(&mut self, now: Duration) {
        if !self.is_ready() || self.transition.is_some() || self.is_at_end() {
            return;
        }
        let target = self.step + 1;

        if self.animates() {
            debug!(engine = %self.name, target, "transition started");
            self.transition = Some(Transition {
                target,
                started_at: now,
                progress: 0.0,
            });
        } else {
            debug!(engine = %self.name, step = target, "stepped forward");
            self.step = target;
        }
        self.render();
    }

    fn step_backward(&mut self) {
        if !self.is_ready() || self.transition.is_some() || self.step == 0 {
            return;
        }
        self.step -= 1;
        debug!(engine = %self.name, step = self.step, "stepped backward");
        self.render();
    }

    fn reset(&mut self) {
        if !self.is_ready() {
            return;
        }

        if self.options.reset_mode == ResetMode::Regenerate {
            match load_sequence(&self.name, &mut self.factory) {
                Ok(snapshots) => {
                    info!(engine = %self.name, len = snapshots.len(), "sequence regenerated");
                    self.snapshots = snapshots;
                }
                Err(err) => {
                    warn!(engine = %self.name, error = %err, "regeneration failed, keeping previous sequence");
                }
            }
        }

        self.step = 0;
        self.transition = None;
        info!(engine = %self.name, "reset");
        self.render();
    }

    fn on_frame(&mut self, now: Duration) {
        let Some(mut transition) = self.transition else {
            return;
        };

        let duration = self.transition_duration();
        let progress = if duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_sub(transition.started_at);
            (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            self.step = transition.target;
            self.transition = None;
            debug!(engine = %self.name, step = self.step, "transition complete");
        } else {
            transition.progress = progress;
            self.transition = Some(transition);
        }
        self.render();
    }

    fn resize(&mut self, area: Rect) {
        if self.surface.set_display(area) {
            self.render();
        }
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_ready(&self) -> bool {
        self.disabled.is_none()
    }

    fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    fn step_index(&self) -> usize {
        self.step
    }

    fn len(&self) -> usize {
        self.snapshots.len()
    }

    fn transition(&self) -> Option<Transition> {
        self.transition
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn controls(&self) -> Controls {
        self.controls
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn render_count(&self) -> u64 {
        self.renders
    }
}
