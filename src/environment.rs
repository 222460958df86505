use std::cell::Cell;
use std::rc::Rc;

/// Ambient signals the engine consumes but never owns.
pub trait Environment {
    /// Accessibility preference for discrete, unanimated state changes.
    fn prefers_reduced_motion(&self) -> bool;
    /// Whether the host window is currently visible to the user.
    fn is_page_visible(&self) -> bool;
    /// Device pixels per display unit; the engine caps it before use.
    fn pixel_ratio(&self) -> f64;
}

#[derive(Debug)]
struct EnvState {
    reduced_motion: Cell<bool>,
    visible: Cell<bool>,
    pixel_ratio: Cell<f64>,
}

/// Cloneable environment whose signals the host (or a test) flips at will.
///
/// All clones observe the same state, so the terminal loop can report a
/// focus change once and every engine sees it on its next poll.
#[derive(Debug, Clone)]
pub struct SharedEnvironment {
    state: Rc<EnvState>,
}

impl SharedEnvironment {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            state: Rc::new(EnvState {
                reduced_motion: Cell::new(reduced_motion),
                visible: Cell::new(true),
                pixel_ratio: Cell::new(1.0),
            }),
        }
    }

    pub fn with_pixel_ratio(self, ratio: f64) -> Self {
        self.state.pixel_ratio.set(ratio);
        self
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.visible.set(visible);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.state.reduced_motion.set(reduced);
    }
}

impl Default for SharedEnvironment {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Environment for SharedEnvironment {
    fn prefers_reduced_motion(&self) -> bool {
        self.state.reduced_motion.get()
    }

    fn is_page_visible(&self) -> bool {
        self.state.visible.get()
    }

    fn pixel_ratio(&self) -> f64 {
        self.state.pixel_ratio.get()
    }
}

/// Reduced motion requested through `STEPVIZ_REDUCED_MOTION`.
pub fn reduced_motion_from_env() -> bool {
    match std::env::var("STEPVIZ_REDUCED_MOTION") {
        Ok(v) => matches!(v.trim(), "1" | "true" | "yes" | "on"),
        Err(_) => false,
    }
}
