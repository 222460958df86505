use ratatui::buffer::Buffer;

use crate::surface::Viewport;

/// Everything a renderer may look at for one pass.
///
/// When idle, `current` and `target` are the same snapshot and `progress`
/// is 1.0.
#[derive(Debug)]
pub struct DrawState<'a, S> {
    pub current: &'a S,
    pub target: &'a S,
    /// Eased transition progress in `[0, 1]`.
    pub progress: f64,
    pub animating: bool,
    pub viewport: Viewport,
}

impl<S> DrawState<'_, S> {
    /// The snapshot that best represents this frame: the target once past
    /// the midpoint of a transition, otherwise the current one.
    pub fn nearest(&self) -> &S {
        if self.progress >= 0.5 {
            self.target
        } else {
            self.current
        }
    }
}

/// Draws one visualization. Implementations must be a pure function of the
/// draw state and the buffer they are given.
pub trait Renderer<S> {
    fn render(&self, state: &DrawState<'_, S>, buf: &mut Buffer);
}

impl<S, F> Renderer<S> for F
where
    F: Fn(&DrawState<'_, S>, &mut Buffer),
{
    fn render(&self, state: &DrawState<'_, S>, buf: &mut Buffer) {
        self(state, buf)
    }
}
