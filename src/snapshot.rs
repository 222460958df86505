use crate::error::{VizError, VizResult};

/// One discrete, named state of a visualized process.
///
/// The engine only reads `text`; every other field belongs to the
/// visualization and is handed back untouched to its renderer.
pub trait Snapshot {
    fn text(&self) -> &str;
}

/// Produces the full snapshot sequence. Called once at construction and
/// again on every regenerating reset.
pub type Factory<S> = Box<dyn FnMut() -> Vec<S>>;

/// Run the factory and reject sequences the engine cannot step through.
pub fn load_sequence<S>(name: &str, factory: &mut Factory<S>) -> VizResult<Vec<S>> {
    let snapshots = factory();
    if snapshots.is_empty() {
        return Err(VizError::empty_sequence(name));
    }
    Ok(snapshots)
}

/// Minimal snapshot carrying only its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot(pub String);

impl Snapshot for TextSnapshot {
    fn text(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TextSnapshot {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
