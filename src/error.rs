/// Convenience result type used across stepviz.
pub type VizResult<T> = Result<T, VizError>;

/// Error taxonomy for construction-time and host-side failures.
///
/// Run-time stepping never produces one of these: boundary and in-flight
/// requests are silent no-ops.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// The snapshot factory produced nothing to step through.
    #[error("{name}: snapshot factory produced an empty sequence")]
    EmptySequence { name: String },

    /// A visualization name that no demo answers to.
    #[error("unknown visualization: {0}")]
    UnknownVisualization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VizError {
    pub fn empty_sequence(name: impl Into<String>) -> Self {
        Self::EmptySequence { name: name.into() }
    }
}
