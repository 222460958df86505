// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod autoplay;
pub mod config;
pub mod demos;
pub mod ease;
pub mod engine;
pub mod environment;
pub mod error;
pub mod logging;
pub mod panel;
pub mod render;
pub mod runtime;
pub mod snapshot;
pub mod surface;
pub mod ui;

pub use autoplay::{Autoplay, AutoplayConfig, AutoplayHandle};
pub use engine::{Controls, Engine, EngineOptions, ResetMode, Session, Transition, TransitionMode};
pub use environment::{Environment, SharedEnvironment};
pub use error::{VizError, VizResult};
pub use panel::Panel;
pub use render::{DrawState, Renderer};
pub use snapshot::{Factory, Snapshot};
