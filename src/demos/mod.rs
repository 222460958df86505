//! Built-in visualizations hosted by the terminal app.

pub mod fibonacci;
pub mod floyd;
pub mod insertion_sort;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use clap::ValueEnum;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

use crate::{
    autoplay::Autoplay,
    config::Config,
    engine::{Engine, EngineOptions, ResetMode, Session, TransitionMode},
    environment::SharedEnvironment,
    error::VizError,
    panel::Panel,
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Visualization {
    Floyd,
    Fibonacci,
    InsertionSort,
}

impl Visualization {
    pub fn all() -> &'static [Visualization] {
        &[
            Visualization::Floyd,
            Visualization::Fibonacci,
            Visualization::InsertionSort,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Visualization::Floyd => "Floyd's cycle detection",
            Visualization::Fibonacci => "Fibonacci DP",
            Visualization::InsertionSort => "Insertion sort",
        }
    }

    /// Shuffled inputs get a fresh sequence on every reset.
    pub fn reset_mode(&self) -> ResetMode {
        match self {
            Visualization::InsertionSort => ResetMode::Regenerate,
            Visualization::Floyd | Visualization::Fibonacci => ResetMode::Rewind,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, VizError> {
        Visualization::from_str(name, true)
            .map_err(|_| VizError::UnknownVisualization(name.to_string()))
    }

    fn session(&self, options: EngineOptions, env: &SharedEnvironment, area: Rect) -> Box<dyn Session> {
        let name = self.to_string();
        let env = Box::new(env.clone());
        match self {
            Visualization::Floyd => Box::new(Engine::new(
                name,
                Box::new(floyd::snapshots),
                floyd::FloydRenderer,
                options,
                env,
                area,
            )),
            Visualization::Fibonacci => Box::new(Engine::new(
                name,
                Box::new(fibonacci::snapshots),
                fibonacci::FibonacciRenderer,
                options,
                env,
                area,
            )),
            Visualization::InsertionSort => Box::new(Engine::new(
                name,
                Box::new(insertion_sort::snapshots),
                insertion_sort::SortRenderer,
                options,
                env,
                area,
            )),
        }
    }

    /// Wire an engine and (motion permitting) an autoplay task into a panel.
    pub fn panel(
        &self,
        config: &Config,
        env: &SharedEnvironment,
        busy: Rc<Cell<bool>>,
        area: Rect,
        now: Duration,
    ) -> Panel {
        let transition = if config.transition_ms == 0 {
            TransitionMode::Instant
        } else {
            TransitionMode::Animated(config.transition())
        };
        let options = EngineOptions {
            reset_mode: self.reset_mode(),
            transition,
            ease: config.ease,
        };
        let session = self.session(options, env, area);

        let autoplay = if config.autoplay {
            Autoplay::new(config.autoplay_config(), Box::new(env.clone()), now)
                .map(|ap| ap.with_busy(Box::new(move || busy.get())))
        } else {
            None
        };

        Panel::new(self.title(), session, autoplay, Box::new(env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for viz in Visualization::all() {
            assert_eq!(Visualization::from_name(&viz.to_string()).unwrap(), *viz);
        }
        assert_eq!(Visualization::InsertionSort.to_string(), "insertion-sort");
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            Visualization::from_name("bogosort"),
            Err(VizError::UnknownVisualization(_))
        ));
    }

    #[test]
    fn every_demo_builds_a_ready_panel() {
        let env = SharedEnvironment::default();
        let config = Config::default();
        for viz in Visualization::all() {
            let panel = viz.panel(
                &config,
                &env,
                Rc::default(),
                Rect::new(0, 0, 60, 12),
                Duration::ZERO,
            );
            assert!(panel.session().is_ready(), "{viz} should be ready");
            assert!(panel.session().len() > 1);
            assert!(panel.autoplay().is_some());
            assert_eq!(panel.title(), viz.title());
        }
    }

    #[test]
    fn zero_transition_means_instant_steps() {
        let env = SharedEnvironment::default();
        let config = Config {
            transition_ms: 0,
            autoplay: false,
            ..Config::default()
        };
        let mut panel = Visualization::Floyd.panel(
            &config,
            &env,
            Rc::default(),
            Rect::new(0, 0, 60, 12),
            Duration::ZERO,
        );
        assert!(panel.autoplay().is_none());
        panel.step_forward(Duration::ZERO);
        assert_eq!(panel.session().step_index(), 1);
    }

    #[test]
    fn configured_ease_shapes_the_transition() {
        use crate::ease::Ease;
        use crate::surface::buffer_text;

        let draw_at_40_percent = |ease: Ease| {
            let env = SharedEnvironment::default();
            let config = Config {
                ease,
                autoplay: false,
                ..Config::default()
            };
            let mut panel = Visualization::Fibonacci.panel(
                &config,
                &env,
                Rc::default(),
                Rect::new(0, 0, 70, 6),
                Duration::ZERO,
            );
            panel.step_forward(Duration::ZERO);
            panel.tick(Duration::from_millis(160));
            buffer_text(panel.session().surface().buffer())
        };

        // linear progress is still short of the midpoint; out-cubic is past it
        assert!(draw_at_40_percent(Ease::Linear).contains('…'));
        assert!(draw_at_40_percent(Ease::OutCubic).contains('✓'));
    }
}
