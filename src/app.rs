use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use itertools::Itertools;
use ratatui::layout::Rect;
use tracing::debug;

use crate::{
    config::Config,
    demos::Visualization,
    environment::SharedEnvironment,
    panel::Panel,
    ui::AppLayout,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Terminal host: a tab strip of visualization panels sharing one
/// environment.
pub struct App {
    pub panels: Vec<Panel>,
    pub selected: usize,
    pub show_help: bool,
    env: SharedEnvironment,
    busy: Rc<Cell<bool>>,
}

impl App {
    pub fn new(config: &Config, env: SharedEnvironment, size: Rect, now: Duration) -> Self {
        let busy = Rc::new(Cell::new(false));
        let surface = AppLayout::new(size).surface;

        let mut wanted: Vec<Visualization> = config.visualizations.iter().copied().unique().collect();
        if wanted.is_empty() {
            wanted = Visualization::all().to_vec();
        }

        let panels = wanted
            .iter()
            .map(|viz| viz.panel(config, &env, busy.clone(), surface, now))
            .collect();

        let mut app = Self {
            panels,
            selected: 0,
            show_help: false,
            env,
            busy,
        };
        app.select(0);
        app
    }

    pub fn env(&self) -> &SharedEnvironment {
        &self.env
    }

    pub fn current(&self) -> &Panel {
        &self.panels[self.selected]
    }

    pub fn current_mut(&mut self) -> &mut Panel {
        &mut self.panels[self.selected]
    }

    /// Switch tabs; only the selected panel counts as active.
    pub fn select(&mut self, index: usize) {
        if self.panels.is_empty() {
            return;
        }
        self.selected = index % self.panels.len();
        for (i, panel) in self.panels.iter_mut().enumerate() {
            panel.set_active(i == self.selected);
        }
        debug!(panel = self.current().title(), "panel selected");
    }

    pub fn resize(&mut self, size: Rect) {
        let surface = AppLayout::new(size).surface;
        for panel in &mut self.panels {
            panel.resize(surface);
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        debug!(visible, "visibility changed");
        self.env.set_visible(visible);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.busy.set(self.show_help);
    }

    pub fn tick(&mut self, now: Duration) {
        for panel in &mut self.panels {
            panel.tick(now);
        }
    }

    pub fn next_wakeup(&self) -> Option<Duration> {
        self.panels.iter().filter_map(Panel::next_wakeup).min()
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Duration) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.show_help {
            match key.code {
                KeyCode::Char('q') => return Action::Quit,
                _ => self.toggle_help(),
            }
            return Action::Continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                self.current_mut().step_forward(now)
            }
            KeyCode::Left | KeyCode::Char('h') => self.current_mut().step_backward(),
            KeyCode::Char('r') => self.current_mut().reset(),
            KeyCode::Char('p') => self.current_mut().toggle_autoplay(now),
            KeyCode::Tab => self.select(self.selected + 1),
            KeyCode::BackTab => self.select(self.selected + self.panels.len().saturating_sub(1)),
            KeyCode::Char('?') => self.toggle_help(),
            _ => {}
        }
        Action::Continue
    }
}
