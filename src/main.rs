use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use stepviz::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    demos::Visualization,
    ease::Ease,
    environment::{reduced_motion_from_env, SharedEnvironment},
    logging,
    runtime::{Clock, CrosstermEventSource, FixedTicker, Runner, VizEvent},
};
use tracing::info;

// Longest the loop sleeps when nothing is scheduled.
const IDLE_TICK_MS: u64 = 250;
// Braille cells address 2 columns of dots each.
const TERMINAL_PIXEL_RATIO: f64 = 2.0;

/// step-through algorithm visualizations in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Step through algorithm visualizations one snapshot at a time, with eased transitions between steps and an autoplay mode that loops each visualization."
)]
pub struct Cli {
    /// milliseconds between autoplay steps
    #[clap(short = 'i', long)]
    interval: Option<u64>,

    /// milliseconds to dwell on the final step before autoplay starts over
    #[clap(short = 'd', long)]
    done_pause: Option<u64>,

    /// transition length in milliseconds (0 steps instantly)
    #[clap(short = 't', long)]
    transition: Option<u64>,

    /// easing curve for forward transitions
    #[clap(short = 'e', long, value_enum)]
    ease: Option<Ease>,

    /// disable transitions and autoplay; step manually only
    #[clap(long)]
    reduced_motion: bool,

    /// start with autoplay off
    #[clap(long)]
    no_autoplay: bool,

    /// visualization to show; repeat for several (default: all)
    #[clap(short = 'v', long = "viz", value_enum)]
    visualizations: Vec<Visualization>,

    /// list the available visualizations and exit
    #[clap(long)]
    list: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// write logs to this file instead of the state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay command line flags on the persisted configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(ms) = self.interval {
            config.interval_ms = ms;
        }
        if let Some(ms) = self.done_pause {
            config.done_pause_ms = ms;
        }
        if let Some(ms) = self.transition {
            config.transition_ms = ms;
        }
        if let Some(ease) = self.ease {
            config.ease = ease;
        }
        if self.reduced_motion {
            config.reduced_motion = true;
        }
        if self.no_autoplay {
            config.autoplay = false;
        }
        if !self.visualizations.is_empty() {
            config.visualizations = self.visualizations.clone();
        }
        config
    }
}

fn list_visualizations() -> String {
    Visualization::all()
        .iter()
        .map(|viz| format!("{:<16}{}", viz.to_string(), viz.title()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list {
        println!("{}", list_visualizations());
        return Ok(());
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    // Logging is optional; a bad path only costs the log file.
    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(err) = logging::init_file_logging(&path) {
            eprintln!("stepviz: logging disabled ({}): {err}", path.display());
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> Result<(), Box<dyn Error>> {
    let clock = Clock::start();
    let env = SharedEnvironment::new(config.reduced_motion || reduced_motion_from_env())
        .with_pixel_ratio(TERMINAL_PIXEL_RATIO);

    let size = terminal.size()?;
    let mut app = App::new(
        config,
        env,
        Rect::new(0, 0, size.width, size.height),
        clock.now(),
    );
    info!(panels = app.panels.len(), "started");

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(IDLE_TICK_MS)),
    );

    terminal.draw(|f| f.render_widget(&app, f.area()))?;

    loop {
        let event = runner.step(clock.now(), app.next_wakeup());
        let now = clock.now();

        match event {
            VizEvent::Key(key) => {
                if app.on_key(key, now) == Action::Quit {
                    break;
                }
            }
            VizEvent::Resize => {
                let size = terminal.size()?;
                app.resize(Rect::new(0, 0, size.width, size.height));
            }
            VizEvent::Focus(visible) => app.set_visible(visible),
            VizEvent::Tick => {}
        }

        app.tick(now);
        terminal.draw(|f| f.render_widget(&app, f.area()))?;
    }

    info!("quit");
    Ok(())
}
