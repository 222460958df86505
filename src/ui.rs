use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Widget, Wrap},
};

use crate::{app::App, engine::Controls, panel::Panel};

const HORIZONTAL_MARGIN: u16 = 1;

const HELP: &str = "→ / l / space   step forward\n\
← / h           step back\n\
r               reset\n\
p               pause / resume autoplay\n\
tab / shift-tab switch visualization\n\
?               toggle this help\n\
q / esc         quit";

/// Screen regions, computed the same way for drawing and for resize
/// notifications so engines always know their displayed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub tabs: Rect,
    pub frame: Rect,
    pub surface: Rect,
    pub status: Rect,
    pub controls: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // tabs
                Constraint::Min(3),    // visualization
                Constraint::Length(1), // status
                Constraint::Length(1), // controls
            ])
            .split(area);

        let frame = chunks[1];
        Self {
            tabs: chunks[0],
            frame,
            surface: Block::default().borders(Borders::ALL).inner(frame),
            status: chunks[2],
            controls: chunks[3],
        }
    }
}

fn control_span(label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    };
    Span::styled(format!(" {label} "), style)
}

fn autoplay_label(panel: &Panel) -> &'static str {
    match panel.autoplay() {
        None => "autoplay off",
        Some(ap) if ap.is_stopped() => "autoplay stopped",
        Some(ap) if ap.is_enabled() => "autoplay on",
        Some(_) => "autoplay paused",
    }
}

fn controls_line(controls: Controls, autoplay: &'static str) -> Line<'static> {
    Line::from(vec![
        control_span("[←] back", controls.backward),
        control_span("[→] next", controls.forward),
        control_span("[r] reset", controls.reset),
        Span::styled(
            format!("  {autoplay}  [?] help"),
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ),
    ])
}

/// Copy an engine's surface into the frame, clipped to both areas.
fn blit(src: &Buffer, dst: &mut Buffer) {
    let clip = src.area.intersection(dst.area);
    for y in clip.top()..clip.bottom() {
        for x in clip.left()..clip.right() {
            if let Some(cell) = dst.cell_mut((x, y)) {
                *cell = src[(x, y)].clone();
            }
        }
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = AppLayout::new(area);
        let panel = self.current();
        let session = panel.session();

        let titles: Vec<&str> = self.panels.iter().map(Panel::title).collect();
        Tabs::new(titles)
            .select(self.selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .render(layout.tabs, buf);

        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", panel.title()))
            .render(layout.frame, buf);
        blit(session.surface().buffer(), buf);

        let status_style = if session.is_ready() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };
        Paragraph::new(Span::styled(session.status().to_string(), status_style))
            .alignment(Alignment::Left)
            .render(layout.status, buf);

        Paragraph::new(controls_line(session.controls(), autoplay_label(panel)))
            .render(layout.controls, buf);

        if self.show_help {
            let popup = centered_rect(44, 9, area);
            Clear.render(popup, buf);
            Paragraph::new(HELP)
                .block(Block::default().borders(Borders::ALL).title(" keys "))
                .wrap(Wrap { trim: false })
                .render(popup, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::environment::SharedEnvironment;
    use crate::surface::{buffer_text, row_text};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;

    fn draw(app: &App, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    #[test]
    fn layout_surface_sits_inside_frame() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.tabs.height, 1);
        assert_eq!(layout.surface.width, layout.frame.width - 2);
        assert_eq!(layout.surface.height, layout.frame.height - 2);
        assert_eq!(layout.controls.y, 23);
    }

    #[test]
    fn renders_tabs_status_and_controls() {
        let area = Rect::new(0, 0, 90, 20);
        let app = App::new(&Config::default(), SharedEnvironment::default(), area, Duration::ZERO);
        let buf = draw(&app, area);
        let layout = AppLayout::new(area);

        let tabs = row_text(&buf, layout.tabs.y);
        assert!(tabs.contains("Floyd"));
        assert!(tabs.contains("Fibonacci"));

        let status = row_text(&buf, layout.status.y);
        assert!(status.contains("Tortoise and hare both start at node 0"));

        let controls = row_text(&buf, layout.controls.y);
        assert!(controls.contains("[→] next"));
        assert!(controls.contains("autoplay on"));

        assert!(buffer_text(&buf).contains("(7)"));
    }

    #[test]
    fn help_overlay_is_drawn() {
        let area = Rect::new(0, 0, 90, 20);
        let mut app = App::new(&Config::default(), SharedEnvironment::default(), area, Duration::ZERO);
        app.on_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE), Duration::ZERO);
        assert!(buffer_text(&draw(&app, area)).contains("toggle this help"));
    }

    #[test]
    fn reduced_motion_shows_autoplay_off() {
        let area = Rect::new(0, 0, 90, 20);
        let app = App::new(&Config::default(), SharedEnvironment::new(true), area, Duration::ZERO);
        let buf = draw(&app, area);
        let layout = AppLayout::new(area);
        assert!(row_text(&buf, layout.controls.y).contains("autoplay off"));
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let r = centered_rect(100, 100, Rect::new(0, 0, 40, 10));
        assert_eq!(r, Rect::new(0, 0, 40, 10));
        let r = centered_rect(10, 4, Rect::new(0, 0, 40, 10));
        assert_eq!(r, Rect::new(15, 3, 10, 4));
    }
}
