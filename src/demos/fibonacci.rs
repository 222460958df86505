use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    render::{DrawState, Renderer},
    snapshot::Snapshot,
};

const CELLS: usize = 10;
const CELL_WIDTH: u16 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibSnapshot {
    pub table: Vec<Option<u64>>,
    /// Cell written by the step that produced this snapshot.
    pub focus: Option<usize>,
    text: String,
}

impl Snapshot for FibSnapshot {
    fn text(&self) -> &str {
        &self.text
    }
}

/// Bottom-up table fill for F(0)..F(CELLS - 1).
pub fn snapshots() -> Vec<FibSnapshot> {
    let mut table = vec![None; CELLS];
    let mut out = vec![FibSnapshot {
        table: table.clone(),
        focus: None,
        text: format!("Empty table for F(0)..F({})", CELLS - 1),
    }];

    for i in 0..CELLS {
        let (value, text) = match i {
            0 => (0, "Base case: F(0) = 0".to_string()),
            1 => (1, "Base case: F(1) = 1".to_string()),
            _ => {
                let a = table[i - 1].unwrap_or_default();
                let b = table[i - 2].unwrap_or_default();
                (
                    a + b,
                    format!("F({i}) = F({}) + F({}) = {a} + {b} = {}", i - 1, i - 2, a + b),
                )
            }
        };
        table[i] = Some(value);
        out.push(FibSnapshot {
            table: table.clone(),
            focus: Some(i),
            text,
        });
    }
    out
}

fn centered(label: &str, width: u16) -> String {
    let pad = (width as usize).saturating_sub(label.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), label, " ".repeat(pad - left))
}

pub struct FibonacciRenderer;

impl Renderer<FibSnapshot> for FibonacciRenderer {
    fn render(&self, state: &DrawState<'_, FibSnapshot>, buf: &mut Buffer) {
        let area = state.viewport.area;
        if area.height < 4 || area.width < CELL_WIDTH * CELLS as u16 + 1 {
            buf.set_string(area.x, area.y, "window too small", Style::default());
            return;
        }

        let shown = state.nearest();
        let header = area.y + 1;
        let values = area.y + 2;
        let deps = area.y + 3;

        for i in 0..CELLS {
            let x = area.x + 1 + i as u16 * CELL_WIDTH;
            let is_focus = shown.focus == Some(i);
            let is_input = shown.focus.is_some_and(|f| f >= 2 && (i + 1 == f || i + 2 == f));

            let style = if is_focus {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if is_input {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };

            buf.set_string(x, header, centered(&format!("F{i}"), CELL_WIDTH), Style::default().add_modifier(Modifier::DIM));
            let label = match shown.table[i] {
                Some(v) => v.to_string(),
                None => "·".to_string(),
            };
            buf.set_string(x, values, centered(&label, CELL_WIDTH), style);
            if is_input {
                buf.set_string(x, deps, centered("↘", CELL_WIDTH), style);
            }
        }

        // the incoming cell blinks in while the step is tweening
        if state.animating {
            if let Some(f) = state.target.focus {
                let x = area.x + 1 + f as u16 * CELL_WIDTH;
                let glyph = if state.progress < 0.5 { "…" } else { "✓" };
                buf.set_string(x, deps, centered(glyph, CELL_WIDTH), Style::default().fg(Color::Yellow));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{buffer_text, Viewport};
    use ratatui::layout::Rect;

    #[test]
    fn table_fills_in_order() {
        let seq = snapshots();
        assert_eq!(seq.len(), CELLS + 1);
        assert!(seq[0].table.iter().all(Option::is_none));
        for (step, snap) in seq.iter().enumerate().skip(1) {
            assert_eq!(snap.focus, Some(step - 1));
            assert_eq!(snap.table.iter().filter(|v| v.is_some()).count(), step);
        }
        assert_eq!(seq.last().unwrap().table[CELLS - 1], Some(34));
    }

    #[test]
    fn text_explains_recurrence() {
        let seq = snapshots();
        assert_eq!(seq[4].text(), "F(3) = F(2) + F(1) = 1 + 1 = 2");
    }

    #[test]
    fn centered_pads_both_sides() {
        assert_eq!(centered("ab", 6), "  ab  ");
        assert_eq!(centered("abc", 6), " abc  ");
        assert_eq!(centered("toolong", 3), "toolong");
    }

    #[test]
    fn renders_values_after_midpoint() {
        let seq = snapshots();
        let area = Rect::new(0, 0, 70, 5);
        let draw = |progress: f64| {
            let mut buf = Buffer::empty(area);
            let state = DrawState {
                current: &seq[9],
                target: &seq[10],
                progress,
                animating: true,
                viewport: Viewport::new(area, 1.0),
            };
            FibonacciRenderer.render(&state, &mut buf);
            buffer_text(&buf)
        };
        assert!(!draw(0.2).contains("34"));
        assert!(draw(0.8).contains("34"));
    }
}
