use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use crate::{
    ease::lerp,
    render::{DrawState, Renderer},
    snapshot::Snapshot,
};

const NODES: usize = 8;
const CYCLE_START: usize = 3;
// "(i)" plus the " ──> " connector
const NODE_WIDTH: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Racing,
    FindingEntry,
    Found,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloydSnapshot {
    pub tortoise: usize,
    pub hare: usize,
    pub phase: Phase,
    text: String,
}

impl Snapshot for FloydSnapshot {
    fn text(&self) -> &str {
        &self.text
    }
}

fn next(node: usize) -> usize {
    if node + 1 < NODES {
        node + 1
    } else {
        CYCLE_START
    }
}

/// Tortoise and hare over a list whose tail links back to `CYCLE_START`.
pub fn snapshots() -> Vec<FloydSnapshot> {
    let mut out = vec![FloydSnapshot {
        tortoise: 0,
        hare: 0,
        phase: Phase::Racing,
        text: "Tortoise and hare both start at node 0".to_string(),
    }];

    let (mut t, mut h) = (0, 0);
    loop {
        t = next(t);
        h = next(next(h));
        let met = t == h;
        out.push(FloydSnapshot {
            tortoise: t,
            hare: h,
            phase: Phase::Racing,
            text: if met {
                format!("They meet at node {t}: there is a cycle")
            } else {
                format!("Tortoise moves to {t}, hare jumps to {h}")
            },
        });
        if met {
            break;
        }
    }

    t = 0;
    out.push(FloydSnapshot {
        tortoise: t,
        hare: h,
        phase: Phase::FindingEntry,
        text: "Tortoise returns to the head; both now move one node at a time".to_string(),
    });
    while t != h {
        t = next(t);
        h = next(h);
        out.push(FloydSnapshot {
            tortoise: t,
            hare: h,
            phase: if t == h { Phase::Found } else { Phase::FindingEntry },
            text: if t == h {
                format!("Cycle entry found at node {t}")
            } else {
                format!("Tortoise at {t}, hare at {h}")
            },
        });
    }
    out
}

fn node_x(area: Rect, node: usize) -> f64 {
    area.x as f64 + 1.0 + node as f64 * NODE_WIDTH as f64
}

fn marker_style(animating: bool) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    if animating {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

pub struct FloydRenderer;

impl Renderer<FloydSnapshot> for FloydRenderer {
    fn render(&self, state: &DrawState<'_, FloydSnapshot>, buf: &mut Buffer) {
        let area = state.viewport.area;
        if area.height < 5 || area.width < NODE_WIDTH * NODES as u16 {
            buf.set_string(area.x, area.y, "window too small", Style::default());
            return;
        }
        let shown = state.nearest();
        let row = area.y + 1;

        let chain = (0..NODES).map(|i| format!("({i})")).join(" ──> ");
        buf.set_string(area.x + 1, row, &chain, Style::default().fg(Color::Cyan));
        let back = format!(
            "└─ {} links back to ({CYCLE_START}) ─┘",
            NODES - 1
        );
        let back_x = node_x(area, CYCLE_START) as u16;
        buf.set_string(back_x, row + 1, back, Style::default().fg(Color::DarkGray));

        let pos = |from: usize, to: usize| -> u16 {
            lerp(node_x(area, from), node_x(area, to), state.progress).round() as u16
        };
        let t_x = pos(state.current.tortoise, state.target.tortoise);
        let h_x = pos(state.current.hare, state.target.hare);

        let markers = row + 2;
        let style = marker_style(state.animating);
        buf.set_string(t_x + 1, markers, "T", style.fg(Color::Green));
        if h_x == t_x {
            buf.set_string(h_x + 2, markers, "H", style.fg(Color::Red));
        } else {
            buf.set_string(h_x + 1, markers, "H", style.fg(Color::Red));
        }

        if shown.phase == Phase::Found {
            buf.set_string(
                area.x + 1,
                markers + 1,
                format!("entry = ({})", shown.tortoise),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            );
        }
    }
}
