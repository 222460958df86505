use rand::seq::SliceRandom;
use ratatui::{
    buffer::Buffer,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line},
        Widget,
    },
};

use crate::{
    ease::lerp,
    render::{DrawState, Renderer},
    snapshot::Snapshot,
};

const VALUES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSnapshot {
    pub values: Vec<u32>,
    /// Index of the element being carried left, if any.
    pub active: Option<usize>,
    /// `values[..sorted]` is in order.
    pub sorted: usize,
    text: String,
}

impl Snapshot for SortSnapshot {
    fn text(&self) -> &str {
        &self.text
    }
}

/// Insertion sort over a fresh shuffle of `1..=VALUES`.
pub fn snapshots() -> Vec<SortSnapshot> {
    let mut values: Vec<u32> = (1..=VALUES).collect();
    values.shuffle(&mut rand::thread_rng());
    trace(values)
}

/// Every swap of an insertion sort over `values`, as snapshots.
pub fn trace(mut values: Vec<u32>) -> Vec<SortSnapshot> {
    let mut out = vec![SortSnapshot {
        values: values.clone(),
        active: None,
        sorted: 1.min(values.len()),
        text: "Shuffled input; the first element is trivially sorted".to_string(),
    }];

    for i in 1..values.len() {
        let mut j = i;
        while j > 0 && values[j - 1] > values[j] {
            values.swap(j - 1, j);
            out.push(SortSnapshot {
                values: values.clone(),
                active: Some(j - 1),
                sorted: i,
                text: format!("Carry {} left past {}", values[j - 1], values[j]),
            });
            j -= 1;
        }
        out.push(SortSnapshot {
            values: values.clone(),
            active: None,
            sorted: i + 1,
            text: format!("{} settles at index {j}; first {} sorted", values[j], i + 1),
        });
    }

    if let Some(last) = out.last_mut() {
        last.text = "Sorted".to_string();
    }
    out
}

pub struct SortRenderer;

impl SortRenderer {
    fn bar_color(snap: &SortSnapshot, i: usize) -> Color {
        if snap.active == Some(i) {
            Color::Yellow
        } else if i < snap.sorted {
            Color::Green
        } else {
            Color::Blue
        }
    }
}

impl Renderer<SortSnapshot> for SortRenderer {
    fn render(&self, state: &DrawState<'_, SortSnapshot>, buf: &mut Buffer) {
        let area = state.viewport.area;
        let n = state.current.values.len().min(state.target.values.len());
        if n == 0 {
            return;
        }
        let shown = state.nearest();

        // one vertical line per backing column keeps bars solid at any ratio
        let (backing_w, _) = state.viewport.backing_size();
        let width = n as f64 * 2.0;
        let column = width / backing_w.max(1) as f64;
        let max = VALUES as f64;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, max])
            .paint(|ctx| {
                for i in 0..n {
                    let height = lerp(
                        state.current.values[i] as f64,
                        state.target.values[i] as f64,
                        state.progress,
                    );
                    let color = Self::bar_color(shown, i);
                    let left = i as f64 * 2.0 + 0.2;
                    let mut x = left;
                    while x < left + 1.4 {
                        ctx.draw(&Line::new(x, 0.0, x, height, color));
                        x += column;
                    }
                }
            })
            .render(area, buf);
    }
}
