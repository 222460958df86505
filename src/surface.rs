use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget, Wrap},
};

/// Upper bound on the pixel ratio used for backing resolution.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Geometry handed to renderers on every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Displayed area in terminal cells.
    pub area: Rect,
    /// Capped device pixel ratio.
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(area: Rect, pixel_ratio: f64) -> Self {
        Self {
            area,
            pixel_ratio: capped_pixel_ratio(pixel_ratio),
        }
    }

    /// Backing resolution: displayed size scaled by the capped ratio.
    pub fn backing_size(&self) -> (u32, u32) {
        let scale = |v: u16| (v as f64 * self.pixel_ratio).round() as u32;
        (scale(self.area.width), scale(self.area.height))
    }

    pub fn is_empty(&self) -> bool {
        self.area.width == 0 || self.area.height == 0
    }
}

pub fn capped_pixel_ratio(ratio: f64) -> f64 {
    if !ratio.is_finite() || ratio < 1.0 {
        1.0
    } else {
        ratio.min(MAX_PIXEL_RATIO)
    }
}

/// Drawing surface owned by exactly one engine.
#[derive(Debug, Clone)]
pub struct Surface {
    display: Rect,
    buffer: Buffer,
    viewport: Viewport,
}

impl Surface {
    pub fn new(display: Rect) -> Self {
        Self {
            display,
            buffer: Buffer::empty(display),
            viewport: Viewport::new(display, 1.0),
        }
    }

    /// Record a new displayed size. Returns whether it changed.
    pub fn set_display(&mut self, display: Rect) -> bool {
        if self.display == display {
            return false;
        }
        self.display = display;
        true
    }

    pub fn display(&self) -> Rect {
        self.display
    }

    /// Bring the backing buffer in line with the displayed size and clear it.
    pub fn prepare(&mut self, pixel_ratio: f64) -> Viewport {
        if self.buffer.area != self.display {
            self.buffer.resize(self.display);
        }
        self.buffer.reset();
        self.viewport = Viewport::new(self.display, pixel_ratio);
        self.viewport
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Paint a terminal error message in place of the visualization.
    pub fn show_error(&mut self, message: &str) {
        self.prepare(1.0);
        let area = self.display;
        if area.width == 0 || area.height == 0 {
            return;
        }
        Paragraph::new(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, &mut self.buffer);
    }
}

#[cfg(test)]
pub(crate) fn row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (area.left()..area.right())
        .map(|x| buf[(x, y)].symbol().to_string())
        .collect()
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| row_text(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(capped_pixel_ratio(3.0), MAX_PIXEL_RATIO);
        assert_eq!(capped_pixel_ratio(1.5), 1.5);
        assert_eq!(capped_pixel_ratio(0.5), 1.0);
        assert_eq!(capped_pixel_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn backing_size_scales_display() {
        let vp = Viewport::new(Rect::new(0, 0, 40, 10), 4.0);
        assert_eq!(vp.backing_size(), (80, 20));
    }

    #[test]
    fn prepare_follows_display_and_clears() {
        let mut surface = Surface::new(Rect::new(0, 0, 4, 2));
        surface.buffer_mut().set_string(0, 0, "ab", Style::default());
        assert!(surface.set_display(Rect::new(0, 0, 6, 3)));
        assert!(!surface.set_display(Rect::new(0, 0, 6, 3)));

        let vp = surface.prepare(1.0);
        assert_eq!(vp.area, Rect::new(0, 0, 6, 3));
        assert_eq!(surface.buffer().area, Rect::new(0, 0, 6, 3));
        assert_eq!(row_text(surface.buffer(), 0), "      ");
    }

    #[test]
    fn show_error_paints_message() {
        let mut surface = Surface::new(Rect::new(0, 0, 20, 3));
        surface.show_error("boom");
        assert!(buffer_text(surface.buffer()).contains("boom"));
    }
}
