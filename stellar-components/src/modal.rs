//! Modal overlay chrome
//!
//! Dims everything rendered so far, draws a centered framed box with a title
//! and a close hint, and hands back the content area. The caller renders the
//! overlay content inside and uses [`modal_hit`] to tell backdrop presses
//! (dismiss) apart from content presses (swallowed).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Widget},
    Frame,
};

/// Configuration for modal appearance
pub struct ModalStyle {
    /// Whether to dim the background
    pub dim_background: bool,
    /// Background color for the modal area
    pub bg_color: Color,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_background: true,
            bg_color: Color::Rgb(28, 28, 33),
        }
    }
}

/// Where a pointer interaction landed relative to an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    /// Outside the modal box - a press here dismisses the overlay.
    Backdrop,
    /// Inside the modal box - presses here must not dismiss.
    Content,
}

/// Classify a pointer position against the modal box.
pub fn modal_hit(modal_area: Rect, column: u16, row: u16) -> ModalHit {
    let inside = column >= modal_area.x
        && column < modal_area.x.saturating_add(modal_area.width)
        && row >= modal_area.y
        && row < modal_area.y.saturating_add(modal_area.height);
    if inside {
        ModalHit::Content
    } else {
        ModalHit::Backdrop
    }
}

/// Render the modal chrome and return the inner content area.
///
/// Call this AFTER rendering the background page. The background keeps
/// rendering each frame; it is dimmed fresh here.
pub fn render_modal(frame: &mut Frame, area: Rect, title: &str, style: &ModalStyle) -> Rect {
    if style.dim_background {
        dim_buffer(frame.buffer_mut());
    }

    frame.render_widget(Clear, area);
    frame.render_widget(BgFill(style.bg_color), area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title).trim_end().to_string())
        .title_bottom(" esc to close ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Dim every cell rendered so far.
fn dim_buffer(buffer: &mut Buffer) {
    let area = *buffer.area();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = &mut buffer[(x, y)];
            cell.set_fg(Color::DarkGray);
            cell.set_style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM));
        }
    }
}

/// Simple widget that fills an area with a background color
struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                buf[(x, y)].set_bg(self.0);
                buf[(x, y)].set_symbol(" ");
            }
        }
    }
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
