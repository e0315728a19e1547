use ratatui::{
    layout::Rect,
    text::{Line, Span},
    Frame,
};

use super::render_message;
use crate::ui::styles;

pub fn render(frame: &mut Frame, area: Rect) {
    render_message(
        frame,
        area,
        "404",
        vec![
            Line::from(Span::styled("Page not found", styles::title_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press [1] to go home or [Esc] to go back",
                styles::muted_style(),
            )),
        ],
    );
}
