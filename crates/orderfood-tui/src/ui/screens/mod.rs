//! Per-route screen rendering.

pub mod auth;
pub mod cart;
pub mod home;
pub mod not_found;
pub mod orders;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Loadable;
use crate::ui::styles;

/// Bordered box with centered message lines, used for the loading, error
/// and empty states every screen has.
pub(crate) fn render_message(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let mut content = vec![Line::from("")];
    content.extend(lines);

    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Render the loading/failed placeholder for `data`. Returns false when the
/// data is loaded and the caller should draw it.
pub(crate) fn render_pending<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &Loadable<T>,
) -> bool {
    match data {
        Loadable::Loaded(_) => false,
        Loadable::NotLoaded | Loadable::Loading => {
            render_message(
                frame,
                area,
                title,
                vec![Line::from(Span::styled("Loading...", styles::muted_style()))],
            );
            true
        }
        Loadable::Failed(error) => {
            render_message(
                frame,
                area,
                title,
                vec![
                    Line::from(Span::styled(error.as_str(), styles::error_style())),
                    Line::from(""),
                    Line::from(Span::styled("Press [u] to retry", styles::muted_style())),
                ],
            );
            true
        }
    }
}
