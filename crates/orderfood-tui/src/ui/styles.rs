use ratatui::style::{Color, Modifier, Style};

use orderfood_core::models::OrderStatus;
use orderfood_core::ToastLevel;

// Color palette
pub const PRIMARY: Color = Color::Rgb(224, 112, 48);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(208, 176, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(56, 44, 40);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn price_style() -> Style {
    Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD)
}

pub fn nav_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn toast_style(level: ToastLevel) -> Style {
    match level {
        ToastLevel::Success => success_style(),
        ToastLevel::Error => error_style(),
        ToastLevel::Info => highlight_style(),
    }
}

/// Badge color for an order: pending yellow, completed green,
/// cancelled red, anything else grey.
pub fn order_status_style(status: &OrderStatus) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match status {
        OrderStatus::Pending => base.fg(ACCENT),
        OrderStatus::Completed => base.fg(SECONDARY),
        OrderStatus::Cancelled => base.fg(ERROR),
        OrderStatus::Other(_) => base.fg(MUTED),
    }
}
