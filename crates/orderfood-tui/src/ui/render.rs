use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use orderfood_core::auth::RouteDecision;
use orderfood_core::Route;

use crate::app::{App, AppState, FormKind};

use super::screens::{auth, cart, home, not_found, orders};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  🍔 OrderFood";
    let right = match app.user() {
        Some(user) => format!("{}  [?] Help", user.email),
        None => "[?] Help".to_string(),
    };

    let title_width = title.chars().count() + 1;
    let padding = (area.width as usize).saturating_sub(title_width + right.chars().count() + 2);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

/// Navigation entries depend on the session: shopping screens when logged
/// in, login/register when not, nothing while the session is resolving.
fn nav_entries(app: &App) -> Vec<(&'static str, Route)> {
    if !app.session.is_resolved() {
        Vec::new()
    } else if app.session.is_authenticated() {
        vec![
            ("[1] Menu", Route::Home),
            ("[2] Cart", Route::Cart),
            ("[3] My Orders", Route::Orders),
            ("[x] Logout", Route::Login),
        ]
    } else {
        vec![
            ("[1] Home", Route::Home),
            ("[l] Login", Route::Login),
            ("[r] Register", Route::Register),
        ]
    }
}

fn render_nav(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.nav.current();
    let logged_in = app.session.is_authenticated();

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, route)) in nav_entries(app).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        // Logout never shows as the current screen
        let selected = route == current && !(logged_in && route == Route::Login);
        let style = if selected {
            styles::nav_style(true)
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(label, style));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route_decision() {
        RouteDecision::Render => match app.nav.current() {
            Route::Home => home::render(frame, app, area),
            Route::Login => auth::render(frame, app, FormKind::Login, area),
            Route::Register => auth::render(frame, app, FormKind::Register, area),
            Route::Cart => cart::render(frame, app, area),
            Route::Orders => orders::render(frame, app, area),
            Route::NotFound => not_found::render(frame, area),
        },
        // A redirect is applied on the next tick; show the neutral screen
        // meanwhile so protected content never flashes
        RouteDecision::Wait | RouteDecision::Redirect { .. } => render_loading(frame, area),
    }
}

/// Neutral placeholder shown while something is pending.
pub fn render_loading(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled("Loading...", styles::muted_style())))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(styles::border_style(false)));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[?] help | [q]uit";

    let (left_text, left_style) = match app.toasts.current() {
        Some(toast) => (format!(" {} ", toast.message), styles::toast_style(toast.level)),
        None => (format!(" {} ", app.nav.current().title()), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 27, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  🍔 OrderFood", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1 / h", "Home / menu"),
        help_line("2 / c", "Cart"),
        help_line("3 / o", "My orders"),
        help_line("l / r", "Login / register (logged out)"),
        help_line("↑/↓", "Navigate list"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Menu", styles::highlight_style())),
        help_line("←/→", "Previous/next category"),
        help_line("Enter / a", "Add selected item to cart"),
        Line::from(""),
        Line::from(Span::styled(" Cart", styles::highlight_style())),
        help_line("p", "Place order"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("u", "Refresh current screen"),
        help_line("x", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" 🍔 OrderFood ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect_fixed(46, 10, outer);
        assert_eq!(inner, Rect::new(27, 15, 46, 10));
    }

    #[test]
    fn test_centered_rect_fixed_clamps_to_small_area() {
        let outer = Rect::new(2, 3, 20, 5);
        let inner = centered_rect_fixed(46, 10, outer);
        assert_eq!(inner.width, 20);
        assert_eq!(inner.height, 5);
        assert_eq!(inner.x, 2);
        assert_eq!(inner.y, 3);
    }
}
