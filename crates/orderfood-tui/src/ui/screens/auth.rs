use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use orderfood_core::utils::format::truncate_string;

use crate::app::{App, AuthForm, FormFocus, FormKind};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Visible width of the input fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, kind: FormKind, area: Rect) {
    let form = app.form(kind);
    let height = if form.error.is_some() { 14 } else { 12 };
    let dialog = centered_rect_fixed(48, height, area);

    // Clear the area
    frame.render_widget(Clear, dialog);

    let (title, button, switch) = match kind {
        FormKind::Login => (" Login ", "Login", "Don't have an account? Register"),
        FormKind::Register => (" Register ", "Register", "Already have an account? Login"),
    };

    let mut lines = vec![Line::from("")];

    lines.push(field_line(
        "   Email: [",
        &tail(&form.email),
        form.focus == FormFocus::Email,
    ));
    let masked = "*".repeat(form.password.chars().count().min(FIELD_WIDTH));
    lines.push(field_line(
        "Password: [",
        &masked,
        form.focus == FormFocus::Password,
    ));

    lines.push(Line::from(""));
    lines.push(button_line(form, button));

    lines.push(Line::from(""));
    let switch_style = if form.focus == FormFocus::SwitchLink {
        styles::selected_style()
    } else {
        styles::muted_style()
    };
    lines.push(Line::from(vec![
        Span::raw("     "),
        Span::styled(switch, switch_style),
    ]));

    // Error message
    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_string(error, 42)),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

/// Keep the end of long input visible, the way a scrolled text box would.
fn tail(value: &str) -> String {
    let count = value.chars().count();
    if count <= FIELD_WIDTH {
        value.to_string()
    } else {
        value.chars().skip(count - FIELD_WIDTH).collect()
    }
}

fn field_line(label: &'static str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", value, cursor, width = FIELD_WIDTH),
            style,
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(form: &AuthForm, label: &str) -> Line<'static> {
    let focused = form.focus == FormFocus::Button;
    let text = if form.submitting {
        format!(" {}... ", label)
    } else if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if form.submitting {
        styles::muted_style()
    } else if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    Line::from(vec![
        Span::raw("              ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_end_of_long_input() {
        assert_eq!(tail("a@b.com"), "a@b.com");
        let long = format!("{}@example.com", "x".repeat(30));
        let shown = tail(&long);
        assert_eq!(shown.chars().count(), FIELD_WIDTH);
        assert!(shown.ends_with("@example.com"));
    }

    #[test]
    fn test_button_shows_submitting() {
        let mut form = AuthForm::new();
        form.submitting = true;
        let line = button_line(&form, "Login");
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Login..."));
    }
}
