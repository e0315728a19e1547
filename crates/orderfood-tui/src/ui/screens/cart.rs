use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use orderfood_core::utils::format::{pluralize, truncate_string};

use super::{render_message, render_pending};
use crate::app::{App, Loadable};
use crate::ui::styles;

const NAME_WIDTH: usize = 28;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if render_pending(frame, area, "Your Cart", &app.cart) {
        return;
    }
    let Loadable::Loaded(cart) = &app.cart else {
        return;
    };

    if cart.is_empty() {
        render_message(
            frame,
            area,
            "Your Cart",
            vec![
                Line::from(Span::styled("Your cart is empty.", styles::muted_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("[1]", styles::help_key_style()),
                    Span::styled(" Browse the menu", styles::muted_style()),
                ]),
            ],
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let rows: Vec<ListItem> = cart
        .items
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = Line::from(vec![
                Span::raw(format!(
                    " {:<width$} ",
                    truncate_string(&line.item.name, NAME_WIDTH),
                    width = NAME_WIDTH
                )),
                Span::styled(
                    format!("{} x {:>3}", line.item.price, line.quantity),
                    styles::muted_style(),
                ),
                Span::raw("   "),
                Span::styled(format!("{:>9}", line.line_total().to_string()), styles::price_style()),
            ]);
            let style = if i == app.cart_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(
            " Your Cart ({}) ",
            pluralize(cart.item_count(), "item", "items")
        ))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    state.select(Some(app.cart_selection));
    frame.render_stateful_widget(List::new(rows).block(block), chunks[0], &mut state);

    let action = if app.checking_out {
        Span::styled("Placing order...", styles::muted_style())
    } else {
        Span::styled("[p] Checkout", styles::help_key_style())
    };
    let summary = vec![
        Line::from(vec![
            Span::styled(" Total: ", styles::highlight_style()),
            Span::styled(cart.total().to_string(), styles::price_style()),
        ]),
        Line::from(vec![Span::raw(" "), action]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(summary).block(block), chunks[1]);
}
