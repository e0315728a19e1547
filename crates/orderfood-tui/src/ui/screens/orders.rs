use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use orderfood_core::models::Order;
use orderfood_core::utils::format::truncate_string;

use super::{render_message, render_pending};
use crate::app::{App, Loadable};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if render_pending(frame, area, "My Orders", &app.orders) {
        return;
    }
    let Loadable::Loaded(orders) = &app.orders else {
        return;
    };

    if orders.is_empty() {
        render_message(
            frame,
            area,
            "My Orders",
            vec![Line::from(Span::styled(
                "You haven't placed any orders yet.",
                styles::muted_style(),
            ))],
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_order_list(frame, app, orders, chunks[0]);
    render_order_detail(frame, app.selected_order(), chunks[1]);
}

fn render_order_list(frame: &mut Frame, app: &App, orders: &[Order], area: Rect) {
    let rows: Vec<ListItem> = orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let line = Line::from(vec![
                Span::raw(format!(" #{:<9}", order.short_id())),
                Span::styled(format!("{:<10}", order.status.to_string()), styles::order_status_style(&order.status)),
                Span::styled(format!("{:>9}", order.total_amount.to_string()), styles::price_style()),
            ]);
            let style = if i == app.orders_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" My Orders ({}) ", orders.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let mut state = ListState::default();
    state.select(Some(app.orders_selection));
    frame.render_stateful_widget(List::new(rows).block(block), area, &mut state);
}

fn render_order_detail(frame: &mut Frame, order: Option<&Order>, area: Rect) {
    let (title, lines) = match order {
        Some(order) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Placed: ", styles::highlight_style()),
                    Span::raw(order.formatted_date()),
                ]),
                Line::from(vec![
                    Span::styled("Status: ", styles::highlight_style()),
                    Span::styled(order.status.to_string(), styles::order_status_style(&order.status)),
                ]),
                Line::from(""),
            ];

            for line in &order.items {
                lines.push(Line::from(vec![
                    Span::raw(format!(
                        "  {:>2} x {:<24}",
                        line.quantity,
                        truncate_string(&line.item.name, 24)
                    )),
                    Span::styled(format!("{:>9}", line.line_total().to_string()), styles::muted_style()),
                ]));
            }
            if order.items.is_empty() {
                lines.push(Line::from(Span::styled("  No line items", styles::muted_style())));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Total: ", styles::highlight_style()),
                Span::styled(order.total_amount.to_string(), styles::price_style()),
            ]));

            (format!(" Order #{} ", order.short_id()), lines)
        }
        None => (
            " No Order Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select an order from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
