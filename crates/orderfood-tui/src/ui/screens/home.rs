use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use orderfood_core::utils::format::{pluralize, truncate_string};

use super::{render_message, render_pending};
use crate::app::App;
use crate::ui::styles;

const NAME_WIDTH: usize = 28;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.session.is_authenticated() {
        render_welcome(frame, area);
        return;
    }
    if render_pending(frame, area, "Menu", &app.menu) {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category filter
            Constraint::Min(5),    // Items
            Constraint::Length(6), // Selected item
        ])
        .split(area);

    render_categories(frame, app, chunks[0]);
    render_items(frame, app, chunks[1]);
    render_item_detail(frame, app, chunks[2]);
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    render_message(
        frame,
        area,
        "Welcome",
        vec![
            Line::from(Span::styled("Welcome to OrderFood", styles::title_style())),
            Line::from(""),
            Line::from("Log in or create an account to browse the menu."),
            Line::from(""),
            Line::from(vec![
                Span::styled("[l]", styles::help_key_style()),
                Span::styled(" Login    ", styles::muted_style()),
                Span::styled("[r]", styles::help_key_style()),
                Span::styled(" Register", styles::muted_style()),
            ]),
        ],
    );
}

fn render_categories(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, filter) in app.category_filters().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let style = if i == app.category_index {
            styles::nav_style(true)
        } else {
            styles::muted_style()
        };
        spans.push(Span::styled(filter.label().to_string(), style));
    }

    let block = Block::default()
        .title(" Categories [←/→] ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_items(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.visible_items();
    let title = format!(" {} ({}) ", app.current_filter().label(), items.len());

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "  No items in this category",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let stock_style = if item.in_stock() {
                styles::muted_style()
            } else {
                styles::error_style()
            };
            let line = Line::from(vec![
                Span::raw(format!(
                    " {:<width$} ",
                    truncate_string(&item.name, NAME_WIDTH),
                    width = NAME_WIDTH
                )),
                Span::styled(format!("{:>9}", item.price.to_string()), styles::price_style()),
                Span::raw("  "),
                Span::styled(item.stock_label(), stock_style),
            ]);

            let style = if i == app.menu_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.menu_selection));

    frame.render_stateful_widget(List::new(rows).block(block), area, &mut state);
}

fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(item) = app.selected_item() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(item.category.name.clone(), styles::highlight_style()),
        Span::styled("  ·  ", styles::muted_style()),
        Span::styled(item.price.to_string(), styles::price_style()),
        Span::styled("  ·  ", styles::muted_style()),
        Span::raw(item.stock_label()),
    ])];
    if let Some(ref description) = item.description {
        lines.push(Line::from(description.clone()));
    }
    let action = if item.in_stock() {
        Span::styled("[Enter] Add to cart", styles::help_key_style())
    } else {
        Span::styled("Out of Stock", styles::error_style())
    };
    lines.push(Line::from(vec![
        action,
        Span::styled(
            format!("   {} listed", pluralize(app.list_len() as u32, "item", "items")),
            styles::muted_style(),
        ),
    ]));

    let block = Block::default()
        .title(format!(" {} ", item.name))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
