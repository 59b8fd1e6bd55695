//! Page content for each console tab.
//!
//! Entity tabs share one layout: a paged list on the left and a detail panel
//! for the selected row on the right.

pub mod admins;
pub mod customers;
pub mod drivers;
pub mod home;
pub mod products;

use std::rc::Rc;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, EntityList, Focus, Record};
use crate::ui::styles;

/// Width of the label column in detail panels.
const LABEL_WIDTH: usize = 14;

fn split(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area)
}

/// Render the list panel for `list`. `row` formats one row.
fn render_list<T, F>(frame: &mut Frame, app: &App, area: Rect, title: &str, list: &EntityList<T>, row: F)
where
    T: Record,
    F: Fn(&T) -> String,
{
    let focused = app.focus == Focus::List;

    let mut block = Block::default()
        .title(format!(" {} ({}) ", title, list.page.total_records))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused))
        .title_bottom(Line::from(Span::styled(
            format!(" page {}/{} ", list.page.page_number, list.page.total_pages()),
            styles::muted_style(),
        )));

    if app.state == AppState::Searching {
        block = block.title(Line::from(Span::styled(
            format!(" /{}▌ ", app.search_query),
            styles::search_style(),
        )));
    } else if !list.request.search.is_empty() {
        block = block.title(Line::from(Span::styled(
            format!(" search: {} ", list.request.search),
            styles::search_style(),
        )));
    }

    if list.items().is_empty() {
        let message = if list.loading || !list.loaded {
            "Loading..."
        } else {
            "No records"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = list
        .items()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let marked = list.is_marked(record.id());
            let mark = if marked { "● " } else { "  " };
            let style = if i == list.selection {
                styles::selected_style()
            } else if marked {
                styles::marked_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(format!("{}{}", mark, row(record)))).style(style)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(list.selection));

    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

/// Render the detail panel, or a hint when nothing is selected.
fn render_detail(frame: &mut Frame, app: &App, area: Rect, title: Option<String>, lines: Vec<Line>) {
    let focused = app.focus == Focus::Detail;
    let (title, lines) = match title {
        Some(title) => (format!(" {} ", title), lines),
        None => (
            " Nothing selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a row from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// "Label:       value" detail line.
fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    field_styled(label, value, styles::list_item_style())
}

fn field_styled(label: &str, value: impl Into<String>, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", format!("{}:", label), width = LABEL_WIDTH),
            styles::highlight_style(),
        ),
        Span::styled(value.into(), style),
    ])
}
