use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::field;
use crate::app::{App, Tab};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let username = app.session.username().unwrap_or_else(|| "admin".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Welcome back, {}", username),
            styles::title_style(),
        )),
        Line::from(""),
        field("Role", app.session.role().unwrap_or_else(|| "-".to_string())),
        field(
            "Session",
            match app.session.minutes_until_expiry() {
                Some(minutes) => format!("expires in {} min", minutes),
                None => "-".to_string(),
            },
        ),
        field("Backend", app.api.base_url().to_string()),
        Line::from(""),
        Line::from(Span::styled("Records", styles::highlight_style())),
    ];

    let counts = [
        (Tab::Admins, app.admins.loaded, app.admins.page.total_records),
        (Tab::Customers, app.customers.loaded, app.customers.page.total_records),
        (Tab::Drivers, app.drivers.loaded, app.drivers.page.total_records),
        (Tab::Products, app.products.loaded, app.products.page.total_records),
    ];
    for (i, (tab, loaded, total)) in counts.iter().enumerate() {
        let value = if *loaded {
            total.to_string()
        } else {
            "not loaded".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 2), styles::help_key_style()),
            Span::styled(format!("{:<12}", tab.title()), styles::help_desc_style()),
            Span::styled(value, styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" Home ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
