use ratatui::{
    layout::Rect,
    text::{Line, Span},
    Frame,
};

use dumpdesk_core::models::Product;
use dumpdesk_core::utils::{format_optional, truncate_string};

use super::{field, field_styled, render_detail, render_list, split};
use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = split(area);

    render_list(frame, app, chunks[0], "Products", &app.products, |p| {
        format!("{:<36} {}", truncate_string(&p.name, 36), p.status_display())
    });

    let selected = app.products.selected();
    render_detail(
        frame,
        app,
        chunks[1],
        selected.map(|p| p.name.clone()),
        selected.map(detail_lines).unwrap_or_default(),
    );
}

fn detail_lines(product: &Product) -> Vec<Line<'static>> {
    let mut lines = vec![
        field_styled(
            "Status",
            product.status_display(),
            styles::flag_style(product.is_active),
        ),
        field("Picture", format_optional(&product.product_picture_url, "-")),
        Line::from(""),
        Line::from(Span::styled("Description", styles::title_style())),
    ];
    if product.description.trim().is_empty() {
        lines.push(Line::from(Span::styled("No description", styles::muted_style())));
    } else {
        lines.extend(product.description.lines().map(|l| Line::from(l.to_string())));
    }
    lines
}
