use ratatui::{layout::Rect, text::Line, Frame};

use dumpdesk_core::models::Admin;
use dumpdesk_core::utils::{format_date, format_document, format_optional, truncate_string};

use super::{field, field_styled, render_detail, render_list, split};
use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = split(area);

    render_list(frame, app, chunks[0], "Admins", &app.admins, |admin| {
        format!(
            "{:<24} {:<28} {}",
            truncate_string(&admin.full_name, 24),
            truncate_string(&admin.email, 28),
            admin.status_display()
        )
    });

    let selected = app.admins.selected();
    render_detail(
        frame,
        app,
        chunks[1],
        selected.map(|a| a.full_name.clone()),
        selected.map(detail_lines).unwrap_or_default(),
    );
}

fn detail_lines(admin: &Admin) -> Vec<Line<'static>> {
    vec![
        field("Email", admin.email.clone()),
        field("CPF", format_document(&admin.cpf)),
        field_styled(
            "Status",
            admin.status_display(),
            styles::flag_style(admin.is_active),
        ),
        field("Created", format_date(&admin.created_at)),
        field("Picture", format_optional(&admin.profile_picture_url, "-")),
    ]
}
