use ratatui::{layout::Rect, text::Line, Frame};

use dumpdesk_core::models::Customer;
use dumpdesk_core::utils::{
    format_date, format_document, format_optional, format_phone, truncate_string,
};

use super::{field, render_detail, render_list, split};
use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = split(area);

    render_list(frame, app, chunks[0], "Customers", &app.customers, |c| {
        format!(
            "{:<24} {:<26} {}",
            truncate_string(&c.full_name, 24),
            truncate_string(&c.email, 26),
            format_phone(&c.phone_number)
        )
    });

    let selected = app.customers.selected();
    render_detail(
        frame,
        app,
        chunks[1],
        selected.map(|c| c.full_name.clone()),
        selected.map(detail_lines).unwrap_or_default(),
    );
}

fn detail_lines(customer: &Customer) -> Vec<Line<'static>> {
    let document = customer
        .cpf_or_cnpj
        .as_deref()
        .map(format_document)
        .unwrap_or_else(|| "-".to_string());

    vec![
        field("Email", customer.email.clone()),
        field("Phone", format_phone(&customer.phone_number)),
        field("CPF/CNPJ", document),
        field("Address", format_optional(&customer.default_address, "-")),
        field("Notes", format_optional(&customer.additional_info, "-")),
        field(
            "Promotions",
            if customer.receives_promotions { "Yes" } else { "No" },
        ),
        field("Registered", format_date(&customer.registered_at)),
    ]
}
