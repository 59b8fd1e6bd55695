use ratatui::{layout::Rect, text::Line, Frame};

use dumpdesk_core::models::Driver;
use dumpdesk_core::utils::{
    format_currency, format_date, format_document, format_optional, format_phone,
    truncate_string,
};

use super::{field, field_styled, render_detail, render_list, split};
use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = split(area);

    render_list(frame, app, chunks[0], "Drivers", &app.drivers, |d| {
        format!(
            "{:<24} {:<28} {}",
            truncate_string(&d.full_name, 24),
            truncate_string(&d.vehicle_display(), 28),
            d.availability_display()
        )
    });

    let selected = app.drivers.selected();
    render_detail(
        frame,
        app,
        chunks[1],
        selected.map(|d| d.full_name.clone()),
        selected.map(detail_lines).unwrap_or_default(),
    );
}

fn detail_lines(driver: &Driver) -> Vec<Line<'static>> {
    let pix = match (&driver.pix_key, driver.pix_key_type) {
        (Some(key), Some(kind)) => format!("{} ({})", key, kind),
        (Some(key), None) => key.clone(),
        _ => "-".to_string(),
    };

    vec![
        field("Email", driver.email.clone()),
        field("Phone", format_phone(&driver.phone_number)),
        field(
            "CPF",
            driver
                .cpf
                .as_deref()
                .map(format_document)
                .unwrap_or_else(|| "-".to_string()),
        ),
        field("CNH", format_optional(&driver.cnh_number, "-")),
        field("CNH expires", format_date(&driver.license_expiration)),
        field("Vehicle", driver.vehicle_display()),
        field("Type", format_optional(&driver.vehicle_type, "-")),
        field_styled(
            "Status",
            driver.availability_display(),
            styles::flag_style(driver.is_available),
        ),
        field("PIX", pix),
        field(
            "Credit",
            driver
                .credit_balance
                .map(format_currency)
                .unwrap_or_else(|| "-".to_string()),
        ),
        field("Registered", format_date(&driver.registered_at)),
    ]
}
