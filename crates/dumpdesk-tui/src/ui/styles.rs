//! Colours and text styles.

use ratatui::style::{Color, Modifier, Style};

use dumpdesk_core::auth::NotifyLevel;

// Palette: safety orange on slate, like the trucks
const BRAND: Color = Color::Rgb(240, 138, 36);
const OK: Color = Color::Rgb(110, 176, 90);
const WARN: Color = Color::Rgb(226, 192, 80);
const FAIL: Color = Color::Rgb(214, 74, 64);
const DIM: Color = Color::Rgb(122, 128, 138);
const TEXT: Color = Color::Rgb(230, 230, 226);
const ROW_BG: Color = Color::Rgb(54, 58, 70);
const BAR_BG: Color = Color::Rgb(30, 33, 40);

fn fg(color: Color) -> Style {
    Style::new().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

pub fn title_style() -> Style {
    bold(BRAND)
}

pub fn selected_style() -> Style {
    bold(TEXT).bg(ROW_BG)
}

pub fn list_item_style() -> Style {
    fg(TEXT)
}

/// Rows marked for bulk delete.
pub fn marked_style() -> Style {
    bold(WARN)
}

pub fn muted_style() -> Style {
    fg(DIM)
}

pub fn highlight_style() -> Style {
    fg(WARN)
}

pub fn success_style() -> Style {
    fg(OK)
}

pub fn error_style() -> Style {
    fg(FAIL)
}

/// Active/available flags: green when on, red when off.
pub fn flag_style(on: bool) -> Style {
    if on {
        success_style()
    } else {
        error_style()
    }
}

pub fn notify_style(level: NotifyLevel) -> Style {
    match level {
        NotifyLevel::Success => bold(OK),
        NotifyLevel::Error => bold(FAIL),
    }
}

pub fn tab_style(selected: bool) -> Style {
    match selected {
        true => bold(BRAND).add_modifier(Modifier::UNDERLINED),
        false => fg(TEXT),
    }
}

pub fn border_style(focused: bool) -> Style {
    fg(if focused { BRAND } else { DIM })
}

pub fn search_style() -> Style {
    bold(WARN)
}

pub fn status_bar_style() -> Style {
    fg(TEXT).bg(BAR_BG)
}

pub fn help_key_style() -> Style {
    bold(BRAND)
}

pub fn help_desc_style() -> Style {
    fg(TEXT)
}
