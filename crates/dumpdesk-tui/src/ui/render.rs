use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use dumpdesk_core::guard::Route;

use crate::app::{App, AppState, LoginFocus, Tab};
use crate::form::EntityForm;

use super::styles;
use super::tabs::{admins, customers, drivers, home, products};

const LOGO: [&str; 3] = [
    "   ╔╦╗╦ ╦╔╦╗╔═╗╔╦╗╔═╗╔═╗╦╔═",
    "    ║║║ ║║║║╠═╝ ║║║╣ ╚═╗╠╩╗",
    "   ═╩╝╚═╝╩ ╩╩  ═╩╝╚═╝╚═╝╩ ╩",
];

/// Draw whichever tree the session guard selects.
pub fn render(frame: &mut Frame, app: &App) {
    match app.route() {
        Route::Loading => render_loading(frame),
        Route::Public => render_login(frame, app),
        Route::Private => render_console(frame, app),
    }
}

fn logo_lines(indent: &str) -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|row| Line::from(Span::styled(format!("{}{}", indent, row), styles::title_style())))
        .collect()
}

fn render_loading(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    let mut lines = logo_lines("      ");
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "          Checking session...",
        styles::muted_style(),
    )));
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_console(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::EditingForm => {
            if let Some(ref form) = app.form {
                render_form_overlay(frame, form);
            }
        }
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  dumpdesk";
    let user = app
        .session
        .username()
        .map(|u| format!("{}  ", u))
        .unwrap_or_default();
    let help_hint = "[?] Help";
    let used = title.chars().count() + user.chars().count() + help_hint.len() + 4;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(user, styles::highlight_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    // Route on the right, like an address bar
    let path = app.current_tab.page().path();
    let main_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(main_width + path.len() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(path, styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Home => home::render(frame, app, area),
        Tab::Admins => admins::render(frame, app, area),
        Tab::Customers => customers::render(frame, app, area),
        Tab::Drivers => drivers::render(frame, app, area),
        Tab::Products => products::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.current_tab.kind().is_some() {
        "[/]search [n]ew [e]dit [d]elete [L]ogout [q]uit"
    } else {
        "[L]ogout [q]uit"
    };

    let (left_text, left_style) = match app.status.current() {
        Some((message, level)) => (format!(" {} ", message), styles::notify_style(level)),
        None => {
            let text = match app.session.minutes_until_expiry() {
                Some(minutes) => format!(" Session expires in {} min ", minutes),
                None => String::new(),
            };
            (text, styles::muted_style())
        }
    };
    let left_text = if app.is_loading() {
        format!("{} Loading... ", left_text)
    } else {
        left_text
    };

    let right_text = format!(" {} ", shortcuts);
    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 28, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines("       ");
    help_text.push(Line::from(Span::styled(
        format!("              version {}", version),
        styles::muted_style(),
    )));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Navigation", styles::highlight_style())));
    help_text.push(help_line("1-5", "Switch page"));
    help_text.push(help_line("←/→", "Prev/next page"));
    help_text.push(help_line("Tab", "Switch focus (list ↔ detail)"));
    help_text.push(help_line("↑/↓ j/k", "Move selection"));
    help_text.push(help_line("[ / ]", "Previous/next result page"));
    help_text.push(help_line("Esc", "Back to list, clear message"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Actions", styles::highlight_style())));
    help_text.push(help_line("/", "Search"));
    help_text.push(help_line("space", "Mark row for delete"));
    help_text.push(help_line("d", "Delete marked (or selected)"));
    help_text.push(help_line("n", "New record"));
    help_text.push(help_line("e", "Edit selected"));
    help_text.push(help_line("a", "Toggle active / available"));
    help_text.push(help_line("u", "Reload page"));
    help_text.push(help_line("L", "Log out"));
    help_text.push(help_line("q", "Quit"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("       Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// One login form field with a cursor when focused.
fn login_field(label: &'static str, value: String, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("      "),
        Span::styled(label, styles::muted_style()),
        Span::styled(format!("{:<18}{}", value, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines("      ");
    lines.push(Line::from(""));

    lines.push(login_field(
        "Username: [",
        tail(&app.login_username, 18),
        app.login_focus == LoginFocus::Username,
    ));
    let masked = "*".repeat(app.login_password.chars().count().min(18));
    lines.push(login_field(
        "Password: [",
        masked,
        app.login_focus == LoginFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let label = if app.login_in_progress {
        " Signing in "
    } else if button_focused {
        " ▶ Sign in ◀ "
    } else {
        "   Sign in   "
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("           ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Admin sign in ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// The last `width` chars of `text`, so the cursor end stays visible.
fn tail(text: &str, width: usize) -> String {
    let chars = text.chars().count();
    text.chars().skip(chars.saturating_sub(width)).collect()
}

const FORM_LABEL_WIDTH: usize = 24;
const FORM_VALUE_WIDTH: usize = 34;

fn render_form_overlay(frame: &mut Frame, form: &EntityForm) {
    let extra = if form.error.is_some() { 7 } else { 5 };
    let width = (FORM_LABEL_WIDTH + FORM_VALUE_WIDTH + 6) as u16;
    let area = centered_rect_fixed(width, form.fields.len() as u16 + extra, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let style = if focused {
            styles::selected_style()
        } else if field.locked {
            styles::muted_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused && field.accepts_text() { "▌" } else { "" };
        let marker = if field.required { "*" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:>width$}{} ", field.label, marker, width = FORM_LABEL_WIDTH),
                styles::muted_style(),
            ),
            Span::styled(
                format!("{}{}", tail(&field.display(), FORM_VALUE_WIDTH - 1), cursor),
                style,
            ),
        ]));
    }

    lines.push(Line::from(""));
    let label = if form.submitting {
        " Saving "
    } else if form.button_focused() {
        " ▶ Save ◀ "
    } else {
        "   Save   "
    };
    let button_style = if form.button_focused() {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(FORM_LABEL_WIDTH + 2)),
        Span::raw("["),
        Span::styled(label, button_style),
        Span::raw("]"),
        Span::styled("  Esc to cancel", styles::muted_style()),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(form.title())
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_confirm(frame: &mut Frame, question: String, action: &'static str) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", question), styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(format!(" to {}, ", action), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    render_confirm(frame, "Are you sure you want to quit?".to_string(), "quit");
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let label = app
        .current_tab
        .kind()
        .map(|k| k.label())
        .unwrap_or("record");
    let count = app.pending_delete.len();
    let question = if count == 1 {
        format!("Delete this {}?", label)
    } else {
        format!("Delete {} {}s?", count, label)
    };
    render_confirm(frame, question, "delete");
}
