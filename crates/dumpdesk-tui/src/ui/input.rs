//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Which handler runs depends on the route the
//! session guard selects.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use dumpdesk_core::guard::Route;

use crate::app::{
    can_add_password_char, can_add_search_char, can_add_username_char, App, AppState, Focus,
    LoginFocus, Tab, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.route() {
        Route::Loading => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            Ok(false)
        }
        Route::Public => handle_login_input(app, key).await,
        Route::Private => handle_console_input(app, key),
    }
}

fn handle_console_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::EditingForm) {
        handle_form_input(app, key);
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            app.switch_tab(Tab::ALL[index]);
        }
        KeyCode::Left => app.switch_tab(app.current_tab.prev()),
        KeyCode::Right => app.switch_tab(app.current_tab.next()),
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Esc => {
            app.focus = Focus::List;
            app.status.clear();
        }
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('u') => app.refresh_current_tab(),
        _ => {
            if app.current_tab.kind().is_some() {
                handle_list_input(app, key);
            }
        }
    }

    Ok(false)
}

/// Keys for the entity list tabs.
fn handle_list_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('[') => app.change_page(false),
        KeyCode::Char(']') => app.change_page(true),
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Char(' ') => {
            app.toggle_mark();
            app.select_next(1);
        }
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('a') => app.toggle_selected(),
        KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Enter => app.focus = Focus::Detail,
        _ => {}
    }
}

/// Keys for the create/edit form overlay.
fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.cancel_form();
        return;
    }
    let Some(form) = app.form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    if form.submitting {
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter if form.button_focused() => app.submit_form(),
        KeyCode::Enter => form.focus_next(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Char(' ') if form.focused_is_toggle() => form.cycle(true),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Drop the search entirely
            app.state = AppState::Normal;
            app.search_query.clear();
            app.apply_search();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.apply_search();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            if can_add_search_char(app.search_query.chars().count(), c) {
                app.search_query.push(c);
            }
        }
        _ => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if app.login_in_progress {
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            // The session status change triggers the first page load
            LoginFocus::Password | LoginFocus::Button => app.attempt_login().await,
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.chars().count(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}
