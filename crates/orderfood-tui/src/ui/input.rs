//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use orderfood_core::auth::RouteDecision;
use orderfood_core::Route;

use crate::app::{App, AppState, FormFocus, FormKind, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    let rendering = app.route_decision() == RouteDecision::Render;

    // Forms take typed characters before any global shortcut
    if rendering {
        let form = match app.nav.current() {
            Route::Login => Some(FormKind::Login),
            Route::Register => Some(FormKind::Register),
            _ => None,
        };
        if let Some(kind) = form {
            if handle_form_input(app, kind, key) {
                return false;
            }
        }
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        _ => {}
    }

    // Nothing else until the session is known
    if !app.session.is_resolved() {
        return false;
    }

    let logged_in = app.session.is_authenticated();
    match key.code {
        KeyCode::Char('1') | KeyCode::Char('h') => app.navigate(Route::Home),
        KeyCode::Char('2') | KeyCode::Char('c') => app.navigate(Route::Cart),
        KeyCode::Char('3') | KeyCode::Char('o') => app.navigate(Route::Orders),
        KeyCode::Char('l') if !logged_in => app.navigate(Route::Login),
        KeyCode::Char('r') if !logged_in => app.navigate(Route::Register),
        KeyCode::Char('x') if logged_in => app.logout(),
        KeyCode::Char('u') => app.refresh_current(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        _ if rendering => match app.nav.current() {
            Route::Home => handle_home_input(app, key),
            Route::Cart => handle_cart_input(app, key),
            Route::Orders => handle_list_input(app, key),
            Route::Login | Route::Register | Route::NotFound => {}
        },
        _ => {}
    }
    false
}

/// Handle a key on the login or register form. Returns true when the form
/// consumed it.
fn handle_form_input(app: &mut App, kind: FormKind, key: KeyEvent) -> bool {
    let focus = app.form(kind).focus;
    let on_field = matches!(focus, FormFocus::Email | FormFocus::Password);

    match key.code {
        KeyCode::Down | KeyCode::Tab => {
            let form = app.form_mut(kind);
            form.focus = form.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            let form = app.form_mut(kind);
            form.focus = form.focus.prev();
        }
        KeyCode::Enter => match focus {
            FormFocus::Email | FormFocus::Password => {
                let form = app.form_mut(kind);
                form.focus = form.focus.next();
            }
            FormFocus::Button => app.submit_form(kind),
            FormFocus::SwitchLink => app.navigate(kind.other().route()),
        },
        KeyCode::Backspace if on_field => app.form_mut(kind).backspace(),
        KeyCode::Char(c) if on_field => app.form_mut(kind).push_char(c),
        // Esc, and shortcuts typed while on the button or link, fall through
        _ => return false,
    }
    true
}

fn handle_home_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => app.cycle_category(false),
        KeyCode::Right => app.cycle_category(true),
        KeyCode::Enter | KeyCode::Char('a') => app.add_selected_to_cart(),
        _ => handle_list_input(app, key),
    }
}

fn handle_cart_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('p') | KeyCode::Enter => app.checkout(),
        _ => handle_list_input(app, key),
    }
}

/// Up/down/page movement shared by every list screen
fn handle_list_input(app: &mut App, key: KeyEvent) {
    let page = PAGE_SCROLL_SIZE as isize;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(page),
        KeyCode::PageUp => app.move_selection(-page),
        KeyCode::Home => app.move_selection(-(app.list_len() as isize)),
        KeyCode::End => app.move_selection(app.list_len() as isize),
        _ => {}
    }
}
