//! Keyboard input handling for the TUI.
//!
//! This module translates keyboard events into application state changes.
//! Plain characters always go to the focused form field; list operations and
//! navigation use arrow, function, and Ctrl-modified keys so they never
//! collide with typing.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, Screen};

/// Handle a keyboard event. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Confirmation overlays swallow everything else first
    match app.state {
        AppState::ConfirmingQuit => {
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
        AppState::ConfirmingDeleteTransaction => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.confirm_delete_transaction().await;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDeleteAccount => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.confirm_delete_account().await;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        _ => {}
    }

    // Global shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => {
                app.state = AppState::ConfirmingQuit;
                return Ok(false);
            }
            KeyCode::Char('l') if app.screen.is_protected() => {
                app.logout().await;
                return Ok(false);
            }
            _ => {}
        }
    }

    // Screen switching for the authenticated area
    if app.auth.is_authenticated() {
        match key.code {
            KeyCode::F(1) => {
                app.navigate(Screen::Transactions);
                return Ok(false);
            }
            KeyCode::F(2) => {
                app.navigate(Screen::BudgetOverview);
                return Ok(false);
            }
            KeyCode::F(3) => {
                app.navigate(Screen::Profile);
                return Ok(false);
            }
            _ => {}
        }
    }

    match app.screen {
        Screen::Login => handle_login(app, key).await,
        Screen::Register => handle_register(app, key).await,
        Screen::ForgotPassword => handle_forgot_password(app, key).await,
        Screen::ResetPassword => handle_reset_password(app, key).await,
        Screen::Transactions => handle_transactions(app, key).await,
        Screen::BudgetOverview => handle_budget(app, key).await,
        Screen::Profile => handle_profile(app, key).await,
    }

    Ok(false)
}

async fn handle_login(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => {
            app.login_form.focus = Some(app.login_form.focus().next());
        }
        KeyCode::Enter => {
            if app.login_form.focus() == crate::app::LoginField::GoogleCredential {
                app.submit_google_login().await;
            } else {
                app.submit_login().await;
            }
        }
        KeyCode::F(2) => app.navigate(Screen::Register),
        KeyCode::F(3) => app.navigate(Screen::ForgotPassword),
        KeyCode::F(4) => app.navigate(Screen::ResetPassword),
        KeyCode::Backspace => {
            app.login_form.field_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login_form.field_mut().push(c);
        }
        _ => {}
    }
}

async fn handle_register(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => {
            app.register_form.focus = Some(app.register_form.focus().next());
        }
        KeyCode::Enter => app.submit_register().await,
        KeyCode::Esc => app.navigate(Screen::Login),
        KeyCode::Backspace => {
            app.register_form.field_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.register_form.field_mut().push(c);
        }
        _ => {}
    }
}

async fn handle_forgot_password(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_forgot_password().await,
        KeyCode::Esc => app.navigate(Screen::Login),
        KeyCode::Backspace => {
            app.forgot_email.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.forgot_email.push(c);
        }
        _ => {}
    }
}

async fn handle_reset_password(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => {
            app.reset_form.focus = Some(app.reset_form.focus().next());
        }
        KeyCode::Enter => app.submit_reset_password().await,
        KeyCode::Esc => app.navigate(Screen::Login),
        KeyCode::Backspace => {
            app.reset_form.field_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.reset_form.field_mut().push(c);
        }
        _ => {}
    }
}

async fn handle_transactions(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('t') if ctrl => {
            app.entry_form.kind = app.entry_form.kind.toggled();
        }
        KeyCode::Char('f') if ctrl => app.cycle_filter(),
        KeyCode::Char('e') if ctrl => app.start_edit_selected(),
        KeyCode::Char('x') if ctrl => app.export_transactions(),
        KeyCode::Delete => app.request_delete_selected(),
        KeyCode::Tab => {
            app.entry_form.focus = Some(app.entry_form.focus().next());
        }
        KeyCode::Enter => app.submit_entry().await,
        KeyCode::Esc => app.entry_form.clear(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Left | KeyCode::PageUp => app.move_page(-1),
        KeyCode::Right | KeyCode::PageDown => app.move_page(1),
        KeyCode::Backspace => {
            app.entry_form.field_mut().pop();
        }
        KeyCode::Char(c) if !ctrl => {
            app.entry_form.field_mut().push(c);
        }
        _ => {}
    }
}

async fn handle_budget(app: &mut App, key: KeyEvent) {
    if app.budget_form.editing {
        match key.code {
            KeyCode::Enter => app.submit_budget().await,
            KeyCode::Esc => {
                app.budget_form.editing = false;
                if let Some(user) = app.auth.user() {
                    app.budget_form.value = format!("{:.2}", user.budget);
                }
            }
            KeyCode::Backspace => {
                app.budget_form.value.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.budget_form.value.push(c);
            }
            _ => {}
        }
        return;
    }

    if key.code == KeyCode::Char('e') {
        app.budget_form.editing = true;
    }
}

async fn handle_profile(app: &mut App, key: KeyEvent) {
    if app.profile_form.editing {
        match key.code {
            KeyCode::Tab => {
                app.profile_form.focus = Some(app.profile_form.focus().next());
            }
            KeyCode::Enter => app.submit_profile().await,
            KeyCode::Esc => app.profile_form = Default::default(),
            KeyCode::Backspace => {
                app.profile_form.field_mut().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.profile_form.field_mut().push(c);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('e') => app.start_profile_edit(),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_delete_account();
        }
        _ => {}
    }
}
