use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Screen};

use super::screens::{
    budget, forgot_password, login, profile, register, reset_password, transactions,
};
use super::{centered_rect, styles};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title bar
            Constraint::Min(10),   // main content
            Constraint::Length(2), // status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    match app.state {
        AppState::ConfirmingDeleteTransaction => render_confirm_overlay(
            frame,
            "Delete this transaction?",
            "This cannot be undone.",
        ),
        AppState::ConfirmingDeleteAccount => render_confirm_overlay(
            frame,
            "Permanently delete your account?",
            "All your data, including transactions, will be removed.",
        ),
        AppState::ConfirmingQuit => {
            render_confirm_overlay(frame, "Quit Spendbook?", "")
        }
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Spendbook";

    let mut spans = vec![Span::styled(title, styles::title_style())];

    if app.auth.is_authenticated() {
        let tabs = [
            ("[F1] Expenses", Screen::Transactions),
            ("[F2] Budget", Screen::BudgetOverview),
            ("[F3] Profile", Screen::Profile),
        ];
        spans.push(Span::raw("    "));
        for (i, (label, screen)) in tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            if app.screen == *screen {
                spans.push(Span::styled(
                    *label,
                    styles::title_style(),
                ));
            } else {
                spans.push(Span::styled(*label, styles::muted_style()));
            }
        }
    } else {
        spans.push(Span::styled(
            format!("    {}", app.screen.title()),
            styles::muted_style(),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.screen {
        Screen::Login => login::render(frame, app, area),
        Screen::Register => register::render(frame, app, area),
        Screen::ForgotPassword => forgot_password::render(frame, app, area),
        Screen::ResetPassword => reset_password::render(frame, app, area),
        Screen::Transactions => transactions::render(frame, app, area),
        Screen::BudgetOverview => budget::render(frame, app, area),
        Screen::Profile => profile::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.screen {
        Screen::Transactions => {
            "Ctrl+F filter | Ctrl+E edit | Del delete | Ctrl+X export | Ctrl+L logout | Ctrl+Q quit"
        }
        Screen::BudgetOverview | Screen::Profile => "Ctrl+L logout | Ctrl+Q quit",
        _ => "Ctrl+Q quit",
    };

    let left_text = if let Some(ref msg) = app.error_message {
        format!(" {} ", msg)
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        String::new()
    };

    let right_text = format!(" {} ", shortcuts);
    let padding = (area.width as usize).saturating_sub(left_text.len() + right_text.len());

    let line = Line::from(vec![
        if app.error_message.is_some() {
            Span::styled(left_text, styles::error_style())
        } else {
            Span::raw(left_text)
        },
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

fn render_confirm_overlay(frame: &mut Frame, question: &str, detail: &str) {
    let area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from(""), Line::from(Span::raw(format!("  {}", question)))];
    if !detail.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", detail),
            styles::muted_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [y] ", styles::help_key_style()),
        Span::raw("yes  "),
        Span::styled("[n] ", styles::help_key_style()),
        Span::raw("no"),
    ]));

    let block = Block::default()
        .title(" Confirm ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
