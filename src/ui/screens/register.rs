use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, RegisterField};
use crate::ui::{centered_rect, field_line, styles};
use crate::validate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.register_form;
    let input = &form.input;
    let focus = form.focus();

    // Live hints, shown the way the server will judge the field
    let username_ok = input.username.is_empty() || validate::is_valid_username(&input.username);
    let password_ok = input.password.is_empty() || validate::is_valid_password(&input.password);
    let match_ok = input.confirm_password.is_empty() || input.password == input.confirm_password;

    let mut lines = vec![
        Line::from(""),
        field_line(
            "First name",
            &input.firstname,
            focus == RegisterField::Firstname,
            false,
        ),
        field_line(
            "Last name",
            &input.lastname,
            focus == RegisterField::Lastname,
            false,
        ),
        field_line(
            "Username",
            &input.username,
            focus == RegisterField::Username,
            false,
        ),
        field_line("Email", &input.email, focus == RegisterField::Email, false),
        field_line(
            "Password",
            &input.password,
            focus == RegisterField::Password,
            true,
        ),
        field_line(
            "Confirm password",
            &input.confirm_password,
            focus == RegisterField::ConfirmPassword,
            true,
        ),
        field_line(
            "Monthly budget",
            &input.budget,
            focus == RegisterField::Budget,
            false,
        ),
        Line::from(""),
    ];

    if !username_ok {
        lines.push(Line::from(Span::styled(
            "  Username: 4-24 characters, must begin with a letter",
            styles::warning_style(),
        )));
    }
    if !password_ok {
        lines.push(Line::from(Span::styled(
            "  Password: 8-24 chars with upper/lower case, a number, and !@#$%",
            styles::warning_style(),
        )));
    }
    if !match_ok {
        lines.push(Line::from(Span::styled(
            "  Passwords do not match",
            styles::warning_style(),
        )));
    }

    if let Some(ref error) = app.error_message {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [Enter] ", styles::help_key_style()),
        Span::raw("create account  "),
        Span::styled("[Tab] ", styles::help_key_style()),
        Span::raw("next field  "),
        Span::styled("[Esc] ", styles::help_key_style()),
        Span::raw("back to login"),
    ]));

    let block = Block::default()
        .title(" Register ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let popup = centered_rect(76, 18, area);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
