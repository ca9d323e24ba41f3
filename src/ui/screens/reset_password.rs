use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, ResetField};
use crate::ui::{centered_rect, field_line, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.reset_form;
    let focus = form.focus();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::raw(
            "  Paste the token from your reset email, then choose a new password.",
        )),
        Line::from(""),
        field_line(
            "Reset token",
            &crate::ui::truncate(&form.token, 40),
            focus == ResetField::Token,
            false,
        ),
        field_line(
            "New password",
            &form.password,
            focus == ResetField::Password,
            true,
        ),
        field_line(
            "Confirm password",
            &form.confirm_password,
            focus == ResetField::ConfirmPassword,
            true,
        ),
        Line::from(""),
    ];

    if let Some(ref message) = app.status_message {
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            styles::success_style(),
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
        Span::raw("reset password  "),
        Span::styled("[Tab] ", styles::help_key_style()),
        Span::raw("next field  "),
        Span::styled("[Esc] ", styles::help_key_style()),
        Span::raw("back to login"),
    ]));

    let block = Block::default()
        .title(" Reset Password ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let popup = centered_rect(76, 13, area);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
