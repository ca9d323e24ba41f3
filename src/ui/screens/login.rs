use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginField};
use crate::ui::{centered_rect, field_line, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login_form;
    let focus = form.focus();

    let mut lines = vec![
        Line::from(""),
        field_line("Email", &form.email, focus == LoginField::Email, false),
        field_line(
            "Password",
            &form.password,
            focus == LoginField::Password,
            true,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "                 -------- OR --------",
            styles::muted_style(),
        )),
        field_line(
            "Google credential",
            &crate::ui::truncate(&form.google_credential, 40),
            focus == LoginField::GoogleCredential,
            false,
        ),
        Line::from(""),
    ];

    if let Some(ref error) = app.error_message {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("  [Enter] ", styles::help_key_style()),
        Span::raw("sign in  "),
        Span::styled("[Tab] ", styles::help_key_style()),
        Span::raw("next field  "),
        Span::styled("[F2] ", styles::help_key_style()),
        Span::raw("register  "),
        Span::styled("[F3] ", styles::help_key_style()),
        Span::raw("forgot password  "),
        Span::styled("[F4] ", styles::help_key_style()),
        Span::raw("reset token"),
    ]));

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let popup = centered_rect(72, 14, area);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
