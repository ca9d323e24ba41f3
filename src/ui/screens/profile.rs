use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, ProfileField};
use crate::ui::{centered_rect, field_line, format_money, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from("")];

    if app.profile_form.editing {
        let form = &app.profile_form;
        let focus = form.focus();
        lines.push(field_line(
            "First name",
            &form.firstname,
            focus == ProfileField::Firstname,
            false,
        ));
        lines.push(field_line(
            "Last name",
            &form.lastname,
            focus == ProfileField::Lastname,
            false,
        ));
        lines.push(field_line(
            "Username",
            &form.username,
            focus == ProfileField::Username,
            false,
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  [Enter] ", styles::help_key_style()),
            Span::raw("save  "),
            Span::styled("[Tab] ", styles::help_key_style()),
            Span::raw("next field  "),
            Span::styled("[Esc] ", styles::help_key_style()),
            Span::raw("cancel"),
        ]));
    } else if let Some(user) = app.auth.user() {
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("    {:<16}", label), styles::muted_style()),
                Span::raw(value),
            ])
        };
        lines.push(row("First name:", user.firstname.clone()));
        lines.push(row("Last name:", user.lastname.clone()));
        lines.push(row("Username:", user.username.clone()));
        lines.push(row("Email:", user.email.clone()));
        lines.push(row("Monthly budget:", format_money(user.budget)));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  [e] ", styles::help_key_style()),
            Span::raw("edit profile  "),
            Span::styled("[Ctrl+D] ", styles::help_key_style()),
            Span::styled("delete account", styles::error_style()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Deleting your account removes all of your data, including transactions.",
            styles::muted_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  Loading...",
            styles::muted_style(),
        )));
    }

    if let Some(ref message) = app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", message),
            styles::success_style(),
        )));
    }
    if let Some(ref error) = app.error_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let popup = centered_rect(78, 15, area);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
