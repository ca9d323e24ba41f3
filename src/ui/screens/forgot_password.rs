use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::{centered_rect, field_line, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::raw(
            "  Enter your email address and we will send you a reset link.",
        )),
        Line::from(""),
        field_line("Email", &app.forgot_email, true, false),
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
        Span::raw("send reset link  "),
        Span::styled("[Esc] ", styles::help_key_style()),
        Span::raw("back to login"),
    ]));

    let block = Block::default()
        .title(" Forgot Password ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let popup = centered_rect(72, 11, area);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
