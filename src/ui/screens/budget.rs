use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::summary;
use crate::ui::{centered_rect, field_line, format_money, styles};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let budget = app.auth.user().map(|u| u.budget).unwrap_or(0.0);
    let expenses = summary::expense_total(&app.transactions);
    let balance = summary::balance(budget, &app.transactions);

    let mut lines = vec![Line::from("")];

    if summary::is_overspending(budget, &app.transactions) {
        lines.push(Line::from(Span::styled(
            format!(
                "  Warning: you are overspending! Expenses ({}) exceed your budget ({}).",
                format_money(expenses),
                format_money(budget)
            ),
            styles::warning_style(),
        )));
        lines.push(Line::from(""));
    }

    if app.budget_form.editing {
        lines.push(field_line("Monthly budget", &app.budget_form.value, true, false));
        lines.push(Line::from(Span::styled(
            "                      [Enter] save    [Esc] cancel",
            styles::muted_style(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("    Monthly budget: ", styles::muted_style()),
            Span::raw(format_money(budget)),
            Span::styled("   ([e] to edit)", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("    Expenses:       ", styles::muted_style()),
        Span::styled(format_money(expenses), styles::expense_style()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("    Left of budget: ", styles::muted_style()),
        Span::styled(
            format_money(balance),
            if balance < 0.0 {
                styles::expense_style()
            } else {
                styles::income_style()
            },
        ),
    ]));
    lines.push(Line::from(""));

    // simple horizontal bars in place of the chart
    let scale = budget.max(expenses);
    lines.push(bar_line("Budget", budget, scale, styles::income_style()));
    lines.push(bar_line("Expenses", expenses, scale, styles::expense_style()));
    lines.push(Line::from(""));

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

    let block = Block::default()
        .title(" Budget Overview ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let popup = centered_rect(76, 16, area);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Budget-vs-expenses as a scaled text bar
fn bar_line(label: &str, value: f64, scale: f64, style: ratatui::style::Style) -> Line<'static> {
    const BAR_WIDTH: f64 = 40.0;
    let filled = if scale > 0.0 {
        ((value / scale) * BAR_WIDTH).round() as usize
    } else {
        0
    };

    Line::from(vec![
        Span::styled(format!("    {:<9} ", label), styles::muted_style()),
        Span::styled("█".repeat(filled.min(BAR_WIDTH as usize)), style),
        Span::styled(format!(" {}", format_money(value)), styles::muted_style()),
    ])
}
