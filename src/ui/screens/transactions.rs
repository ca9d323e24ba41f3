use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, EntryField};
use crate::models::TransactionKind;
use crate::summary;
use crate::ui::{field_line, format_money, styles, truncate};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // summary cards
            Constraint::Length(7), // entry form
            Constraint::Min(8),    // transaction list
        ])
        .split(area);

    render_summary(frame, app, chunks[0]);
    render_entry_form(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let income = summary::income_total(&app.transactions);
    let expenses = summary::expense_total(&app.transactions);
    let budget = app.auth.user().map(|u| u.budget).unwrap_or(0.0);

    let mut lines = vec![Line::from(vec![
        Span::styled("  Income ", styles::muted_style()),
        Span::styled(format_money(income), styles::income_style()),
        Span::styled("    Expenses ", styles::muted_style()),
        Span::styled(format_money(expenses), styles::expense_style()),
        Span::styled("    Budget ", styles::muted_style()),
        Span::raw(format_money(budget)),
    ])];

    if summary::is_overspending(budget, &app.transactions) {
        lines.push(Line::from(Span::styled(
            format!(
                "  Warning: you are overspending! Expenses ({}) exceed your budget ({}).",
                format_money(expenses),
                format_money(budget)
            ),
            styles::warning_style(),
        )));
    }

    let welcome = app
        .auth
        .user()
        .map(|u| format!(" {} ", u.full_name()))
        .unwrap_or_default();

    let block = Block::default()
        .title(format!(" Overview{} ", welcome))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_entry_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.entry_form;
    let focus = form.focus();

    let kind_label = match form.kind {
        TransactionKind::Income => "income ",
        TransactionKind::Expense => "expense",
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("              Type: ", styles::muted_style()),
            Span::styled(
                kind_label,
                match form.kind {
                    TransactionKind::Income => styles::income_style(),
                    TransactionKind::Expense => styles::expense_style(),
                },
            ),
            Span::styled("  (Ctrl+T toggles)", styles::muted_style()),
        ]),
        field_line("Amount", &form.amount, focus == EntryField::Amount, false),
        field_line(
            "Description",
            &form.description,
            focus == EntryField::Description,
            false,
        ),
        field_line(
            "Category",
            &form.category,
            focus == EntryField::Category,
            false,
        ),
        Line::from(vec![
            Span::styled("  [Enter] ", styles::help_key_style()),
            Span::raw(if form.edit_id.is_some() {
                "update entry"
            } else {
                "add entry"
            }),
            Span::styled("  [Tab] ", styles::help_key_style()),
            Span::raw("next field"),
        ]),
    ];

    let title = if let Some(id) = form.edit_id {
        format!(" Edit Transaction #{} ", id)
    } else {
        " New Transaction ".to_string()
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let filtered = app.filtered();
    let page = app.current_page();
    let page_count = summary::page_count(filtered.len());
    let visible = summary::page_slice(&filtered, page);

    let mut lines = Vec::new();
    for (offset, t) in visible.iter().enumerate() {
        let index = page * summary::PAGE_SIZE + offset;
        let selected = index == app.selection;

        let marker = if selected { "> " } else { "  " };
        let amount_style = match t.kind {
            TransactionKind::Income => styles::income_style(),
            TransactionKind::Expense => styles::expense_style(),
        };

        let mut dates = format!("added {}", t.created_at.format("%Y-%m-%d"));
        if t.was_edited() {
            if let Some(updated) = t.updated_at {
                dates.push_str(&format!(", edited {}", updated.format("%Y-%m-%d")));
            }
        }

        let line = Line::from(vec![
            Span::raw(marker.to_string()),
            Span::styled(format!("{:>10} ", format_money(t.amount)), amount_style),
            Span::raw(format!("{:<30} ", truncate(&t.description, 30))),
            Span::styled(format!("{:<14} ", truncate(&t.category, 14)), styles::highlight_style()),
            Span::styled(dates, styles::muted_style()),
        ]);

        if selected {
            lines.push(line.style(styles::selected_style()));
        } else {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No transactions found. Add one using the form above!",
            styles::muted_style(),
        )));
    }

    let filter_label = app.filter_category.as_deref().unwrap_or("all");
    let page_label = if page_count > 1 {
        format!(" page {}/{} ", page + 1, page_count.max(1))
    } else {
        String::new()
    };
    let title = format!(" Transactions [filter: {}]{} ", filter_label, page_label);

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
