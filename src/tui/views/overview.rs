// Overview dashboard
//
// Renders the static demo book: total balance with trend, the six-month
// cash-flow forecast as a bar chart, the forecast alert, and the canned
// AI insight cards. Every figure comes from account::OverviewBook.

use crate::account::InsightSeverity;
use crate::tui::app::App;
use crate::tui::components::{format_amount, format_axis_amount};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),  // greeting
        Constraint::Length(4),  // balance card
        Constraint::Min(8),     // cash-flow chart
        Constraint::Length(3),  // forecast alert
        Constraint::Length(11), // insight cards
    ])
    .split(area);

    render_greeting(f, chunks[0], app);
    render_balance(f, chunks[1], app);
    render_cash_flow(f, chunks[2], app);
    render_alert(f, chunks[3], app);
    render_insights(f, chunks[4], app);
}

fn render_greeting(f: &mut Frame, area: Rect, app: &App) {
    let first_name = app
        .account
        .as_ref()
        .and_then(|a| a.name.split_whitespace().next())
        .unwrap_or("there");

    let greeting = Paragraph::new(Line::from(vec![
        Span::styled(" Welcome back, ", app.theme.muted_style()),
        Span::styled(first_name.to_string(), app.theme.title_style()),
    ]));

    f.render_widget(greeting, area);
}

fn render_balance(f: &mut Frame, area: Rect, app: &App) {
    let book = &app.book;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", format_amount(book.total_balance)),
                app.theme.title_style(),
            ),
            Span::styled(
                format!("  ↑ {:.1}%", book.trend_pct),
                Style::default().fg(app.theme.success),
            ),
        ]),
        Line::styled(format!(" {}", book.trend_note), app.theme.muted_style()),
    ];

    let balance = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style())
            .title(" Total Balance ")
            .title_style(app.theme.title_style()),
    );

    f.render_widget(balance, area);
}

fn render_cash_flow(f: &mut Frame, area: Rect, app: &App) {
    let book = &app.book;
    let (_, max) = book.cash_flow_bounds();

    let bars: Vec<Bar> = book
        .cash_flow
        .iter()
        .map(|point| {
            Bar::default()
                .value(point.amount as u64)
                .label(Line::from(point.month))
                .text_value(format_axis_amount(point.amount))
                .style(Style::default().fg(app.theme.chart_line))
                .value_style(
                    Style::default()
                        .fg(app.theme.bg)
                        .bg(app.theme.chart_line),
                )
        })
        .collect();

    // Spread bars across the available width
    let bar_width = ((area.width.saturating_sub(4)) / book.cash_flow.len() as u16)
        .saturating_sub(2)
        .clamp(3, 9);

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cash Flow Forecast ")
                .title_style(app.theme.title_style())
                .border_style(app.theme.border_style()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2)
        .max(max as u64)
        .label_style(Style::default().fg(app.theme.chart_axis));

    f.render_widget(chart, area);
}

fn render_alert(f: &mut Frame, area: Rect, app: &App) {
    let alert = Paragraph::new(format!("⚠ {}", app.book.cash_flow_alert))
        .style(Style::default().fg(app.theme.warning))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.warning)),
        );

    f.render_widget(alert, area);
}

fn render_insights(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for insight in &app.book.insights {
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(severity_color(insight.severity, app))),
            Span::styled(
                insight.title,
                Style::default()
                    .fg(severity_color(insight.severity, app))
                    .add_modifier(ratatui::style::Modifier::BOLD),
            ),
        ]));
        lines.push(Line::styled(format!("  {}", insight.body), app.theme.base_style()));
        lines.push(Line::styled(
            format!("  → {}", insight.action),
            Style::default().fg(app.theme.primary),
        ));
    }

    let insights = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" AI Insights ")
            .title_style(app.theme.title_style())
            .border_style(app.theme.border_style()),
    );

    f.render_widget(insights, area);
}

fn severity_color(severity: InsightSeverity, app: &App) -> Color {
    match severity {
        InsightSeverity::Positive => app.theme.success,
        InsightSeverity::Opportunity => app.theme.primary,
        InsightSeverity::Risk => app.theme.danger,
    }
}
