// Scan & Pay view
//
// Renders whatever phase the scan session is in. The confirmation panel
// doubles as the payment flow: Enter confirms, Esc cancels, and the
// pending/success phases replace it until the session auto-resets.

use crate::payload::PaymentRequest;
use crate::session::{PaymentMode, ScanPhase};
use crate::tui::app::App;
use crate::tui::views::centered_rect;
use crate::util::truncate_ellipsis;
use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    match app.session.phase() {
        ScanPhase::AwaitingPermission => render_permission_wait(f, area, app),
        ScanPhase::PermissionDenied => render_permission_denied(f, area, app),
        ScanPhase::Idle => render_scanning(f, area, app),
        ScanPhase::Captured(request) => render_confirmation(f, area, app, request),
        ScanPhase::PaymentPending(_) => render_pending(f, area, app),
        ScanPhase::PaymentSucceeded(request) => render_success(f, area, app, request),
    }
}

fn render_permission_wait(f: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(46, 7, area);
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("{} Requesting camera access...", app.spinner_char()),
            app.theme.base_style(),
        )
        .alignment(Alignment::Center),
        Line::from(""),
        Line::styled(
            "Scanning starts once permission is granted",
            app.theme.muted_style(),
        )
        .alignment(Alignment::Center),
    ];
    f.render_widget(framed(lines, app, " Scan & Pay "), panel);
}

fn render_permission_denied(f: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(50, 8, area);
    let lines = vec![
        Line::from(""),
        Line::styled("✗ Camera access denied", app.theme.error_style())
            .alignment(Alignment::Center),
        Line::from(""),
        Line::styled(
            "Scan & Pay is unavailable this session.",
            app.theme.base_style(),
        )
        .alignment(Alignment::Center),
        Line::styled(
            "Grant camera permission and restart the app.",
            app.theme.muted_style(),
        )
        .alignment(Alignment::Center),
    ];
    f.render_widget(framed(lines, app, " Scan & Pay "), panel);
}

fn render_scanning(f: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(50, 12, area);

    let mut lines = vec![
        Line::from(""),
        Line::styled("┌─────────────────┐", app.theme.muted_style()).alignment(Alignment::Center),
        Line::styled("│                 │", app.theme.muted_style()).alignment(Alignment::Center),
        Line::styled(
            format!("│   {}  scanning   │", app.spinner_char()),
            app.theme.base_style(),
        )
        .alignment(Alignment::Center),
        Line::styled("│                 │", app.theme.muted_style()).alignment(Alignment::Center),
        Line::styled("└─────────────────┘", app.theme.muted_style()).alignment(Alignment::Center),
        Line::from(""),
        Line::styled("Point the camera at a QR code", app.theme.base_style())
            .alignment(Alignment::Center),
    ];

    if let Some(error) = app.session.last_error() {
        lines.push(
            Line::styled(format!("✗ {}", error), app.theme.error_style())
                .alignment(Alignment::Center),
        );
    }

    f.render_widget(framed(lines, app, " Scan & Pay "), panel);
}

fn render_confirmation(f: &mut Frame, area: Rect, app: &App, request: &PaymentRequest) {
    let panel = centered_rect(54, 13, area);

    let payee = request
        .payee_name
        .as_deref()
        .or(request.payee.as_deref())
        .unwrap_or("Unknown recipient");
    let amount = match (&request.amount, &request.currency) {
        (Some(amount), Some(currency)) => format!("{} {}", currency, amount),
        (Some(amount), None) => amount.clone(),
        _ => "Amount not specified".to_string(),
    };

    // Payload content is arbitrary; cut by display width, not bytes
    let raw = truncate_ellipsis(&request.raw, 46);

    let confirm_hint = match app.session.mode() {
        PaymentMode::Simulate => "[Enter] Pay Now    [Esc] Cancel",
        PaymentMode::Handoff => "[Enter] Open in payment app    [Esc] Cancel",
    };

    let lines = vec![
        Line::from(""),
        Line::styled("Pay to", app.theme.muted_style()).alignment(Alignment::Center),
        Line::styled(payee.to_string(), app.theme.title_style()).alignment(Alignment::Center),
        Line::from(""),
        Line::styled(amount, app.theme.base_style()).alignment(Alignment::Center),
        Line::from(""),
        Line::styled(raw, app.theme.muted_style()).alignment(Alignment::Center),
        Line::from(""),
        Line::styled(confirm_hint, app.theme.selected_style()).alignment(Alignment::Center),
    ];

    f.render_widget(framed(lines, app, " Confirm Payment "), panel);
}

fn render_pending(f: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(46, 7, area);
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("{} Processing Payment...", app.spinner_char()),
            app.theme.base_style(),
        )
        .alignment(Alignment::Center),
        Line::from(""),
        Line::styled("Please wait", app.theme.muted_style()).alignment(Alignment::Center),
    ];
    f.render_widget(framed(lines, app, " Scan & Pay "), panel);
}

fn render_success(f: &mut Frame, area: Rect, app: &App, request: &PaymentRequest) {
    let panel = centered_rect(46, 8, area);

    let detail = match (&request.amount, request.payee_name.as_deref()) {
        (Some(amount), Some(payee)) => format!("Paid {} to {}", amount, payee),
        (Some(amount), None) => format!("Paid {}", amount),
        _ => request.summary(),
    };

    let lines = vec![
        Line::from(""),
        Line::styled(
            "✓ Payment Successful",
            ratatui::style::Style::default()
                .fg(app.theme.success)
                .add_modifier(ratatui::style::Modifier::BOLD),
        )
        .alignment(Alignment::Center),
        Line::from(""),
        Line::styled(detail, app.theme.base_style()).alignment(Alignment::Center),
    ];

    f.render_widget(framed(lines, app, " Scan & Pay "), panel);
}

fn framed<'a>(lines: Vec<Line<'a>>, app: &App, title: &'a str) -> Paragraph<'a> {
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_focused_style())
            .title(title)
            .title_style(app.theme.title_style()),
    )
}
