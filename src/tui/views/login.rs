// Login gate
//
// Shown until a sign-in completes. A single action is available: start the
// Google sign-in flow. The button mirrors its three states (idle, in
// flight, failed).

use crate::tui::app::App;
use crate::tui::views::centered_rect;
use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(46, 13, area);

    let button = if app.signing_in {
        format!("{} Signing in...", app.spinner_char())
    } else {
        format!("[ Sign in with {} ]", app.auth_label())
    };

    let mut lines = vec![
        Line::from(""),
        Line::styled("💳  FinView", app.theme.title_style()).alignment(Alignment::Center),
        Line::styled("Manage your finances with ease", app.theme.muted_style())
            .alignment(Alignment::Center),
        Line::from(""),
        Line::from(""),
        Line::styled(button, app.theme.selected_style()).alignment(Alignment::Center),
        Line::from(""),
    ];

    if let Some(error) = &app.sign_in_error {
        lines.push(
            Line::styled(format!("✗ {}", error), app.theme.error_style())
                .alignment(Alignment::Center),
        );
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(
        Line::styled("[Enter] sign in   [q] quit", app.theme.muted_style())
            .alignment(Alignment::Center),
    );

    let login = Paragraph::new(lines).style(app.theme.base_style()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_focused_style()),
    );

    f.render_widget(login, panel);
}
