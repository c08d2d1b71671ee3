// Title bar component
//
// Renders the app title and the tab bar. While signed out only the app
// name is shown; the tabs appear once the login gate is passed.

use crate::tui::app::{App, Tab};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
///
/// Shows:
/// - App name ("FinView")
/// - Tab bar with the active tab highlighted
/// - Signed-in account name on the right edge
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(" 💳 FinView ", app.theme.title_style())];

    if let Some(account) = &app.account {
        spans.push(Span::styled("│", app.theme.muted_style()));
        for tab in Tab::all() {
            let label = format!(" {} ", tab.name());
            if *tab == app.tab {
                spans.push(Span::styled(label, app.theme.selected_style()));
            } else {
                spans.push(Span::styled(label, app.theme.base_style()));
            }
            spans.push(Span::styled("│", app.theme.muted_style()));
        }
        spans.push(Span::styled(
            format!("  {}", account.name),
            app.theme.muted_style(),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.title))
            .title_top(Line::from(" ? ").right_aligned()),
    );

    f.render_widget(title, area);
}
