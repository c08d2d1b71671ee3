// Status bar component
//
// Renders session state at the bottom: uptime, scanner phase, payment mode,
// settled payment count, theme, and the most recent warning if any.

use crate::tui::app::App;
use crate::util::truncate_ellipsis;
use unicode_width::UnicodeWidthStr;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut status_text = format!(
        " {} │ scan: {} │ mode: {} │ payments: {} │ {}",
        app.uptime(),
        app.session.phase().name(),
        app.session.mode().name(),
        app.payments_completed,
        app.theme_kind.name(),
    );

    // Surface the latest warning so problems are visible without a log view
    if let Some(entry) = app.log_buffer.latest_warning() {
        let budget = (area.width as usize).saturating_sub(status_text.width() + 8);
        if budget > 4 {
            let message = truncate_ellipsis(&entry.message, budget);
            status_text.push_str(&format!(" │ ⚠ {}", message));
        }
    }

    let status = Paragraph::new(status_text)
        .style(app.theme.status_style())
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
