// Views module - full-screen layouts
//
// One render function per tab plus the login gate. draw() is the single
// entry point called from the event loop; it picks the layout, renders the
// shell components, then lays overlays (help modal, toast) on top.

pub mod login;
pub mod overview;
pub mod profile;
pub mod scan;

use crate::tui::app::{App, Tab};
use crate::tui::components;
use crate::tui::modal::Modal;
use crate::util::truncate_ellipsis;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the whole UI
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Paint the theme background before anything else
    if app.theme.bg != Color::Reset {
        f.render_widget(Block::default().style(Style::default().bg(app.theme.bg)), area);
    }

    if app.account.is_none() {
        login::render(f, area, app);
    } else {
        let chunks = Layout::vertical([
            Constraint::Length(3), // title + tab bar
            Constraint::Min(0),    // active view
            Constraint::Length(2), // status bar
        ])
        .split(area);

        components::render_title(f, chunks[0], app);
        match app.tab {
            Tab::Overview => overview::render(f, chunks[1], app),
            Tab::Scan => scan::render(f, chunks[1], app),
            Tab::Profile => profile::render(f, chunks[1], app),
        }
        components::render_status(f, chunks[2], app);
    }

    if let Some(Modal::Help) = &app.modal {
        draw_help(f, area, app);
    }

    if let Some(toast) = &app.toast {
        toast.render(f, area, &app.theme);
    }
}

/// Help overlay: keyboard shortcuts plus the last few log lines
fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let help_area = centered_rect(54, 23, area);

    let mut lines = vec![
        Line::from(""),
        Line::styled("  Navigation", app.theme.title_style()),
        Line::from("    Tab / BackTab   next / previous tab"),
        Line::from("    1 / 2 / 3       jump to tab"),
        Line::from("    ↑↓ / jk         move menu cursor"),
        Line::from(""),
        Line::styled("  Scan & Pay", app.theme.title_style()),
        Line::from("    Enter           confirm payment"),
        Line::from("    Esc             cancel captured code"),
        Line::from(""),
        Line::styled("  General", app.theme.title_style()),
        Line::from("    t               cycle theme"),
        Line::from("    ?               toggle this help"),
        Line::from("    q               quit"),
        Line::from(""),
        Line::styled("  Recent activity", app.theme.title_style()),
    ];

    for entry in app.log_buffer.recent(5) {
        let message = truncate_ellipsis(&entry.message, 42);
        lines.push(Line::styled(
            format!("    {:5} {}", entry.level.as_str(), message),
            app.theme.muted_style(),
        ));
    }

    let help = Paragraph::new(lines).style(app.theme.base_style()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_focused_style())
            .title(" Help ")
            .title_style(app.theme.title_style()),
    );

    f.render_widget(Clear, help_area);
    f.render_widget(help, help_area);
}

/// A rect of at most `width` x `height`, centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
