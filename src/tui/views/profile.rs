// Profile view
//
// Account card on top, then the menu sections with a movable cursor.
// Most rows are placeholders; Theme cycles the color theme and Sign Out
// tears the session down and returns to the login gate.

use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(5), // account card
        Constraint::Min(0),    // menu
    ])
    .split(area);

    render_account_card(f, chunks[0], app);
    render_menu(f, chunks[1], app);
}

fn render_account_card(f: &mut Frame, area: Rect, app: &App) {
    // The login gate guarantees an account while this view is reachable
    let Some(account) = &app.account else {
        return;
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" ({}) ", account.initials()), app.theme.selected_style()),
            Span::styled(format!(" {}", account.name), app.theme.title_style()),
        ]),
        Line::styled(format!("      {}", account.email), app.theme.muted_style()),
        Line::styled(
            format!("      signed in with {}", account.provider),
            app.theme.muted_style(),
        ),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style())
            .title(" Profile ")
            .title_style(app.theme.title_style()),
    );

    f.render_widget(card, area);
}

fn render_menu(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    let mut row = 0usize;

    for section in &app.menu_sections {
        lines.push(Line::styled(format!(" {}", section.title), app.theme.title_style()));
        for item in &section.items {
            let style = if row == app.menu_cursor {
                app.theme.selected_style()
            } else {
                app.theme.base_style()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("   {}", item.label), style),
                Span::styled("  ›", app.theme.muted_style()),
            ]));
            row += 1;
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::styled(
        " [↑↓] move   [Enter] select",
        app.theme.muted_style(),
    ));

    let menu = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style()),
    );

    f.render_widget(menu, area);
}
