// Components module - reusable UI building blocks
//
// Shell components are rendered in every signed-in view:
// - Title bar: App name, tab bar, account name
// - Status bar: Uptime, scanner phase, payment mode, payment count
//
// Each component is a focused, single-responsibility module.

pub mod formatters;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use toast::Toast;

use crate::tui::app::App;
use ratatui::{layout::Rect, Frame};

/// Render the title bar (convenience wrapper)
pub fn render_title(f: &mut Frame, area: Rect, app: &App) {
    title_bar::render(f, area, app);
}

/// Render the status bar (convenience wrapper)
pub fn render_status(f: &mut Frame, area: Rect, app: &App) {
    status_bar::render(f, area, app);
}

pub use formatters::{format_amount, format_axis_amount};
