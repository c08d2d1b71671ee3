// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks)
// - Rendering the UI
// - Receiving background events and updating the display

pub mod app;
pub mod components;
pub mod input;
pub mod modal;
pub mod views;

use crate::events::AppEvent;
use anyhow::{Context, Result};
use app::{App, Tab};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// This function sets up the terminal, runs the event loop, and cleans up
/// when done. The event loop handles both keyboard input and app events.
pub async fn run_tui(mut app: App, mut event_rx: mpsc::Receiver<AppEvent>) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Session timers must not outlive the UI
    app.session.teardown();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// This loop handles three types of events:
/// 1. Keyboard input (for navigation and commands)
/// 2. Timer ticks (for spinner animation and toast expiry)
/// 3. App events from background tasks (decodes, timers, sign-in results)
///
/// The use of tokio::select! allows us to wait on multiple async operations
/// simultaneously, responding to whichever one completes first.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Ticker for periodic redraws
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        // Draw the UI
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            // Periodic tick for spinner frames and toast expiry
            _ = tick_interval.tick() => {
                app.tick_animation();
            }

            // Background events
            Some(app_event) = event_rx.recv() => {
                app.handle_event(app_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal -> Login gate -> Global -> View-specific
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Layer 1: Modal captures all input when active
    if handle_modal_input(app, &key_event) {
        return;
    }

    // Layer 2: the login gate swallows everything until signed in
    if app.account.is_none() {
        handle_login_keys(app, &key_event);
        return;
    }

    // Layer 3: Global keys (work regardless of tab)
    if handle_global_keys(app, &key_event) {
        return;
    }

    let key = key_event.code;

    // Layer 4: Tab-specific action keys (use InputHandler for debounce)
    match key_event.kind {
        KeyEventKind::Press => match key {
            KeyCode::Enter => {
                if app.handle_key_press(key) {
                    match app.tab {
                        Tab::Scan => app.confirm_payment(),
                        Tab::Profile => app.activate_menu_item(),
                        Tab::Overview => {}
                    }
                }
            }
            KeyCode::Esc => {
                if app.handle_key_press(key) && app.tab == Tab::Scan {
                    app.cancel_capture();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.handle_key_press(key) && app.tab == Tab::Profile {
                    app.menu_up();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.handle_key_press(key) && app.tab == Tab::Profile {
                    app.menu_down();
                }
            }
            _ => {
                let _ = app.handle_key_press(key);
            }
        },
        KeyEventKind::Release => {
            app.handle_key_release(key);
        }
        _ => {}
    }
}

/// Handle modal input - returns true if modal absorbed the input
fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(ref mut modal) = app.modal else {
        return false;
    };

    // Always process Release events to keep InputHandler in sync.
    // Without this, keys get stuck in "pressed" state after modal closes.
    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        return true;
    }

    if key_event.kind != KeyEventKind::Press {
        return true;
    }

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => {
            app.modal = None;
        }
    }

    true
}

/// Keys available on the login screen
fn handle_login_keys(app: &mut App, key_event: &KeyEvent) {
    if key_event.kind == KeyEventKind::Release {
        app.handle_key_release(key_event.code);
        return;
    }
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    let key = key_event.code;
    match key {
        KeyCode::Enter => {
            if app.handle_key_press(key) {
                app.begin_sign_in();
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            if app.handle_key_press(key) {
                app.should_quit = true;
            }
        }
        KeyCode::Char('?') => {
            if app.handle_key_press(key) {
                app.modal = Some(Modal::help());
            }
        }
        _ => {}
    }
}

/// Handle global keys - returns true if handled
/// Global keys work the same regardless of current tab
/// Uses InputHandler for debounce (StateChange behavior = trigger once per press)
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    let key = key_event.code;

    match key {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            if app.handle_key_press(key) {
                app.should_quit = true;
            }
            true
        }
        // Tab cycling
        KeyCode::Tab => {
            if app.handle_key_press(key) {
                app.set_tab(app.tab.next());
            }
            true
        }
        KeyCode::BackTab => {
            if app.handle_key_press(key) {
                app.set_tab(app.tab.prev());
            }
            true
        }
        // Direct tab selection
        KeyCode::Char('1') => {
            if app.handle_key_press(key) {
                app.set_tab(Tab::Overview);
            }
            true
        }
        KeyCode::Char('2') => {
            if app.handle_key_press(key) {
                app.set_tab(Tab::Scan);
            }
            true
        }
        KeyCode::Char('3') => {
            if app.handle_key_press(key) {
                app.set_tab(Tab::Profile);
            }
            true
        }
        // Theme cycling
        KeyCode::Char('t') | KeyCode::Char('T') => {
            if app.handle_key_press(key) {
                app.cycle_theme();
            }
            true
        }
        // Help modal
        KeyCode::Char('?') => {
            if app.handle_key_press(key) {
                app.modal = Some(Modal::help());
            }
            true
        }
        _ => false,
    }
}
