// Application state for the TUI
//
// App owns everything the renderer needs: the login gate, the active tab,
// the scan session, the static overview book, theme, modal and toast state.
// Mutation happens in two places only: key dispatch in tui::mod and
// handle_event() for events arriving from background tasks.

use crate::account::{menu_rows, profile_menu, MenuAction, MenuSection, OverviewBook};
use crate::auth::{Account, AuthProvider};
use crate::config::Config;
use crate::events::AppEvent;
use crate::logging::LogBuffer;
use crate::scanner::{spawn_permission_request, CameraPermission};
use crate::session::{
    ApplyOutcome, ConfirmOutcome, PaymentMode, PaymentTiming, ScanSession, UriOpener,
};
use crate::storage::{AttemptOutcome, PaymentRecord};
use crate::theme::{Theme, ThemeKind};
use crate::tui::components::Toast;
use crate::tui::input::InputHandler;
use crate::tui::modal::Modal;
use crossterm::event::KeyCode;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Top-level tabs, shown once the login gate is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Scan,
    Profile,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Scan, Tab::Profile]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Scan => "Scan & Pay",
            Tab::Profile => "Profile",
        }
    }

    pub fn next(self) -> Self {
        let tabs = Self::all();
        let current = tabs.iter().position(|&t| t == self).unwrap_or(0);
        tabs[(current + 1) % tabs.len()]
    }

    pub fn prev(self) -> Self {
        let tabs = Self::all();
        let current = tabs.iter().position(|&t| t == self).unwrap_or(0);
        tabs[(current + tabs.len() - 1) % tabs.len()]
    }
}

/// Main application state
pub struct App {
    /// Signed-in account; `None` means the login gate is showing
    pub account: Option<Account>,
    /// A sign-in future is in flight
    pub signing_in: bool,
    /// Message from the last failed sign-in
    pub sign_in_error: Option<String>,

    pub tab: Tab,
    pub session: ScanSession,
    /// Static dashboard figures for the overview screen
    pub book: OverviewBook,

    pub menu_sections: Vec<MenuSection>,
    pub menu_cursor: usize,

    pub theme_kind: ThemeKind,
    pub theme: Theme,
    pub modal: Option<Modal>,
    pub toast: Option<Toast>,

    pub log_buffer: LogBuffer,
    pub should_quit: bool,
    /// Settled or handed-off payments this run
    pub payments_completed: u64,
    pub animation_frame: usize,

    start_time: Instant,
    input_handler: InputHandler,

    auth: Arc<dyn AuthProvider>,
    permission: Arc<dyn CameraPermission>,
    opener: Arc<dyn UriOpener>,
    payment_mode: PaymentMode,
    payment_timing: PaymentTiming,
    events_tx: mpsc::Sender<AppEvent>,
    /// `None` when payment storage is disabled
    record_tx: Option<mpsc::Sender<PaymentRecord>>,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        config: &Config,
        log_buffer: LogBuffer,
        auth: Arc<dyn AuthProvider>,
        permission: Arc<dyn CameraPermission>,
        opener: Arc<dyn UriOpener>,
        events_tx: mpsc::Sender<AppEvent>,
        record_tx: Option<mpsc::Sender<PaymentRecord>>,
    ) -> Self {
        let theme_kind = ThemeKind::from_name(&config.theme).unwrap_or_default();
        let payment_mode = config.payment.mode;
        let payment_timing = config.payment.timing();
        let session = ScanSession::new(
            payment_mode,
            payment_timing,
            opener.clone(),
            events_tx.clone(),
        );

        Self {
            account: None,
            signing_in: false,
            sign_in_error: None,
            tab: Tab::Overview,
            session,
            book: OverviewBook::demo(),
            menu_sections: profile_menu(),
            menu_cursor: 0,
            theme_kind,
            theme: theme_kind.theme(),
            modal: None,
            toast: None,
            log_buffer,
            should_quit: false,
            payments_completed: 0,
            animation_frame: 0,
            start_time: Instant::now(),
            input_handler: InputHandler::with_default_config(),
            auth,
            permission,
            opener,
            payment_mode,
            payment_timing,
            events_tx,
            record_tx,
        }
    }

    // ---- input plumbing ----

    /// Returns true if the key press should trigger its action
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    // ---- periodic tick ----

    /// Advance spinner frames and expire the toast
    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.animation_frame % SPINNER_FRAMES.len()]
    }

    /// Uptime formatted as HH:MM:SS
    pub fn uptime(&self) -> String {
        let elapsed = self.start_time.elapsed().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            elapsed / 3600,
            (elapsed % 3600) / 60,
            elapsed % 60
        )
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Provider label for the login button
    pub fn auth_label(&self) -> &'static str {
        self.auth.label()
    }

    // ---- tabs and theme ----

    pub fn set_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            tracing::debug!("switched to {} tab", tab.name());
            self.tab = tab;
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme_kind = self.theme_kind.next();
        self.theme = self.theme_kind.theme();
        self.show_toast(format!("Theme: {}", self.theme_kind.name()));
    }

    // ---- login gate ----

    /// Kick off the sign-in future. The result comes back through the
    /// event channel as SignedIn or SignInFailed.
    pub fn begin_sign_in(&mut self) {
        if self.signing_in {
            return;
        }
        self.signing_in = true;
        self.sign_in_error = None;
        tracing::info!(provider = self.auth.label(), "sign-in started");

        let future = self.auth.sign_in();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match future.await {
                Ok(account) => AppEvent::SignedIn(account),
                Err(err) => AppEvent::SignInFailed(format!("{:#}", err)),
            };
            let _ = tx.send(event).await;
        });
    }

    /// Tear the session down and return to the login gate. A fresh session
    /// (with a fresh permission request) replaces the old one so scanning
    /// works again after the next sign-in.
    pub fn sign_out(&mut self) {
        tracing::info!("signed out");
        self.session.teardown();
        self.session = ScanSession::new(
            self.payment_mode,
            self.payment_timing,
            self.opener.clone(),
            self.events_tx.clone(),
        );
        spawn_permission_request(&*self.permission, self.events_tx.clone());
        self.account = None;
        self.tab = Tab::Overview;
        self.menu_cursor = 0;
        self.show_toast("Signed out");
    }

    // ---- profile menu ----

    pub fn menu_len(&self) -> usize {
        menu_rows(&self.menu_sections).len()
    }

    pub fn menu_up(&mut self) {
        let len = self.menu_len();
        self.menu_cursor = (self.menu_cursor + len - 1) % len;
    }

    pub fn menu_down(&mut self) {
        self.menu_cursor = (self.menu_cursor + 1) % self.menu_len();
    }

    /// Activate the menu row under the cursor
    pub fn activate_menu_item(&mut self) {
        let rows = menu_rows(&self.menu_sections);
        let Some(item) = rows.get(self.menu_cursor) else {
            return;
        };
        match item.action {
            MenuAction::ComingSoon => {
                self.show_toast(format!("{} - coming soon", item.label));
            }
            MenuAction::CycleTheme => self.cycle_theme(),
            MenuAction::SignOut => self.sign_out(),
        }
    }

    // ---- scan actions ----

    /// Enter on the scan view: confirm the captured payment
    pub fn confirm_payment(&mut self) {
        match self.session.confirm() {
            ConfirmOutcome::PendingStarted => {}
            ConfirmOutcome::HandedOff(request) => {
                self.payments_completed += 1;
                self.record_payment(PaymentRecord::new(&request, AttemptOutcome::HandedOff));
                self.show_toast("Opened in payment app");
            }
            ConfirmOutcome::None => {}
        }
    }

    /// Esc on the scan view: dismiss the captured payload
    pub fn cancel_capture(&mut self) {
        self.session.cancel();
    }

    // ---- background events ----

    /// Apply one event from the background task channel
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Permission(status) => {
                self.session.set_permission(status.is_granted());
            }
            AppEvent::Decode { timestamp, payload } => {
                // The scanner is only live while the scan tab is visible,
                // matching a camera that stops when its screen loses focus
                if self.account.is_none() || self.tab != Tab::Scan {
                    tracing::debug!(%timestamp, "decode dropped, scan tab not active");
                    return;
                }
                self.session.handle_decode(&payload);
            }
            AppEvent::Session(session_event) => match self.session.apply(session_event) {
                ApplyOutcome::Settled(request) => {
                    self.payments_completed += 1;
                    self.record_payment(PaymentRecord::new(&request, AttemptOutcome::Simulated));
                }
                ApplyOutcome::Cleared | ApplyOutcome::Stale => {}
            },
            AppEvent::SignedIn(account) => {
                tracing::info!(email = %account.email, "signed in");
                self.signing_in = false;
                self.sign_in_error = None;
                self.show_toast(format!("Welcome, {}", account.name));
                self.account = Some(account);
            }
            AppEvent::SignInFailed(message) => {
                tracing::warn!("sign-in failed: {}", message);
                self.signing_in = false;
                self.sign_in_error = Some(message);
            }
        }
    }

    fn record_payment(&mut self, record: PaymentRecord) {
        let Some(tx) = &self.record_tx else {
            return;
        };
        if tx.try_send(record).is_err() {
            tracing::warn!("payment record dropped, storage channel full or closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DeviceAuth;
    use crate::scanner::{ConfiguredPermission, PermissionStatus};
    use crate::session::handoff::RecordingOpener;
    use crate::session::ScanPhase;
    use std::time::Duration;

    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let config = Config::default();
        let app = App::with_config(
            &config,
            LogBuffer::new(),
            Arc::new(DeviceAuth::instant("Ada", "ada@example.com")),
            Arc::new(ConfiguredPermission::new(
                PermissionStatus::Granted,
                Duration::ZERO,
            )),
            Arc::new(RecordingOpener::default()),
            tx,
            None,
        );
        (app, rx)
    }

    fn signed_in_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (mut app, rx) = test_app();
        app.handle_event(AppEvent::SignedIn(Account {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            provider: "google",
        }));
        app.handle_event(AppEvent::Permission(PermissionStatus::Granted));
        (app, rx)
    }

    #[tokio::test]
    async fn tab_cycle_wraps() {
        assert_eq!(Tab::Overview.next(), Tab::Scan);
        assert_eq!(Tab::Profile.next(), Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Profile);
    }

    #[tokio::test]
    async fn decodes_only_land_on_the_scan_tab() {
        let (mut app, _rx) = signed_in_app();

        app.handle_event(AppEvent::Decode {
            timestamp: chrono::Utc::now(),
            payload: "upi://pay?pa=a@bank".into(),
        });
        assert_eq!(app.session.phase(), &ScanPhase::Idle);

        app.set_tab(Tab::Scan);
        app.handle_event(AppEvent::Decode {
            timestamp: chrono::Utc::now(),
            payload: "upi://pay?pa=a@bank".into(),
        });
        assert!(matches!(app.session.phase(), ScanPhase::Captured(_)));
    }

    #[tokio::test]
    async fn sign_out_resets_session_and_gate() {
        let (mut app, _rx) = signed_in_app();
        app.set_tab(Tab::Profile);

        app.sign_out();

        assert!(app.account.is_none());
        assert_eq!(app.tab, Tab::Overview);
        assert_eq!(app.session.phase(), &ScanPhase::AwaitingPermission);
    }

    #[tokio::test]
    async fn coming_soon_items_show_a_toast() {
        let (mut app, _rx) = signed_in_app();
        app.menu_cursor = 0; // "Edit Profile"
        app.activate_menu_item();
        assert!(app
            .toast
            .as_ref()
            .is_some_and(|t| t.message.contains("coming soon")));
        assert!(app.account.is_some());
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_the_gate_with_an_error() {
        let (mut app, _rx) = test_app();
        app.handle_event(AppEvent::SignInFailed("network unreachable".into()));
        assert!(app.account.is_none());
        assert!(!app.signing_in);
        assert_eq!(app.sign_in_error.as_deref(), Some("network unreachable"));
    }
}
