// Events that flow from background tasks to the TUI
//
// Decode feeds, the permission request, sign-in futures and session timers
// all run as separate tasks; everything they produce funnels through one
// mpsc channel into the TUI event loop. Using an enum keeps the channel
// type-safe and lets the loop pattern-match on whatever arrives.

use crate::auth::Account;
use crate::scanner::PermissionStatus;
use crate::session::SessionEvent;
use chrono::{DateTime, Utc};

/// Main event type that flows through the application
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Result of the one-shot camera permission request
    Permission(PermissionStatus),

    /// The scanner capability decoded a code
    Decode {
        timestamp: DateTime<Utc>,
        payload: String,
    },

    /// A session timer fired (payment settled / success display elapsed)
    Session(SessionEvent),

    /// Sign-in completed with an authenticated account
    SignedIn(Account),

    /// Sign-in failed; message is shown on the login screen
    SignInFailed(String),
}
