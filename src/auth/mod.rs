// Authentication capability
//
// The login screen drives a single async sign-in operation. In the original
// product this is Google OAuth; here it is a capability handle constructed
// once at bootstrap and injected into the TUI, so the shell never imports a
// shared SDK singleton. The shipped implementation is a stub that resolves
// with the configured account after a short delay - real OAuth is a
// non-goal, and everything downstream only needs "an authenticated session".

use anyhow::Result;
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::time::sleep;

/// An authenticated account, as much of it as the UI needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub email: String,
    /// Which identity provider produced this account ("google", "stub", ...)
    pub provider: &'static str,
}

impl Account {
    /// Initials for the avatar block on the profile screen
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

/// One async sign-in operation returning an authenticated account
pub trait AuthProvider: Send + Sync {
    fn sign_in(&self) -> BoxFuture<'static, Result<Account>>;

    /// Label shown on the login button ("Google", ...)
    fn label(&self) -> &'static str;
}

/// Stub provider: resolves with a fixed account after a dialog-like delay
pub struct DeviceAuth {
    account: Account,
    delay: Duration,
}

impl DeviceAuth {
    pub fn new(name: String, email: String) -> Self {
        Self {
            account: Account {
                name,
                email,
                provider: "google",
            },
            delay: Duration::from_millis(900),
        }
    }

    #[cfg(test)]
    pub fn instant(name: &str, email: &str) -> Self {
        Self {
            account: Account {
                name: name.to_string(),
                email: email.to_string(),
                provider: "google",
            },
            delay: Duration::ZERO,
        }
    }
}

impl AuthProvider for DeviceAuth {
    fn sign_in(&self) -> BoxFuture<'static, Result<Account>> {
        let account = self.account.clone();
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            tracing::debug!(email = %account.email, "stub sign-in resolving");
            Ok(account)
        })
    }

    fn label(&self) -> &'static str {
        "Google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        let account = Account {
            name: "Pratyush Mohanty".to_string(),
            email: "p@example.com".to_string(),
            provider: "google",
        };
        assert_eq!(account.initials(), "PM");
    }

    #[tokio::test(start_paused = true)]
    async fn stub_sign_in_resolves_with_configured_account() {
        let auth = DeviceAuth::instant("Test User", "test@example.com");
        let account = auth.sign_in().await.unwrap();
        assert_eq!(account.email, "test@example.com");
        assert_eq!(account.provider, "google");
    }
}
