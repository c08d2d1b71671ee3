// Scan session state machine
//
// One session is active at a time, owned by the TUI app state. The machine
// goes AwaitingPermission -> Idle -> Captured -> [PaymentPending ->
// PaymentSucceeded] -> Idle, with PermissionDenied as a terminal state and
// an alternate Captured -> external handoff -> Idle branch.
//
// The two fixed-delay transitions (pending -> succeeded, succeeded -> idle)
// run as spawned tokio timers that report back through the app event
// channel. Timers are cancellable: teardown aborts the outstanding handle,
// and every scheduled event carries a generation number so a late callback
// from an aborted or superseded timer is ignored instead of mutating state.

pub mod handoff;

pub use handoff::{SystemOpener, UriOpener};

use crate::events::AppEvent;
use crate::payload::PaymentRequest;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Process-wide generation source. Sessions draw from one counter so a
/// timer event queued by a replaced session (sign-out spins up a fresh one)
/// can never numerically match a generation of its successor.
static GENERATION: AtomicU64 = AtomicU64::new(0);

fn next_generation() -> u64 {
    GENERATION.fetch_add(1, Ordering::Relaxed) + 1
}

/// Where the session currently is in the scan-and-pay flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    /// Permission request is in flight; decodes are not accepted yet
    AwaitingPermission,
    /// Permission was denied - terminal until the app restarts
    PermissionDenied,
    /// Scanning; the next non-empty decode is captured
    Idle,
    /// A payload is held for user confirmation
    Captured(PaymentRequest),
    /// Simulated payment in flight (not user-cancellable)
    PaymentPending(PaymentRequest),
    /// Success shown briefly before auto-reset
    PaymentSucceeded(PaymentRequest),
}

impl ScanPhase {
    /// Short name for the status bar
    pub fn name(&self) -> &'static str {
        match self {
            ScanPhase::AwaitingPermission => "permission",
            ScanPhase::PermissionDenied => "denied",
            ScanPhase::Idle => "scanning",
            ScanPhase::Captured(_) => "captured",
            ScanPhase::PaymentPending(_) => "paying",
            ScanPhase::PaymentSucceeded(_) => "paid",
        }
    }
}

/// Timer completions delivered through the app event channel.
/// The generation lets the session reject events from stale timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The simulated processing delay elapsed
    PaymentSettled { generation: u64 },
    /// The success display delay elapsed
    SuccessCleared { generation: u64 },
}

/// How a confirmed payment is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMode {
    /// Fake in-app payment driven by timers. Never fails - this is a stub
    /// standing in for a real payment rail.
    #[default]
    Simulate,
    /// Hand the raw payload to the platform URI opener and reset immediately
    Handoff,
}

impl PaymentMode {
    pub fn name(&self) -> &'static str {
        match self {
            PaymentMode::Simulate => "simulate",
            PaymentMode::Handoff => "handoff",
        }
    }
}

/// Fixed delays for the simulated payment variant
#[derive(Debug, Clone, Copy)]
pub struct PaymentTiming {
    /// Captured -> Succeeded processing delay
    pub pending_delay: Duration,
    /// How long the success state stays visible before auto-reset
    pub success_display: Duration,
}

impl Default for PaymentTiming {
    fn default() -> Self {
        // Matches the original product behavior: 2s processing, 2s success
        Self {
            pending_delay: Duration::from_millis(2000),
            success_display: Duration::from_millis(2000),
        }
    }
}

/// Result of feeding a decode event into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Payload captured; confirmation view should open
    Captured,
    /// Session was not in a state to accept decodes (duplicate, pending, denied)
    Ignored,
    /// Payload was empty/malformed; error message set, still scanning
    Rejected,
}

/// Result of a user confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Nothing to confirm in the current phase
    None,
    /// Simulated payment started; a settle timer is running
    PendingStarted,
    /// Payload handed to the external opener; session already reset
    HandedOff(PaymentRequest),
}

/// Result of applying a timer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Simulated payment settled successfully
    Settled(PaymentRequest),
    /// Success display elapsed; session is back to scanning
    Cleared,
    /// Event was from a stale or aborted timer - no state change
    Stale,
}

/// The scan-and-pay session. See module docs for the state diagram.
pub struct ScanSession {
    phase: ScanPhase,
    /// Transient user-facing message from the last rejected decode
    last_error: Option<String>,
    mode: PaymentMode,
    timing: PaymentTiming,
    opener: Arc<dyn UriOpener>,
    events: mpsc::Sender<AppEvent>,
    /// Outstanding settle/clear timer, if any
    timer: Option<JoinHandle<()>>,
    /// Bumped whenever a timer is scheduled or invalidated
    generation: u64,
    torn_down: bool,
}

impl ScanSession {
    pub fn new(
        mode: PaymentMode,
        timing: PaymentTiming,
        opener: Arc<dyn UriOpener>,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            phase: ScanPhase::AwaitingPermission,
            last_error: None,
            mode,
            timing,
            opener,
            events,
            timer: None,
            generation: next_generation(),
            torn_down: false,
        }
    }

    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    pub fn mode(&self) -> PaymentMode {
        self.mode
    }

    /// The captured payload, if any phase is currently holding one
    pub fn payload(&self) -> Option<&PaymentRequest> {
        match &self.phase {
            ScanPhase::Captured(req)
            | ScanPhase::PaymentPending(req)
            | ScanPhase::PaymentSucceeded(req) => Some(req),
            _ => None,
        }
    }

    /// Message from the last rejected decode, shown on the scan view
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply the permission request result. Only meaningful while awaiting;
    /// a denied result is terminal for this session.
    pub fn set_permission(&mut self, granted: bool) {
        if self.phase != ScanPhase::AwaitingPermission {
            return;
        }
        self.phase = if granted {
            tracing::debug!("camera permission granted, scanner active");
            ScanPhase::Idle
        } else {
            tracing::warn!("camera permission denied - scan & pay disabled");
            ScanPhase::PermissionDenied
        };
    }

    /// Feed a decode event into the session.
    ///
    /// Decodes are only accepted while Idle; anything arriving while a
    /// payload is already captured or a payment is in flight is dropped,
    /// which is what suppresses duplicate reads from a continuous scanner.
    pub fn handle_decode(&mut self, raw: &str) -> DecodeOutcome {
        if self.phase != ScanPhase::Idle {
            return DecodeOutcome::Ignored;
        }

        match PaymentRequest::parse(raw) {
            Ok(request) => {
                tracing::info!(summary = %request.summary(), "payload captured");
                self.last_error = None;
                self.phase = ScanPhase::Captured(request);
                DecodeOutcome::Captured
            }
            Err(err) => {
                tracing::debug!("decode rejected: {}", err);
                self.last_error = Some(err.to_string());
                DecodeOutcome::Rejected
            }
        }
    }

    /// Explicit user confirmation from the captured view ("Pay Now").
    pub fn confirm(&mut self) -> ConfirmOutcome {
        let ScanPhase::Captured(request) = self.phase.clone() else {
            return ConfirmOutcome::None;
        };

        match self.mode {
            PaymentMode::Simulate => {
                tracing::info!("simulated payment started");
                self.phase = ScanPhase::PaymentPending(request);
                let delay = self.timing.pending_delay;
                self.schedule(delay, |generation| SessionEvent::PaymentSettled {
                    generation,
                });
                ConfirmOutcome::PendingStarted
            }
            PaymentMode::Handoff => {
                if !request.is_uri() {
                    tracing::debug!("payload has no scheme, opener may reject it");
                }
                // Fire-and-forget: open failure is logged, never surfaced,
                // and the session resets regardless of the outcome.
                if let Err(err) = self.opener.open(&request.raw) {
                    tracing::warn!("external handoff failed: {:#}", err);
                } else {
                    tracing::info!("payload handed off to system URI handler");
                }
                self.reset_to_idle();
                ConfirmOutcome::HandedOff(request)
            }
        }
    }

    /// Dismiss the confirmation view without paying. Only valid from
    /// Captured - an in-flight simulated payment cannot be aborted.
    pub fn cancel(&mut self) -> bool {
        if !matches!(self.phase, ScanPhase::Captured(_)) {
            return false;
        }
        tracing::debug!("payment canceled by user");
        self.reset_to_idle();
        true
    }

    /// Apply a timer completion. Stale generations are ignored - they come
    /// from timers that were superseded or aborted after the event was sent.
    pub fn apply(&mut self, event: SessionEvent) -> ApplyOutcome {
        if self.torn_down {
            return ApplyOutcome::Stale;
        }

        match event {
            SessionEvent::PaymentSettled { generation } => {
                if generation != self.generation {
                    return ApplyOutcome::Stale;
                }
                let ScanPhase::PaymentPending(request) = self.phase.clone() else {
                    return ApplyOutcome::Stale;
                };
                tracing::info!("simulated payment settled");
                self.phase = ScanPhase::PaymentSucceeded(request.clone());
                let delay = self.timing.success_display;
                self.schedule(delay, |generation| SessionEvent::SuccessCleared {
                    generation,
                });
                ApplyOutcome::Settled(request)
            }
            SessionEvent::SuccessCleared { generation } => {
                if generation != self.generation
                    || !matches!(self.phase, ScanPhase::PaymentSucceeded(_))
                {
                    return ApplyOutcome::Stale;
                }
                self.reset_to_idle();
                ApplyOutcome::Cleared
            }
        }
    }

    /// Cancel outstanding timers and refuse all further state updates.
    /// Called on sign-out and app shutdown.
    pub fn teardown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation = next_generation();
        self.torn_down = true;
    }

    /// Back to scanning: payload cleared, timers invalidated
    fn reset_to_idle(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation = next_generation();
        self.last_error = None;
        self.phase = ScanPhase::Idle;
    }

    /// Replace the outstanding timer with a new one for the next generation
    fn schedule(&mut self, delay: Duration, make_event: impl FnOnce(u64) -> SessionEvent) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation = next_generation();
        let event = make_event(self.generation);
        let tx = self.events.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::Session(event)).await;
        }));
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::handoff::RecordingOpener;
    use super::*;

    fn session_with(mode: PaymentMode) -> (ScanSession, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let mut session = ScanSession::new(
            mode,
            PaymentTiming::default(),
            Arc::new(RecordingOpener::default()),
            tx,
        );
        session.set_permission(true);
        (session, rx)
    }

    async fn next_session_event(rx: &mut mpsc::Receiver<AppEvent>) -> SessionEvent {
        match rx.recv().await {
            Some(AppEvent::Session(event)) => event,
            other => panic!("expected session event, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_decode_stays_idle_with_error() {
        let (mut session, _rx) = session_with(PaymentMode::Simulate);

        assert_eq!(session.handle_decode(""), DecodeOutcome::Rejected);
        assert_eq!(session.phase(), &ScanPhase::Idle);
        assert!(session.last_error().is_some());
        assert!(session.payload().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn decode_captures_verbatim_and_suppresses_duplicates() {
        let (mut session, _rx) = session_with(PaymentMode::Simulate);

        assert_eq!(
            session.handle_decode("upi://pay?pa=merchant@bank&am=500"),
            DecodeOutcome::Captured
        );
        assert_eq!(
            session.payload().unwrap().raw,
            "upi://pay?pa=merchant@bank&am=500"
        );

        // A second decode while the modal is open is dropped
        assert_eq!(
            session.handle_decode("upi://pay?pa=other@bank"),
            DecodeOutcome::Ignored
        );
        assert_eq!(
            session.payload().unwrap().raw,
            "upi://pay?pa=merchant@bank&am=500"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_payment_settles_then_resets() {
        let (mut session, mut rx) = session_with(PaymentMode::Simulate);

        session.handle_decode("upi://pay?pa=merchant@bank&am=500");
        assert_eq!(session.confirm(), ConfirmOutcome::PendingStarted);
        assert!(matches!(session.phase(), ScanPhase::PaymentPending(_)));

        // Pending delay elapses (paused clock auto-advances)
        let settled = next_session_event(&mut rx).await;
        assert!(matches!(
            session.apply(settled),
            ApplyOutcome::Settled(request) if request.amount.as_deref() == Some("500")
        ));
        assert!(matches!(session.phase(), ScanPhase::PaymentSucceeded(_)));

        // Success display elapses; payload is cleared
        let cleared = next_session_event(&mut rx).await;
        assert_eq!(session.apply(cleared), ApplyOutcome::Cleared);
        assert_eq!(session.phase(), &ScanPhase::Idle);
        assert!(session.payload().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_from_captured_never_enters_pending() {
        let (mut session, _rx) = session_with(PaymentMode::Simulate);

        session.handle_decode("merchant-code-123");
        assert!(session.cancel());
        assert_eq!(session.phase(), &ScanPhase::Idle);
        assert!(session.payload().is_none());

        // Nothing to confirm once canceled
        assert_eq!(session.confirm(), ConfirmOutcome::None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_ignored_while_pending() {
        let (mut session, _rx) = session_with(PaymentMode::Simulate);

        session.handle_decode("merchant-code-123");
        session.confirm();
        assert!(!session.cancel());
        assert!(matches!(session.phase(), ScanPhase::PaymentPending(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn denied_permission_is_terminal() {
        let (tx, _rx) = mpsc::channel(16);
        let mut session = ScanSession::new(
            PaymentMode::Simulate,
            PaymentTiming::default(),
            Arc::new(RecordingOpener::default()),
            tx,
        );
        session.set_permission(false);

        assert_eq!(session.phase(), &ScanPhase::PermissionDenied);
        assert_eq!(session.handle_decode("anything"), DecodeOutcome::Ignored);
        assert_eq!(session.phase(), &ScanPhase::PermissionDenied);

        // A late grant does not resurrect the session
        session.set_permission(true);
        assert_eq!(session.phase(), &ScanPhase::PermissionDenied);
    }

    #[tokio::test(start_paused = true)]
    async fn handoff_opens_uri_and_resets_immediately() {
        let opener = RecordingOpener::default();
        let (tx, _rx) = mpsc::channel(16);
        let mut session = ScanSession::new(
            PaymentMode::Handoff,
            PaymentTiming::default(),
            Arc::new(opener.clone()),
            tx,
        );
        session.set_permission(true);

        session.handle_decode("upi://pay?pa=merchant@bank&am=500");
        let outcome = session.confirm();
        assert!(matches!(outcome, ConfirmOutcome::HandedOff(_)));
        assert_eq!(session.phase(), &ScanPhase::Idle);
        assert_eq!(opener.opened(), vec!["upi://pay?pa=merchant@bank&am=500"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_handoff_still_resets_to_scanning() {
        let (tx, _rx) = mpsc::channel(16);
        let mut session = ScanSession::new(
            PaymentMode::Handoff,
            PaymentTiming::default(),
            Arc::new(handoff::FailingOpener),
            tx,
        );
        session.set_permission(true);

        session.handle_decode("upi://pay?pa=merchant@bank");
        let outcome = session.confirm();

        // Open failure is not surfaced as a session error
        assert!(matches!(outcome, ConfirmOutcome::HandedOff(_)));
        assert_eq!(session.phase(), &ScanPhase::Idle);
        assert!(session.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_while_pending_drops_late_timer_events() {
        let (mut session, mut rx) = session_with(PaymentMode::Simulate);

        session.handle_decode("merchant-code-123");
        session.confirm();
        let pending_phase = session.phase().clone();

        session.teardown();

        // Even if the settle event was already in the channel, applying it
        // after teardown must not change state.
        tokio::time::advance(Duration::from_millis(2500)).await;
        if let Ok(AppEvent::Session(event)) = rx.try_recv() {
            assert_eq!(session.apply(event), ApplyOutcome::Stale);
        }
        assert_eq!(session.phase(), &pending_phase);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_event_from_a_replaced_session_is_stale() {
        // Sign-out tears a session down and builds a fresh one; an event
        // the old session already queued must not settle the new one
        let (mut old_session, mut rx) = session_with(PaymentMode::Simulate);
        old_session.handle_decode("merchant-code-123");
        old_session.confirm();
        let leftover = next_session_event(&mut rx).await;
        old_session.teardown();

        let (mut new_session, _rx) = session_with(PaymentMode::Simulate);
        new_session.handle_decode("merchant-code-456");
        new_session.confirm();

        assert_eq!(new_session.apply(leftover), ApplyOutcome::Stale);
        assert!(matches!(new_session.phase(), ScanPhase::PaymentPending(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_is_ignored() {
        let (mut session, mut rx) = session_with(PaymentMode::Simulate);

        session.handle_decode("merchant-code-123");
        session.confirm();
        let settled = next_session_event(&mut rx).await;

        // Session is torn down before the event is applied; the generation
        // has moved on so the event no longer matches
        session.teardown();
        assert_eq!(session.apply(settled), ApplyOutcome::Stale);
    }
}
