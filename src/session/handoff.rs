// External URI handoff capability
//
// The alternate payment variant delegates the scanned payload to the
// platform's default URI handler instead of simulating a payment in-app.
// The session only needs "open this string as a URI, fire-and-forget", so
// the capability is a one-method trait with a real implementation backed by
// the `open` crate and a recording stub for tests.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};

/// Fire-and-forget URI opening. No result flows back into the session.
pub trait UriOpener: Send + Sync {
    fn open(&self, uri: &str) -> Result<()>;
}

/// Opens URIs with the platform default handler (xdg-open / open / start)
#[derive(Debug, Default)]
pub struct SystemOpener;

impl UriOpener for SystemOpener {
    fn open(&self, uri: &str) -> Result<()> {
        open::that(uri).with_context(|| format!("failed to open {}", uri))
    }
}

/// Test double that records every URI it was asked to open
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl UriOpener for RecordingOpener {
    fn open(&self, uri: &str) -> Result<()> {
        self.opened.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}

/// Opener that always fails - exercises the "handoff failure is silent" path
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FailingOpener;

#[cfg(test)]
impl UriOpener for FailingOpener {
    fn open(&self, uri: &str) -> Result<()> {
        anyhow::bail!("no handler registered for {}", uri)
    }
}
