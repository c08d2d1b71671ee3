// Payment record storage - JSON Lines audit log
//
// Completed payment attempts (simulated successes and external handoffs)
// are appended one JSON object per line, so records can be grepped or piped
// through jq. This is an audit log only: nothing in the app reads it back.
//
// Each run gets its own file: payments-YYYYMMDD-HHMMSS-XXXX.jsonl

use crate::payload::PaymentRequest;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// How a recorded attempt completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// In-app simulated payment reached the success state
    Simulated,
    /// Payload was delegated to the platform URI handler
    HandedOff,
}

/// One completed payment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub timestamp: DateTime<Utc>,
    pub outcome: AttemptOutcome,
    /// Payload as scanned, verbatim
    pub raw: String,
    pub payee: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
}

impl PaymentRecord {
    pub fn new(request: &PaymentRequest, outcome: AttemptOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            outcome,
            raw: request.raw.clone(),
            payee: request.payee.clone(),
            amount: request.amount.clone(),
            currency: request.currency.clone(),
        }
    }
}

/// Writes payment records to a per-run JSONL file
pub struct Storage {
    dir: PathBuf,
    run_id: String,
    record_rx: mpsc::Receiver<PaymentRecord>,
}

impl Storage {
    pub fn new(dir: PathBuf, run_id: String, record_rx: mpsc::Receiver<PaymentRecord>) -> Result<Self> {
        fs::create_dir_all(&dir).context("Failed to create payment log directory")?;
        Ok(Self {
            dir,
            run_id,
            record_rx,
        })
    }

    fn log_file_path(&self) -> PathBuf {
        self.dir.join(format!("payments-{}.jsonl", self.run_id))
    }

    /// Run the storage loop until the channel closes
    pub async fn run(mut self) -> Result<()> {
        tracing::info!("Payment log: {:?}", self.log_file_path());

        while let Some(record) = self.record_rx.recv().await {
            if let Err(err) = self.write_record(&record) {
                // Keep processing - losing one record beats losing the task
                tracing::error!("Failed to write payment record: {:?}", err);
            }
        }

        tracing::debug!("Payment storage shutting down");
        Ok(())
    }

    fn write_record(&self, record: &PaymentRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file_path())
            .context("Failed to open payment log")?;

        let json = serde_json::to_string(record).context("Failed to serialize record")?;
        writeln!(file, "{}", json).context("Failed to write payment record")?;

        // Flush immediately so records survive a crash
        file.flush().context("Failed to flush payment log")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_json() {
        let request = PaymentRequest::parse("upi://pay?pa=merchant@bank&am=500").unwrap();
        let record = PaymentRecord::new(&request, AttemptOutcome::Simulated);

        let json = serde_json::to_string(&record).unwrap();
        let parsed: PaymentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.raw, "upi://pay?pa=merchant@bank&am=500");
        assert_eq!(parsed.outcome, AttemptOutcome::Simulated);
        assert_eq!(parsed.amount.as_deref(), Some("500"));
    }

    #[tokio::test]
    async fn storage_appends_records_until_channel_closes() {
        let dir = std::env::temp_dir().join(format!("finview-store-{}", std::process::id()));
        let (tx, rx) = mpsc::channel(4);
        let storage = Storage::new(dir.clone(), "test-run".to_string(), rx).unwrap();
        let handle = tokio::spawn(storage.run());

        let request = PaymentRequest::parse("code-1").unwrap();
        tx.send(PaymentRecord::new(&request, AttemptOutcome::HandedOff))
            .await
            .unwrap();
        drop(tx);
        handle.await.unwrap().unwrap();

        let contents = std::fs::read_to_string(dir.join("payments-test-run.jsonl")).unwrap();
        assert_eq!(contents.lines().count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
