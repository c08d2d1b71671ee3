// Decode feed implementations
//
// ScriptedSource emits a canned payload sequence on a timer - the demo
// stand-in for pointing a camera at QR codes. FileSource tails a plain text
// file, one payload per line, so an external scanner (or a human with
// `echo >> feed.txt`) can drive the real flow.

use super::DecodeSource;
use futures::future::BoxFuture;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;

/// Canned payloads a demo session cycles through. The empty entry is
/// deliberate: it shows the invalid-decode error path in the UI.
const DEMO_PAYLOADS: &[&str] = &[
    "upi://pay?pa=merchant@bank&pn=Corner%20Store&am=500&cu=INR",
    "upi://pay?pa=coffee@icici&pn=Brew%20Lab&am=240&cu=INR",
    "",
    "upi://pay?pa=grocer@okaxis&pn=Daily%20Greens&am=1250&cu=INR",
    "https://pay.example.com/invoice/8841",
];

/// Scripted demo feed: emits payloads with a fixed delay between them
pub struct ScriptedSource {
    payloads: Vec<String>,
    interval: Duration,
    position: usize,
    repeat: bool,
}

impl ScriptedSource {
    /// The default demo script, cycling forever
    pub fn demo(interval: Duration) -> Self {
        Self {
            payloads: DEMO_PAYLOADS.iter().map(|s| s.to_string()).collect(),
            interval,
            position: 0,
            repeat: true,
        }
    }

    /// Emit the given payloads once, then end the feed. Used in tests.
    pub fn once(payloads: Vec<String>, interval: Duration) -> Self {
        Self {
            payloads,
            interval,
            position: 0,
            repeat: false,
        }
    }
}

impl DecodeSource for ScriptedSource {
    fn next_decode(&mut self) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move {
            if self.payloads.is_empty() {
                return None;
            }
            if self.position >= self.payloads.len() {
                if !self.repeat {
                    return None;
                }
                self.position = 0;
            }
            sleep(self.interval).await;
            let payload = self.payloads[self.position].clone();
            self.position += 1;
            Some(payload)
        })
    }
}

/// How often the file feed polls for new lines after hitting EOF
const FILE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Tails a text file for decode payloads, one per line.
/// Starts at the end of any existing content so old payloads are not
/// replayed on startup.
pub struct FileSource {
    path: PathBuf,
    reader: Option<BufReader<File>>,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path, reader: None }
    }

    async fn ensure_reader(&mut self) -> &mut BufReader<File> {
        loop {
            if self.reader.is_some() {
                // borrow checker: re-take after the loop
                break;
            }
            match File::open(&self.path).await {
                Ok(mut file) => {
                    if let Err(err) = file.seek(SeekFrom::End(0)).await {
                        tracing::warn!("feed file seek failed: {}", err);
                    }
                    tracing::info!(path = %self.path.display(), "feed file opened");
                    self.reader = Some(BufReader::new(file));
                }
                Err(_) => {
                    // File not there yet; keep waiting
                    sleep(FILE_POLL_INTERVAL).await;
                }
            }
        }
        self.reader.as_mut().unwrap()
    }
}

impl DecodeSource for FileSource {
    fn next_decode(&mut self) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move {
            loop {
                let reader = self.ensure_reader().await;
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF - wait for the writer to append more
                        sleep(FILE_POLL_INTERVAL).await;
                    }
                    Ok(_) => {
                        let payload = line.trim_end_matches(['\n', '\r']).to_string();
                        return Some(payload);
                    }
                    Err(err) => {
                        tracing::warn!("feed file read failed: {}", err);
                        self.reader = None;
                        sleep(FILE_POLL_INTERVAL).await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn scripted_source_cycles_in_order() {
        let mut source = ScriptedSource::demo(Duration::from_millis(5));
        let first = source.next_decode().await.unwrap();
        assert_eq!(first, DEMO_PAYLOADS[0]);

        // Walk a full cycle; it wraps around instead of ending
        for expected in DEMO_PAYLOADS.iter().skip(1) {
            assert_eq!(source.next_decode().await.as_deref(), Some(*expected));
        }
        assert_eq!(source.next_decode().await.as_deref(), Some(DEMO_PAYLOADS[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn once_source_ends_after_script() {
        let mut source = ScriptedSource::once(vec!["a".into()], Duration::from_millis(1));
        assert_eq!(source.next_decode().await.as_deref(), Some("a"));
        assert_eq!(source.next_decode().await, None);
    }

    #[tokio::test]
    async fn file_source_picks_up_appended_lines() {
        let dir = std::env::temp_dir().join(format!("finview-feed-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.txt");
        std::fs::write(&path, "stale-line\n").unwrap();

        let mut source = FileSource::new(path.clone());
        let next = tokio::spawn(async move { source.next_decode().await });

        // Give the source time to open and seek past existing content
        tokio::time::sleep(Duration::from_millis(600)).await;
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "upi://pay?pa=new@bank").unwrap();

        let payload = next.await.unwrap();
        assert_eq!(payload.as_deref(), Some("upi://pay?pa=new@bank"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
