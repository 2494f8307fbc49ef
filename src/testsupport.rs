//! Shared test fixtures for transport/router/query test modules.
//!
//! Keeping the fake transport and the fake-tmux script writer here prevents
//! each test module from rebuilding ad-hoc plumbing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, watch, Mutex};

use crate::error::Error;
use crate::transport::ControlTransport;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
///
/// Intentionally simple and std-only so unit tests can use it without
/// introducing new dependencies.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("muxlink-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Write an executable shell script that stands in for the tmux binary.
///
/// The script body receives control-mode commands on stdin and answers on
/// stdout, so transport and integration tests run hermetically.
pub fn write_fake_tmux(dir: &TestTempDir, script: &str) -> String {
    let path = dir.path().join("fake_tmux.sh");
    fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("failed to write fake tmux script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to mark fake tmux script executable");
    }
    path.to_string_lossy().into_owned()
}

type Outcome = Option<Result<(), Error>>;

/// Scripted in-memory transport for router tests.
///
/// Tests drive it through [`FakeControls`]: observe sent commands, push
/// reply lines, and force the terminal state.
pub struct FakeTransport {
    sent_tx: mpsc::UnboundedSender<String>,
    lines: Mutex<mpsc::Receiver<String>>,
    done: Arc<watch::Sender<Outcome>>,
    done_rx: watch::Receiver<Outcome>,
    send_error: StdMutex<Option<Error>>,
}

/// Test-side handle for a [`FakeTransport`].
pub struct FakeControls {
    /// Commands the router wrote to the wire, in order.
    pub sent: mpsc::UnboundedReceiver<String>,
    lines: mpsc::Sender<String>,
    done: Arc<watch::Sender<Outcome>>,
}

impl FakeTransport {
    pub fn new() -> (Arc<Self>, FakeControls) {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (lines_tx, lines_rx) = mpsc::channel(32);
        let (done_tx, done_rx) = watch::channel(None);
        let done = Arc::new(done_tx);

        let transport = Arc::new(Self {
            sent_tx,
            lines: Mutex::new(lines_rx),
            done: done.clone(),
            done_rx,
            send_error: StdMutex::new(None),
        });
        let controls = FakeControls {
            sent: sent_rx,
            lines: lines_tx,
            done,
        };
        (transport, controls)
    }

    /// Make every subsequent `send` fail with the given error.
    pub fn fail_sends(&self, err: Error) {
        *self
            .send_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(err);
    }
}

impl FakeControls {
    /// Feed one inbound line to the router.
    pub async fn push_line(&self, line: &str) {
        let _ = self.lines.send(line.to_string()).await;
    }

    /// Force the transport's terminal state (first writer wins).
    pub fn finish(&self, outcome: Result<(), Error>) {
        self.done.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        });
    }
}

/// One scripted reply block for [`respond_sequence`].
pub struct FakeReply {
    pub lines: Vec<String>,
    pub error: Option<String>,
}

impl FakeReply {
    pub fn success(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            lines: Vec::new(),
            error: Some(message.to_string()),
        }
    }
}

/// Answer each sent command, in order, with the matching scripted reply.
/// Resolves to the commands that were sent.
pub fn respond_sequence(
    mut controls: FakeControls,
    replies: Vec<FakeReply>,
) -> tokio::task::JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let mut sent_commands = Vec::new();
        for (idx, reply) in replies.into_iter().enumerate() {
            let sent = controls.sent.recv().await.expect("command sent");
            sent_commands.push(sent);
            let number = idx + 1;
            controls.push_line(&format!("%begin 1 {number} 0")).await;
            for line in &reply.lines {
                controls.push_line(line).await;
            }
            match reply.error {
                Some(message) => {
                    controls
                        .push_line(&format!("%error 1 {number} 0 {message}"))
                        .await;
                }
                None => controls.push_line(&format!("%end 1 {number} 0")).await,
            }
        }
        sent_commands
    })
}

/// Answer the next sent command with one successful reply block.
pub fn respond_success(
    controls: FakeControls,
    lines: &[&str],
) -> tokio::task::JoinHandle<String> {
    let handle = respond_sequence(controls, vec![FakeReply::success(lines)]);
    tokio::spawn(async move {
        handle
            .await
            .expect("responder")
            .into_iter()
            .next()
            .expect("one command")
    })
}

#[async_trait::async_trait]
impl ControlTransport for FakeTransport {
    async fn send(&self, line: &str) -> Result<(), Error> {
        let forced = self
            .send_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(err) = forced {
            return Err(err);
        }
        let _ = self.sent_tx.send(line.to_string());
        Ok(())
    }

    async fn recv_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }

    async fn done(&self) -> Result<(), Error> {
        let mut rx = self.done_rx.clone();
        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return outcome;
            }
            if rx.changed().await.is_err() {
                return Err(Error::TransportClosed);
            }
        }
    }

    async fn close(&self) -> Result<(), Error> {
        self.done.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(Ok(()));
            true
        });
        Ok(())
    }
}
