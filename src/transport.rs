//! Control-mode transport: spawns `tmux -C` and streams its output.
//!
//! The transport owns the child process. It exposes a serialised send path
//! into the child's stdin, a line stream from its stdout, and a terminal
//! state that resolves exactly once. Any stderr output is treated as fatal:
//! tmux only writes to stderr in control mode for startup diagnostics, and
//! surfacing it through `done` is what lets the router distinguish "tmux
//! refused to start" from a normal end of stream.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tracing::{debug, trace};

use crate::error::Error;
use crate::tracefmt;

/// Buffered inbound lines before the reader task applies backpressure.
const LINE_BUFFER: usize = 128;

/// How a control-mode child process should be spawned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Binary to invoke. Defaults to `tmux` on the search path.
    pub tmux_binary: Option<String>,
    /// Socket path passed as `-S <path>` when set.
    pub socket_path: Option<String>,
    /// Extra arguments appended after the control-mode switch.
    pub extra_args: Vec<String>,
    /// Replacement environment for the child. `None` inherits the parent's.
    pub env: Option<Vec<(String, String)>>,
}

impl TransportConfig {
    /// Config targeting a specific socket path.
    pub fn with_socket(path: impl Into<String>) -> Self {
        Self {
            socket_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub(crate) fn binary(&self) -> &str {
        match self.tmux_binary.as_deref().map(str::trim) {
            Some(bin) if !bin.is_empty() => bin,
            _ => "tmux",
        }
    }
}

/// Low-level interface the router uses to talk to a tmux process.
///
/// Implemented by [`ProcessTransport`]; tests substitute scripted fakes.
#[async_trait]
pub trait ControlTransport: Send + Sync {
    /// Write one command line (newline appended if absent) to the child.
    ///
    /// Concurrent senders are serialised; a command line is never
    /// interleaved with another on the wire.
    async fn send(&self, line: &str) -> Result<(), Error>;

    /// Next inbound line, with newline framing already stripped. Returns
    /// `None` exactly once, when the child's stdout closes.
    async fn recv_line(&self) -> Option<String>;

    /// Resolves when the transport terminates: `Ok` on clean exit or
    /// caller-initiated close, otherwise the first observed failure.
    /// Every await observes the same outcome.
    async fn done(&self) -> Result<(), Error>;

    /// Idempotently close stdin, terminate the child, and drain readers.
    async fn close(&self) -> Result<(), Error>;
}

/// Terminal outcome slot shared by the reader, stderr, and wait tasks.
///
/// First writer wins; a close requested by the caller converts any
/// subsequent failure into a clean termination.
#[derive(Debug)]
struct Terminal {
    done_tx: watch::Sender<Option<Result<(), Error>>>,
    closing: AtomicBool,
}

impl Terminal {
    fn finish(&self, err: Option<Error>) {
        self.done_tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            let outcome = match err {
                Some(err) if !self.closing.load(Ordering::SeqCst) => Err(err),
                _ => Ok(()),
            };
            trace!(target: "transport", ?outcome, "terminal state set");
            *slot = Some(outcome);
            true
        });
    }
}

/// A `tmux -C` subprocess with line-oriented stdin/stdout plumbing.
#[derive(Debug)]
pub struct ProcessTransport {
    stdin: Mutex<Option<ChildStdin>>,
    lines: Mutex<mpsc::Receiver<String>>,
    done_rx: watch::Receiver<Option<Result<(), Error>>>,
    terminal: Arc<Terminal>,
    kill: std::sync::Mutex<Option<oneshot::Sender<()>>>,
}

impl ProcessTransport {
    /// Launch tmux in control mode using the provided configuration.
    pub async fn spawn(cfg: TransportConfig) -> Result<Self, Error> {
        let bin = cfg.binary().to_string();
        let mut args: Vec<String> = vec!["-C".into()];
        if let Some(socket) = cfg.socket_path.as_deref().filter(|s| !s.trim().is_empty()) {
            args.push("-S".into());
            args.push(socket.into());
        }
        args.extend(cfg.extra_args.iter().cloned());

        let mut command = Command::new(&bin);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(env) = &cfg.env {
            command.env_clear();
            command.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let mut child = command.spawn().map_err(|err| Error::Spawn(err.to_string()))?;
        debug!(target: "transport", pid = child.id(), binary = %bin, ?args, "tmux process started");

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Spawn("missing stdin pipe".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Spawn("missing stdout pipe".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Spawn("missing stderr pipe".into()))?;

        let (lines_tx, lines_rx) = mpsc::channel(LINE_BUFFER);
        let (done_tx, done_rx) = watch::channel(None);
        let (kill_tx, kill_rx) = oneshot::channel();
        let terminal = Arc::new(Terminal {
            done_tx,
            closing: AtomicBool::new(false),
        });

        let reader = tokio::spawn(read_stdout(stdout, lines_tx, terminal.clone()));
        let collector = tokio::spawn(collect_stderr(stderr, terminal.clone()));
        tokio::spawn(supervise(child, reader, collector, kill_rx, terminal.clone()));

        Ok(Self {
            stdin: Mutex::new(Some(stdin)),
            lines: Mutex::new(lines_rx),
            done_rx,
            terminal,
            kill: std::sync::Mutex::new(Some(kill_tx)),
        })
    }

    fn stored_outcome(&self) -> Option<Result<(), Error>> {
        self.done_rx.borrow().clone()
    }
}

#[async_trait]
impl ControlTransport for ProcessTransport {
    async fn send(&self, line: &str) -> Result<(), Error> {
        let formatted = tracefmt::format_command(line);
        let mut guard = self.stdin.lock().await;

        if let Some(outcome) = self.stored_outcome() {
            return Err(match outcome {
                Ok(()) => Error::TransportClosed,
                Err(err) => err,
            });
        }

        let Some(stdin) = guard.as_mut() else {
            return Err(Error::TransportClosed);
        };

        let mut payload = line.to_string();
        if !payload.ends_with('\n') {
            payload.push('\n');
        }

        trace!(target: "transport", command = %formatted, "send");

        stdin
            .write_all(payload.as_bytes())
            .await
            .map_err(|err| Error::SendFailure(err.to_string()))?;
        stdin
            .flush()
            .await
            .map_err(|err| Error::SendFailure(err.to_string()))?;
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
        debug!(target: "transport", "close requested");
        self.terminal.closing.store(true, Ordering::SeqCst);

        if let Some(mut stdin) = self.stdin.lock().await.take() {
            let _ = stdin.shutdown().await;
        }

        let kill = self
            .kill
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(kill) = kill {
            let _ = kill.send(());
        }

        match self.stored_outcome() {
            Some(Err(err)) => Err(err),
            _ => Ok(()),
        }
    }
}

async fn read_stdout(
    stdout: tokio::process::ChildStdout,
    lines_tx: mpsc::Sender<String>,
    terminal: Arc<Terminal>,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(text)) => {
                trace!(target: "transport", line = %tracefmt::format_line(&text), "recv");
                if lines_tx.send(text).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                terminal.finish(Some(Error::Transport(format!("stdout read error: {err}"))));
                break;
            }
        }
    }
}

async fn collect_stderr(stderr: tokio::process::ChildStderr, terminal: Arc<Terminal>) {
    let mut payload = String::new();
    let _ = BufReader::new(stderr).read_to_string(&mut payload).await;
    let payload = payload.trim();
    if !payload.is_empty() {
        debug!(target: "transport", stderr = %tracefmt::format_line(payload), "stderr output");
        terminal.finish(Some(Error::Transport(payload.to_string())));
    }
}

/// Wait for both pipe readers to drain, then reap the child. A close
/// request may arrive at any point; the child is killed and its exit
/// status reported as a clean termination.
async fn supervise(
    mut child: Child,
    reader: tokio::task::JoinHandle<()>,
    collector: tokio::task::JoinHandle<()>,
    mut kill_rx: oneshot::Receiver<()>,
    terminal: Arc<Terminal>,
) {
    let readers = async move {
        let _ = reader.await;
        let _ = collector.await;
    };
    tokio::pin!(readers);

    let killed = tokio::select! {
        _ = &mut readers => false,
        _ = &mut kill_rx => {
            let _ = child.start_kill();
            true
        }
    };

    let status = if killed {
        readers.await;
        child.wait().await
    } else {
        tokio::select! {
            status = child.wait() => status,
            _ = &mut kill_rx => {
                let _ = child.start_kill();
                child.wait().await
            }
        }
    };

    match status {
        Ok(status) if status.success() => terminal.finish(None),
        Ok(status) => terminal.finish(Some(Error::Transport(format!("tmux exited: {status}")))),
        Err(err) => terminal.finish(Some(Error::Transport(format!("tmux wait failed: {err}")))),
    }
    debug!(target: "transport", "tmux process finished");
}
