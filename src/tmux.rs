//! Public façade over a control-mode connection.
//!
//! [`Tmux`] owns the router (and through it the transport) and exposes the
//! command surface the entity wrappers build on. The handle is cheap to
//! clone; every clone talks to the same connection.

use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Error;
use crate::query::{build_command, Query, QueryOutput};
use crate::router::{CommandResult, Event, Router};
use crate::socket::validate_socket;
use crate::transport::{ControlTransport, ProcessTransport, TransportConfig};
use crate::types::Socket;

/// Handle to one tmux control-mode connection.
#[derive(Clone)]
pub struct Tmux {
    router: Arc<Router>,
    socket: Option<Socket>,
}

impl Tmux {
    /// Connect to tmux by spawning `tmux -C` with the given configuration.
    ///
    /// When the configuration carries no extra arguments and a session
    /// already exists on the target socket, the control client attaches to
    /// the first one; otherwise tmux decides (usually by creating a
    /// session). A configured socket path is validated with a one-shot
    /// probe before the connection is handed out.
    pub async fn connect(cfg: TransportConfig) -> Result<Self, Error> {
        let mut cfg = cfg;
        if cfg.extra_args.is_empty() {
            if let Some(target) =
                discover_attach_target(cfg.binary(), cfg.socket_path.as_deref()).await
            {
                debug!(target: "client", session = %target, "attaching to existing session");
                cfg.extra_args = vec!["attach-session".into(), "-t".into(), target];
            }
        }

        let socket_path = cfg.socket_path.clone().filter(|path| !path.trim().is_empty());
        let binary = cfg.binary().to_string();
        let transport = Arc::new(ProcessTransport::spawn(cfg).await?);

        let socket = match socket_path {
            Some(path) => match validate_socket(&binary, &path).await {
                Ok(()) => Some(Socket { path }),
                Err(err) => {
                    let _ = transport.close().await;
                    return Err(err);
                }
            },
            None => None,
        };

        Ok(Self {
            router: Router::new(transport),
            socket,
        })
    }

    /// Connect to the server behind a specific socket path.
    pub async fn new(socket_path: impl Into<String>) -> Result<Self, Error> {
        Self::connect(TransportConfig::with_socket(socket_path.into())).await
    }

    /// Connect using tmux defaults (the current user's default socket).
    pub async fn default_socket() -> Result<Self, Error> {
        Self::connect(TransportConfig::default()).await
    }

    /// Build a connection over an already-constructed transport.
    ///
    /// This is the dependency-injection seam: tests and alternative
    /// transports plug in here.
    pub fn with_transport(transport: Arc<dyn ControlTransport>) -> Self {
        Self {
            router: Router::new(transport),
            socket: None,
        }
    }

    /// The validated socket this connection was opened against, if any.
    pub fn socket(&self) -> Option<&Socket> {
        self.socket.as_ref()
    }

    /// Run a raw control-mode command and wait for its reply block.
    pub async fn run_command(&self, command: &str) -> Result<CommandResult, Error> {
        self.router.run_command(command).await
    }

    /// Run a command assembled from parts, quoting parts that contain
    /// shell metacharacters, and return the joined output lines.
    pub async fn command(&self, parts: &[&str]) -> Result<String, Error> {
        let command = build_command(parts)?;
        let result = self.run_command(&command).await?;
        Ok(result.lines.join("\n"))
    }

    /// The asynchronous notification stream. Produced once; later calls
    /// return `None`. Ends when the connection closes.
    pub fn events(&self) -> Option<mpsc::Receiver<Event>> {
        self.router.take_events()
    }

    /// Idempotently shut down the router and the underlying transport.
    /// Outstanding commands fail with [`Error::RouterClosed`].
    pub async fn close(&self) -> Result<(), Error> {
        self.router.close().await
    }

    pub(crate) fn query(&self) -> Query {
        Query::new()
    }

    pub(crate) async fn run_query(&self, query: Query) -> Result<QueryOutput, Error> {
        let command = query.build()?;
        let variables = query.variables().to_vec();
        let result = self.run_command(&command).await?;
        Ok(QueryOutput::new(result, variables))
    }
}

impl fmt::Debug for Tmux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tmux").field("socket", &self.socket).finish()
    }
}

/// Probe for an existing session to attach the control client to.
///
/// Runs a one-shot `tmux [-S socket] list-sessions` outside the control
/// connection. Every failure mode (no server, no binary, exit code 1)
/// resolves to `None`: attaching is opportunistic.
async fn discover_attach_target(binary: &str, socket_path: Option<&str>) -> Option<String> {
    let mut command = Command::new(binary);
    if let Some(path) = socket_path.filter(|path| !path.trim().is_empty()) {
        command.arg("-S").arg(path);
    }
    command
        .args(["list-sessions", "-F", "#{session_name}"])
        .stdin(Stdio::null());

    let output = command.output().await.ok()?;
    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
