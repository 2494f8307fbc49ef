//! muxlink — drive a running tmux server through control mode.
//!
//! This crate opens one long-lived `tmux -C` connection and multiplexes
//! commands over it: each command's framed reply is routed back to its
//! caller while asynchronous notifications surface as events. Typed
//! wrappers for sessions, windows, panes, clients, and options sit on top
//! of the raw command surface.
//!
//! # Quick start
//!
//! ```no_run
//! use muxlink::{SessionOptions, Tmux};
//!
//! # async fn example() -> Result<(), muxlink::Error> {
//! let tmux = Tmux::default_socket().await?;
//! let session = tmux
//!     .new_session(&SessionOptions {
//!         name: Some("build".into()),
//!         ..SessionOptions::default()
//!     })
//!     .await?;
//! for window in session.list_windows().await? {
//!     println!("{}: {}", window.index, window.name);
//! }
//! tmux.close().await?;
//! # Ok(())
//! # }
//! ```

/// Client enumeration and lookup.
mod client;
/// Error types used across crate modules.
pub mod error;
/// Option get/set/delete operations.
mod options;
/// Pane listing, capture, and manipulation.
mod pane;
/// Command composition and record decoding for format queries.
mod query;
/// Command/reply correlation and event fan-out.
pub mod router;
/// Session listing, creation, and lifecycle operations.
mod session;
/// Server-level information.
mod server;
/// Socket path validation.
mod socket;
#[cfg(test)]
/// Shared testing utilities compiled only for tests.
pub mod testsupport;
/// Public façade over a control-mode connection.
pub mod tmux;
/// Trace-log normalisation helpers.
mod tracefmt;
/// Subprocess transport for `tmux -C`.
pub mod transport;
/// Entity data types and per-operation options.
pub mod types;
/// tmux format-variable names.
mod vars;
/// Window listing and manipulation.
mod window;

pub use error::Error;
pub use router::{CommandResult, Event, Router};
pub use tmux::Tmux;
pub use transport::{ControlTransport, ProcessTransport, TransportConfig};
pub use types::{
    AttachSessionOptions, CaptureOptions, ChooseTreeOptions, Client, DetachClientOptions,
    NewWindowOptions, OptionScope, Pane, PanePosition, PaneSplitDirection, SelectPaneOptions,
    Server, Session, SessionOptions, Socket, SplitWindowOptions, SwitchClientOptions, TmuxOption,
    Window, WindowLayout,
};
