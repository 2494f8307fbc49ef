//! Control-mode router: multiplexes commands over one line stream.
//!
//! Many callers issue commands concurrently against a single tmux
//! connection. The router owns the pending queue, matches `%begin` /
//! `%end` / `%error` frames to their requests by sequence number, fans
//! asynchronous notifications out as [`Event`]s, and fails every
//! outstanding caller uniformly when the transport terminates.
//!
//! Protocol anomalies never kill the router; they surface as events so a
//! listener can observe and log them. The only terminal conditions are a
//! caller-initiated close and transport termination.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::error::Error;
use crate::tracefmt;
use crate::transport::ControlTransport;

/// Bounded event buffer; overflow drops the newest event rather than
/// blocking frame intake.
const EVENT_BUFFER: usize = 64;

/// Message used when an `%error` frame carries no text of its own.
const DEFAULT_ERROR_MESSAGE: &str = "tmux reported an error";

/// An asynchronous notification emitted by tmux control mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name without the leading `%`.
    pub name: String,
    /// Whitespace-separated fields following the event name.
    pub fields: Vec<String>,
    /// Raw tail of the line (fields joined with spaces).
    pub data: String,
    /// Full raw line including the leading `%`.
    pub raw: String,
}

/// The completed reply to a single command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// The command string that was sent.
    pub command: String,
    /// Time token from the `%begin` frame, opaque.
    pub time: String,
    /// Sequence-number token used for correlation, opaque.
    pub number: String,
    /// Flags token from the terminating frame, opaque.
    pub flags: String,
    /// Raw output lines in receive order.
    pub lines: Vec<String>,
}

/// Whitespace-delimited tokens of a begin/end/error frame.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameTokens {
    time: String,
    number: String,
    flags: String,
    rest: String,
}

/// A caller's command plus its single-shot reply slot.
struct CommandRequest {
    command: String,
    reply: Mutex<Option<oneshot::Sender<Result<CommandResult, Error>>>>,
}

impl CommandRequest {
    fn new(command: String) -> (Arc<Self>, oneshot::Receiver<Result<CommandResult, Error>>) {
        let (tx, rx) = oneshot::channel();
        let request = Arc::new(Self {
            command,
            reply: Mutex::new(Some(tx)),
        });
        (request, rx)
    }

    fn complete(&self, result: CommandResult) {
        self.deliver(Ok(result));
    }

    fn fail(&self, err: Error) {
        self.deliver(Err(err));
    }

    fn deliver(&self, outcome: Result<CommandResult, Error>) {
        let sender = self
            .reply
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(sender) = sender {
            // A caller that abandoned its reply slot drops the receiver;
            // the send failure is deliberately ignored.
            let _ = sender.send(outcome);
        }
    }
}

/// Bookkeeping for a command whose `%begin` has arrived.
struct CommandState {
    request: Arc<CommandRequest>,
    time: String,
    output: Vec<String>,
}

#[derive(Default)]
struct RouterState {
    pending: VecDeque<Arc<CommandRequest>>,
    inflight: HashMap<String, CommandState>,
    stack: Vec<String>,
    terminal: Option<Error>,
}

/// The request/reply engine over one control-mode connection.
pub struct Router {
    transport: Arc<dyn ControlTransport>,
    state: Mutex<RouterState>,
    events_tx: Mutex<Option<mpsc::Sender<Event>>>,
    events_rx: Mutex<Option<mpsc::Receiver<Event>>>,
}

impl Router {
    /// Create a router over the given transport and start its reader and
    /// supervisor tasks.
    pub fn new(transport: Arc<dyn ControlTransport>) -> Arc<Self> {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let router = Arc::new(Self {
            transport,
            state: Mutex::new(RouterState::default()),
            events_tx: Mutex::new(Some(events_tx)),
            events_rx: Mutex::new(Some(events_rx)),
        });
        debug!(target: "router", "router created");

        let reader = router.clone();
        tokio::spawn(async move {
            while let Some(line) = reader.transport.recv_line().await {
                reader.handle_line(line.trim_end_matches(['\r', '\n']));
            }
            trace!(target: "router", "line stream ended");
            reader.fail_all(Error::TransportClosed);
        });

        let supervisor = router.clone();
        tokio::spawn(async move {
            let err = match supervisor.transport.done().await {
                Ok(()) => Error::TransportClosed,
                Err(err) => err,
            };
            trace!(target: "router", error = %err, "transport done");
            supervisor.fail_all(err);
        });

        router
    }

    /// Run one command and wait for its result or error.
    ///
    /// Fails immediately with [`Error::EmptyCommand`] on a blank command
    /// and with the stored terminal error, without touching the wire, once
    /// the router has failed.
    pub async fn run_command(&self, command: &str) -> Result<CommandResult, Error> {
        let command = command.trim();
        if command.is_empty() {
            return Err(Error::EmptyCommand);
        }

        trace!(target: "router", command = %tracefmt::format_command(command), "dispatch");

        let (request, reply) = CommandRequest::new(command.to_string());
        self.enqueue(request).await?;

        match reply.await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::RouterClosed),
        }
    }

    /// Hand out the event stream. The receiver is produced once; later
    /// calls return `None`. The stream ends when the router closes.
    pub fn take_events(&self) -> Option<mpsc::Receiver<Event>> {
        self.events_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    /// Idempotently fail all outstanding requests with
    /// [`Error::RouterClosed`], end the event stream, and close the
    /// transport.
    pub async fn close(&self) -> Result<(), Error> {
        self.fail_all(Error::RouterClosed);
        self.transport.close().await
    }

    async fn enqueue(&self, request: Arc<CommandRequest>) -> Result<(), Error> {
        {
            let mut state = self.lock_state();
            if let Some(err) = &state.terminal {
                trace!(
                    target: "router",
                    command = %tracefmt::format_command(&request.command),
                    error = %err,
                    "reject"
                );
                return Err(err.clone());
            }
            state.pending.push_back(request.clone());
            trace!(
                target: "router",
                command = %tracefmt::format_command(&request.command),
                pending = state.pending.len(),
                "queued"
            );
        }

        // The write happens outside the lock so a slow writer cannot stall
        // frame intake. On failure, remove this exact request by identity;
        // others may have been matched concurrently.
        if let Err(err) = self.transport.send(&request.command).await {
            let mut state = self.lock_state();
            if let Some(idx) = state
                .pending
                .iter()
                .position(|queued| Arc::ptr_eq(queued, &request))
            {
                state.pending.remove(idx);
            }
            trace!(
                target: "router",
                command = %tracefmt::format_command(&request.command),
                error = %err,
                "send failed"
            );
            return Err(err);
        }

        Ok(())
    }

    fn handle_line(&self, line: &str) {
        if line.is_empty() {
            self.append_output("");
            return;
        }

        if line.starts_with("%begin") {
            self.handle_begin(line);
        } else if line.starts_with("%end") {
            self.handle_end(line);
        } else if line.starts_with("%error") {
            self.handle_error(line);
        } else if line.starts_with('%') {
            self.emit_event(parse_event(line));
        } else {
            self.append_output(line);
        }
    }

    fn handle_begin(&self, line: &str) {
        let frame = match parse_frame(line, "%begin") {
            Ok(frame) => frame,
            Err(detail) => {
                self.emit_event(event_for_error("malformed-begin", line, &detail));
                return;
            }
        };

        let unmatched = {
            let mut state = self.lock_state();
            if state.terminal.is_some() {
                return;
            }
            match state.pending.pop_front() {
                Some(request) => {
                    trace!(
                        target: "router",
                        number = %frame.number,
                        time = %frame.time,
                        flags = %frame.flags,
                        command = %tracefmt::format_command(&request.command),
                        "begin"
                    );
                    state.stack.push(frame.number.clone());
                    state.inflight.insert(
                        frame.number.clone(),
                        CommandState {
                            request,
                            time: frame.time,
                            output: Vec::new(),
                        },
                    );
                    false
                }
                None => true,
            }
        };

        if unmatched {
            self.emit_event(event_for_error(
                "unexpected-begin",
                line,
                "%begin without pending request",
            ));
        }
    }

    fn handle_end(&self, line: &str) {
        match parse_frame(line, "%end") {
            Ok(frame) => self.finish_command(frame, None),
            Err(detail) => self.emit_event(event_for_error("malformed-end", line, &detail)),
        }
    }

    fn handle_error(&self, line: &str) {
        match parse_frame(line, "%error") {
            Ok(frame) => {
                let message = if frame.rest.is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    frame.rest.clone()
                };
                self.finish_command(frame, Some(message));
            }
            Err(detail) => self.emit_event(event_for_error("malformed-error", line, &detail)),
        }
    }

    /// Attach a raw output line to the innermost open reply block, or
    /// surface it as an event when no block is open.
    fn append_output(&self, line: &str) {
        let stray = {
            let mut state = self.lock_state();
            if state.terminal.is_some() {
                return;
            }
            match state.stack.last().cloned() {
                None => Some("orphan-output"),
                Some(current) => match state.inflight.get_mut(&current) {
                    Some(cmd) => {
                        cmd.output.push(line.to_string());
                        None
                    }
                    None => Some("unknown-command-output"),
                },
            }
        };

        if let Some(name) = stray {
            trace!(target: "router", line = %tracefmt::format_line(line), "{name}");
            self.emit_event(Event {
                name: name.to_string(),
                fields: vec![line.to_string()],
                data: line.to_string(),
                raw: line.to_string(),
            });
        }
    }

    fn finish_command(&self, frame: FrameTokens, failure: Option<String>) {
        let removed = {
            let mut state = self.lock_state();
            if state.terminal.is_some() {
                return;
            }
            match state.inflight.remove(&frame.number) {
                Some(cmd) => {
                    remove_from_stack(&mut state.stack, &frame.number);
                    Some(cmd)
                }
                None => None,
            }
        };

        let Some(cmd) = removed else {
            let (name, detail) = if failure.is_some() {
                ("unexpected-error", "%error without matching request")
            } else {
                ("unexpected-end", "%end without matching request")
            };
            trace!(target: "router", number = %frame.number, "missing state for frame");
            self.emit_event(event_for_error(name, &frame.number, detail));
            return;
        };

        let result = CommandResult {
            command: cmd.request.command.clone(),
            time: cmd.time,
            number: frame.number,
            flags: frame.flags,
            lines: cmd.output,
        };

        match failure {
            Some(message) => {
                trace!(
                    target: "router",
                    number = %result.number,
                    command = %tracefmt::format_command(&result.command),
                    message = %tracefmt::format_line(&message),
                    "error"
                );
                let err = Error::CommandFailed {
                    command: result.command.clone(),
                    message,
                    result,
                };
                cmd.request.fail(err);
            }
            None => {
                trace!(
                    target: "router",
                    number = %result.number,
                    command = %tracefmt::format_command(&result.command),
                    output = %tracefmt::summarise_lines(&result.lines),
                    "complete"
                );
                cmd.request.complete(result);
            }
        }
    }

    /// Set the terminal error (first writer wins), drain every pending and
    /// in-flight request, deliver the error to each, and end the event
    /// stream.
    fn fail_all(&self, err: Error) {
        let (pending, inflight) = {
            let mut state = self.lock_state();
            if state.terminal.is_some() {
                return;
            }
            state.terminal = Some(err.clone());
            let pending: Vec<_> = state.pending.drain(..).collect();
            let inflight: Vec<_> = state.inflight.drain().map(|(_, cmd)| cmd).collect();
            state.stack.clear();
            debug!(
                target: "router",
                error = %err,
                pending = pending.len(),
                inflight = inflight.len(),
                "failing all requests"
            );
            (pending, inflight)
        };

        for request in pending {
            request.fail(err.clone());
        }
        for cmd in inflight {
            cmd.request.fail(err.clone());
        }

        // Dropping the sender ends the event stream; the slot is emptied
        // exactly once because the terminal check above is a barrier.
        self.events_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
    }

    fn emit_event(&self, event: Event) {
        let guard = self
            .events_tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(tx) = guard.as_ref() else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                trace!(target: "router", name = %event.name, "event dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn remove_from_stack(stack: &mut Vec<String>, number: &str) {
    // Fast path: most of the time the finished command is the most recent.
    if stack.last().is_some_and(|top| top == number) {
        stack.pop();
        return;
    }
    if let Some(idx) = stack.iter().position(|entry| entry == number) {
        stack.remove(idx);
        trace!(target: "router", number, remaining = stack.len(), "removed mid-stack entry");
    }
}

/// Split a begin/end/error frame into its time/number/flags tokens and
/// optional tail.
fn parse_frame(line: &str, prefix: &str) -> Result<FrameTokens, String> {
    let Some(payload) = line.strip_prefix(prefix) else {
        return Err(format!("unexpected prefix for {prefix}: {line:?}"));
    };

    let payload = payload.trim();
    let parts: Vec<&str> = payload.splitn(4, ' ').collect();
    if parts.len() < 3 {
        return Err(format!("malformed {prefix} line: {line:?}"));
    }

    Ok(FrameTokens {
        time: parts[0].to_string(),
        number: parts[1].to_string(),
        flags: parts[2].to_string(),
        rest: parts.get(3).map(|rest| rest.trim()).unwrap_or_default().to_string(),
    })
}

/// Parse a sentinel-prefixed notification line into an [`Event`].
fn parse_event(line: &str) -> Event {
    let raw = line.trim();
    let body = raw.strip_prefix('%').unwrap_or(raw);

    let (name, data) = match body.find(' ') {
        Some(idx) => (&body[..idx], body[idx + 1..].trim()),
        None => (body, ""),
    };

    let fields = if data.is_empty() {
        Vec::new()
    } else {
        data.split_whitespace().map(str::to_string).collect()
    };

    Event {
        name: name.to_string(),
        fields,
        data: data.to_string(),
        raw: line.to_string(),
    }
}

/// Event describing a protocol anomaly the router recovered from.
fn event_for_error(name: &str, raw: &str, detail: &str) -> Event {
    Event {
        name: name.to_string(),
        fields: vec![raw.to_string()],
        data: detail.to_string(),
        raw: raw.to_string(),
    }
}
