//! Socket path validation.
//!
//! A socket path is only accepted if a one-shot `tmux -S <path>
//! list-clients` probe succeeds against it. The probe runs outside the
//! control connection with `$TMUX` cleared so it cannot be confused by a
//! surrounding tmux session.

use std::process::Stdio;
use tokio::process::Command;

use crate::error::Error;

pub(crate) async fn validate_socket(binary: &str, path: &str) -> Result<(), Error> {
    let output = Command::new(binary)
        .env("TMUX", "")
        .args(["-S", path, "list-clients"])
        .stdin(Stdio::null())
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::Socket(format!(
                "tmux binary not found while validating socket {path:?}"
            )));
        }
        Err(err) => {
            return Err(Error::Socket(format!("invalid tmux socket {path:?}: {err}")));
        }
    };

    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let msg = combined.trim();

    if msg.to_lowercase().contains("no such file or directory") {
        return Err(Error::Socket(format!(
            "tmux socket {path:?} not available: {msg}"
        )));
    }

    let detail = if msg.is_empty() {
        output.status.to_string()
    } else {
        msg.to_string()
    };
    Err(Error::Socket(format!("invalid tmux socket {path:?}: {detail}")))
}
