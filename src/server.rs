//! Server-level information.

use crate::error::Error;
use crate::tmux::Tmux;
use crate::types::{Server, Socket};
use crate::vars;

pub(crate) const SERVER_VARS: &[&str] = &[
    vars::SERVER_PID,
    vars::SERVER_SOCKET_PATH,
    vars::SERVER_START_TIME,
    vars::SERVER_UID,
    vars::SERVER_USER,
    vars::SERVER_VERSION,
];

impl Tmux {
    /// Retrieve global tmux server details.
    pub async fn server_information(&self) -> Result<Server, Error> {
        let output = self
            .run_query(self.query().cmd("display-message").vars(SERVER_VARS))
            .await?;
        let record = output.one();

        let socket_path = record.get(vars::SERVER_SOCKET_PATH);
        let socket = if socket_path.is_empty() {
            None
        } else {
            Some(Socket {
                path: socket_path.to_string(),
            })
        };

        Ok(Server {
            pid: record.int(vars::SERVER_PID) as i32,
            socket,
            start_time: record.get(vars::SERVER_START_TIME).to_string(),
            uid: record.get(vars::SERVER_UID).to_string(),
            user: record.get(vars::SERVER_USER).to_string(),
            version: record.get(vars::SERVER_VERSION).to_string(),
        })
    }
}
