//! Client enumeration and lookup.

use crate::error::Error;
use crate::query::QueryRecord;
use crate::tmux::Tmux;
use crate::types::{Client, Session};
use crate::vars;

pub(crate) const CLIENT_VARS: &[&str] = &[
    vars::CLIENT_ACTIVITY,
    vars::CLIENT_CELL_HEIGHT,
    vars::CLIENT_CELL_WIDTH,
    vars::CLIENT_CONTROL_MODE,
    vars::CLIENT_CREATED,
    vars::CLIENT_DISCARDED,
    vars::CLIENT_FLAGS,
    vars::CLIENT_HEIGHT,
    vars::CLIENT_KEY_TABLE,
    vars::CLIENT_LAST_SESSION,
    vars::CLIENT_NAME,
    vars::CLIENT_PID,
    vars::CLIENT_PREFIX,
    vars::CLIENT_READONLY,
    vars::CLIENT_SESSION,
    vars::CLIENT_TERMNAME,
    vars::CLIENT_TERMFEATURES,
    vars::CLIENT_TERMTYPE,
    vars::CLIENT_TTY,
    vars::CLIENT_UID,
    vars::CLIENT_USER,
    vars::CLIENT_UTF8,
    vars::CLIENT_WIDTH,
    vars::CLIENT_WRITTEN,
];

pub(crate) fn client_from_record(record: &QueryRecord, tmux: &Tmux) -> Client {
    Client {
        activity: record.get(vars::CLIENT_ACTIVITY).to_string(),
        cell_height: record.int(vars::CLIENT_CELL_HEIGHT),
        cell_width: record.int(vars::CLIENT_CELL_WIDTH),
        control_mode: record.flag(vars::CLIENT_CONTROL_MODE),
        created: record.get(vars::CLIENT_CREATED).to_string(),
        discarded: record.get(vars::CLIENT_DISCARDED).to_string(),
        flags: record.get(vars::CLIENT_FLAGS).to_string(),
        height: record.int(vars::CLIENT_HEIGHT),
        key_table: record.get(vars::CLIENT_KEY_TABLE).to_string(),
        last_session: record.get(vars::CLIENT_LAST_SESSION).to_string(),
        name: record.get(vars::CLIENT_NAME).to_string(),
        pid: record.int(vars::CLIENT_PID) as i32,
        prefix: record.flag(vars::CLIENT_PREFIX),
        readonly: record.flag(vars::CLIENT_READONLY),
        session: record.get(vars::CLIENT_SESSION).to_string(),
        termfeatures: record.get(vars::CLIENT_TERMFEATURES).to_string(),
        termname: record.get(vars::CLIENT_TERMNAME).to_string(),
        termtype: record.get(vars::CLIENT_TERMTYPE).to_string(),
        tty: record.get(vars::CLIENT_TTY).to_string(),
        uid: record.int(vars::CLIENT_UID) as i32,
        user: record.get(vars::CLIENT_USER).to_string(),
        utf8: record.flag(vars::CLIENT_UTF8),
        width: record.int(vars::CLIENT_WIDTH),
        written: record.get(vars::CLIENT_WRITTEN).to_string(),
        tmux: tmux.clone(),
    }
}

impl Tmux {
    /// Enumerate the clients attached to the server.
    pub async fn list_clients(&self) -> Result<Vec<Client>, Error> {
        let output = self
            .run_query(self.query().cmd("list-clients").vars(CLIENT_VARS))
            .await?;
        Ok(output
            .collect()
            .iter()
            .map(|record| client_from_record(record, self))
            .collect())
    }

    /// Look a client up by its tty path.
    pub async fn client_by_tty(&self, tty: &str) -> Result<Option<Client>, Error> {
        let clients = self.list_clients().await?;
        Ok(clients.into_iter().find(|client| client.tty == tty))
    }

    /// The first client attached to the server, if any.
    pub async fn first_client(&self) -> Result<Option<Client>, Error> {
        let clients = self.list_clients().await?;
        Ok(clients.into_iter().next())
    }
}

impl Client {
    /// The session this client is attached to.
    pub async fn session(&self) -> Result<Option<Session>, Error> {
        self.tmux.session_by_name(&self.session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RECORD_SEPARATOR;
    use crate::testsupport::{respond_success, FakeTransport};

    fn client_record(tty: &str, session: &str) -> String {
        CLIENT_VARS
            .iter()
            .map(|var| match *var {
                vars::CLIENT_TTY => tty,
                vars::CLIENT_SESSION => session,
                vars::CLIENT_CONTROL_MODE => "1",
                vars::CLIENT_PID => "101",
                _ => "",
            })
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR)
    }

    #[tokio::test]
    async fn list_clients_decodes_records() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_success(
            controls,
            &[
                &client_record("/dev/ttys001", "work"),
                &client_record("/dev/ttys002", "scratch"),
            ],
        );

        let clients = tmux.list_clients().await.expect("clients");
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].tty, "/dev/ttys001");
        assert_eq!(clients[0].session, "work");
        assert!(clients[0].control_mode);
        assert_eq!(clients[0].pid, 101);

        let sent = responder.await.expect("responder");
        assert!(sent.starts_with("list-clients -F '#{client_activity}-:-"));

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn client_by_tty_filters_listing() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_success(
            controls,
            &[
                &client_record("/dev/ttys001", "work"),
                &client_record("/dev/ttys002", "scratch"),
            ],
        );

        let client = tmux
            .client_by_tty("/dev/ttys002")
            .await
            .expect("lookup")
            .expect("client");
        assert_eq!(client.session, "scratch");
        responder.await.expect("responder");

        tmux.close().await.expect("close");
    }
}
