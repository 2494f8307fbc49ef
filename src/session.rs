//! Session listing, creation, and lifecycle operations.

use crate::error::Error;
use crate::query::{check_session_name, QueryRecord};
use crate::tmux::Tmux;
use crate::types::{
    AttachSessionOptions, Client, DetachClientOptions, Session, SessionOptions,
    SwitchClientOptions, TmuxOption,
};
use crate::vars;

pub(crate) const SESSION_VARS: &[&str] = &[
    vars::SESSION_ACTIVITY,
    vars::SESSION_ALERTS,
    vars::SESSION_ATTACHED,
    vars::SESSION_ATTACHED_LIST,
    vars::SESSION_CREATED,
    vars::SESSION_FORMAT,
    vars::SESSION_GROUP,
    vars::SESSION_GROUP_ATTACHED,
    vars::SESSION_GROUP_ATTACHED_LIST,
    vars::SESSION_GROUP_LIST,
    vars::SESSION_GROUP_MANY_ATTACHED,
    vars::SESSION_GROUP_SIZE,
    vars::SESSION_GROUPED,
    vars::SESSION_ID,
    vars::SESSION_LAST_ATTACHED,
    vars::SESSION_MANY_ATTACHED,
    vars::SESSION_MARKED,
    vars::SESSION_NAME,
    vars::SESSION_PATH,
    vars::SESSION_STACK,
    vars::SESSION_WINDOWS,
];

pub(crate) fn session_from_record(record: &QueryRecord, tmux: &Tmux) -> Session {
    Session {
        activity: record.get(vars::SESSION_ACTIVITY).to_string(),
        alerts: record.get(vars::SESSION_ALERTS).to_string(),
        attached: record.int(vars::SESSION_ATTACHED),
        attached_list: record.list(vars::SESSION_ATTACHED_LIST),
        created: record.get(vars::SESSION_CREATED).to_string(),
        format: record.flag(vars::SESSION_FORMAT),
        group: record.get(vars::SESSION_GROUP).to_string(),
        group_attached: record.int(vars::SESSION_GROUP_ATTACHED),
        group_attached_list: record.list(vars::SESSION_GROUP_ATTACHED_LIST),
        group_list: record.list(vars::SESSION_GROUP_LIST),
        group_many_attached: record.flag(vars::SESSION_GROUP_MANY_ATTACHED),
        group_size: record.int(vars::SESSION_GROUP_SIZE),
        grouped: record.flag(vars::SESSION_GROUPED),
        id: record.get(vars::SESSION_ID).to_string(),
        last_attached: record.get(vars::SESSION_LAST_ATTACHED).to_string(),
        many_attached: record.flag(vars::SESSION_MANY_ATTACHED),
        marked: record.flag(vars::SESSION_MARKED),
        name: record.get(vars::SESSION_NAME).to_string(),
        path: record.get(vars::SESSION_PATH).to_string(),
        stack: record.get(vars::SESSION_STACK).to_string(),
        windows: record.int(vars::SESSION_WINDOWS),
        tmux: tmux.clone(),
    }
}

impl Tmux {
    /// List all sessions on the server.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, Error> {
        let output = self
            .run_query(self.query().cmd("list-sessions").vars(SESSION_VARS))
            .await?;
        Ok(output
            .collect()
            .iter()
            .map(|record| session_from_record(record, self))
            .collect())
    }

    /// Whether a session with the given name exists.
    pub async fn has_session(&self, name: &str) -> bool {
        self.run_query(self.query().cmd("has-session").fargs(&["-t", name]))
            .await
            .is_ok()
    }

    /// Look a session up by name.
    pub async fn session_by_name(&self, name: &str) -> Result<Option<Session>, Error> {
        let sessions = self.list_sessions().await?;
        Ok(sessions.into_iter().find(|session| session.name == name))
    }

    /// Create a new detached session.
    pub async fn new_session(&self, options: &SessionOptions) -> Result<Session, Error> {
        let mut query = self
            .query()
            .cmd("new-session")
            .fargs(&["-d", "-P"])
            .vars(SESSION_VARS);

        if let Some(name) = options.name.as_deref() {
            if !check_session_name(name) {
                return Err(Error::InvalidArgument("invalid tmux session name".into()));
            }
            query = query.fargs(&["-s", name]);
        }
        if let Some(dir) = options.start_directory.as_deref() {
            query = query.fargs(&["-c", dir]);
        }
        if let Some(width) = options.width {
            query = query.fargs(&["-x", &width.to_string()]);
        }
        if let Some(height) = options.height {
            query = query.fargs(&["-y", &height.to_string()]);
        }
        if let Some(shell_command) = options.shell_command.as_deref() {
            query = query.pargs(&[&format!("'{shell_command}'")]);
        }

        let output = self.run_query(query).await?;
        Ok(session_from_record(&output.one(), self))
    }

    /// Detach the specified client or every client of a session.
    pub async fn detach_client(&self, options: &DetachClientOptions) -> Result<(), Error> {
        let mut query = self.query().cmd("detach-client");
        if let Some(client) = options.target_client.as_deref() {
            query = query.fargs(&["-t", client]);
        } else if let Some(session) = options.target_session.as_deref() {
            query = query.fargs(&["-s", session]);
        }
        self.run_query(query).await?;
        Ok(())
    }

    /// Switch a client to a target session.
    pub async fn switch_client(&self, options: &SwitchClientOptions) -> Result<(), Error> {
        let mut query = self.query().cmd("switch-client");
        if let Some(client) = options.target_client.as_deref() {
            query = query.fargs(&["-c", client]);
        }
        if let Some(session) = options.target_session.as_deref() {
            query = query.fargs(&["-t", session]);
        }
        self.run_query(query).await?;
        Ok(())
    }

    /// Terminate the tmux server.
    pub async fn kill_server(&self) -> Result<(), Error> {
        self.run_query(self.query().cmd("kill-server")).await?;
        Ok(())
    }
}

impl Session {
    /// Clients currently attached to this session.
    pub async fn list_clients(&self) -> Result<Vec<Client>, Error> {
        let clients = self.tmux.list_clients().await?;
        Ok(clients
            .into_iter()
            .filter(|client| client.session == self.name)
            .collect())
    }

    /// Attach the control client to this session.
    pub async fn attach(&self, options: &AttachSessionOptions) -> Result<(), Error> {
        let mut query = self
            .tmux
            .query()
            .cmd("attach-session")
            .fargs(&["-t", &self.name]);
        if options.detach_clients {
            query = query.fargs(&["-d"]);
        }
        if let Some(dir) = options.working_dir.as_deref() {
            query = query.fargs(&["-c", dir]);
        }
        self.tmux.run_query(query).await?;
        Ok(())
    }

    /// Detach every client from this session.
    pub async fn detach(&self) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("detach-client")
                    .fargs(&["-s", &self.name]),
            )
            .await?;
        Ok(())
    }

    /// Terminate the session.
    pub async fn kill(&self) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("kill-session")
                    .fargs(&["-t", &self.name]),
            )
            .await?;
        Ok(())
    }

    /// Rename the session.
    pub async fn rename(&self, name: &str) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("rename-session")
                    .fargs(&["-t", &self.name])
                    .pargs(&[name]),
            )
            .await?;
        Ok(())
    }

    /// Set a session-scoped option.
    pub async fn set_option(&self, key: &str, value: &str) -> Result<(), Error> {
        self.tmux
            .set_option(&self.name, key, value, Default::default())
            .await
    }

    /// Retrieve a session option value.
    pub async fn option(&self, key: &str) -> Result<TmuxOption, Error> {
        self.tmux.option(&self.name, key, Default::default()).await
    }

    /// List all session options.
    pub async fn options(&self) -> Result<Vec<TmuxOption>, Error> {
        self.tmux.options(&self.name, Default::default()).await
    }

    /// Remove a session option.
    pub async fn delete_option(&self, key: &str) -> Result<(), Error> {
        self.tmux
            .delete_option(&self.name, key, Default::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RECORD_SEPARATOR;
    use crate::testsupport::{respond_sequence, respond_success, FakeReply, FakeTransport};

    fn session_record(name: &str, path: &str, windows: &str) -> String {
        SESSION_VARS
            .iter()
            .map(|var| match *var {
                vars::SESSION_NAME => name,
                vars::SESSION_PATH => path,
                vars::SESSION_WINDOWS => windows,
                vars::SESSION_ATTACHED => "1",
                vars::SESSION_GROUPED => "0",
                _ => "",
            })
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR)
    }

    #[tokio::test]
    async fn list_sessions_decodes_records() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_success(
            controls,
            &[
                &session_record("main", "/home/dev", "3"),
                &session_record("scratch", "/tmp", "1"),
            ],
        );

        let sessions = tmux.list_sessions().await.expect("sessions");
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].name, "main");
        assert_eq!(sessions[0].path, "/home/dev");
        assert_eq!(sessions[0].windows, 3);
        assert_eq!(sessions[0].attached, 1);
        assert!(!sessions[0].grouped);
        assert_eq!(sessions[1].name, "scratch");

        let sent = responder.await.expect("responder");
        assert!(
            sent.starts_with("list-sessions -F '#{session_activity}-:-"),
            "unexpected command: {sent}"
        );

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn session_by_name_filters_listing() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_success(controls, &[&session_record("work", "/src", "2")]);

        let found = tmux.session_by_name("work").await.expect("lookup");
        assert_eq!(found.expect("session").name, "work");
        responder.await.expect("responder");

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn has_session_is_false_on_command_error() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![FakeReply::failure("can't find session missing")],
        );

        assert!(!tmux.has_session("missing").await);
        let sent = responder.await.expect("responder");
        assert_eq!(sent, vec!["has-session -t missing"]);

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn new_session_builds_flags_and_positionals() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_success(controls, &[&session_record("build", "/src", "1")]);

        let session = tmux
            .new_session(&SessionOptions {
                name: Some("build".into()),
                start_directory: Some("/src".into()),
                width: Some(80),
                height: Some(24),
                shell_command: Some("htop".into()),
            })
            .await
            .expect("session");
        assert_eq!(session.name, "build");

        let sent = responder.await.expect("responder");
        assert!(sent.starts_with("new-session -d -P -s build -c /src -x 80 -y 24 -F"));
        assert!(sent.ends_with("'htop'"), "unexpected command: {sent}");

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn new_session_rejects_invalid_names() {
        let (fake, _controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);

        let err = tmux
            .new_session(&SessionOptions {
                name: Some("bad:name".into()),
                ..SessionOptions::default()
            })
            .await
            .expect_err("name with colon");
        assert_eq!(
            err,
            Error::InvalidArgument("invalid tmux session name".into())
        );

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn session_lifecycle_commands_target_by_name() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&session_record("work", "/src", "1")]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
            ],
        );

        let session = tmux
            .session_by_name("work")
            .await
            .expect("lookup")
            .expect("session");
        session.rename("renamed").await.expect("rename");
        session.detach().await.expect("detach");
        session.kill().await.expect("kill");

        let sent = responder.await.expect("responder");
        assert_eq!(sent[1], "rename-session -t work renamed");
        assert_eq!(sent[2], "detach-client -s work");
        assert_eq!(sent[3], "kill-session -t work");

        tmux.close().await.expect("close");
    }
}
