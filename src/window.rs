//! Window listing and manipulation.

use std::collections::HashSet;

use crate::error::Error;
use crate::query::QueryRecord;
use crate::tmux::Tmux;
use crate::types::{
    Client, NewWindowOptions, Pane, Session, TmuxOption, OptionScope, Window, WindowLayout,
};
use crate::vars;

pub(crate) const WINDOW_VARS: &[&str] = &[
    vars::WINDOW_ACTIVE,
    vars::WINDOW_ACTIVE_CLIENTS,
    vars::WINDOW_ACTIVE_CLIENTS_LIST,
    vars::WINDOW_ACTIVE_SESSIONS,
    vars::WINDOW_ACTIVE_SESSIONS_LIST,
    vars::WINDOW_ACTIVITY,
    vars::WINDOW_ACTIVITY_FLAG,
    vars::WINDOW_BELL_FLAG,
    vars::WINDOW_BIGGER,
    vars::WINDOW_CELL_HEIGHT,
    vars::WINDOW_CELL_WIDTH,
    vars::WINDOW_END_FLAG,
    vars::WINDOW_FLAGS,
    vars::WINDOW_FORMAT,
    vars::WINDOW_HEIGHT,
    vars::WINDOW_ID,
    vars::WINDOW_INDEX,
    vars::WINDOW_LAST_FLAG,
    vars::WINDOW_LAYOUT,
    vars::WINDOW_LINKED,
    vars::WINDOW_LINKED_SESSIONS,
    vars::WINDOW_LINKED_SESSIONS_LIST,
    vars::WINDOW_MARKED_FLAG,
    vars::WINDOW_NAME,
    vars::WINDOW_OFFSET_X,
    vars::WINDOW_OFFSET_Y,
    vars::WINDOW_PANES,
    vars::WINDOW_RAW_FLAGS,
    vars::WINDOW_SILENCE_FLAG,
    vars::WINDOW_STACK_INDEX,
    vars::WINDOW_START_FLAG,
    vars::WINDOW_VISIBLE_LAYOUT,
    vars::WINDOW_WIDTH,
    vars::WINDOW_ZOOMED_FLAG,
    vars::SESSION_NAME,
];

pub(crate) fn window_from_record(record: &QueryRecord, tmux: &Tmux) -> Window {
    Window {
        active: record.flag(vars::WINDOW_ACTIVE),
        active_clients: record.int(vars::WINDOW_ACTIVE_CLIENTS),
        active_clients_list: record.list(vars::WINDOW_ACTIVE_CLIENTS_LIST),
        active_sessions: record.int(vars::WINDOW_ACTIVE_SESSIONS),
        active_sessions_list: record.list(vars::WINDOW_ACTIVE_SESSIONS_LIST),
        activity: record.get(vars::WINDOW_ACTIVITY).to_string(),
        activity_flag: record.flag(vars::WINDOW_ACTIVITY_FLAG),
        bell_flag: record.flag(vars::WINDOW_BELL_FLAG),
        bigger: record.flag(vars::WINDOW_BIGGER),
        cell_height: record.int(vars::WINDOW_CELL_HEIGHT),
        cell_width: record.int(vars::WINDOW_CELL_WIDTH),
        end_flag: record.flag(vars::WINDOW_END_FLAG),
        flags: record.get(vars::WINDOW_FLAGS).to_string(),
        format: record.flag(vars::WINDOW_FORMAT),
        height: record.int(vars::WINDOW_HEIGHT),
        id: record.get(vars::WINDOW_ID).to_string(),
        index: record.int(vars::WINDOW_INDEX),
        last_flag: record.flag(vars::WINDOW_LAST_FLAG),
        layout: record.get(vars::WINDOW_LAYOUT).to_string(),
        linked: record.flag(vars::WINDOW_LINKED),
        linked_sessions: record.int(vars::WINDOW_LINKED_SESSIONS),
        linked_sessions_list: record.list(vars::WINDOW_LINKED_SESSIONS_LIST),
        marked_flag: record.flag(vars::WINDOW_MARKED_FLAG),
        name: record.get(vars::WINDOW_NAME).to_string(),
        offset_x: record.int(vars::WINDOW_OFFSET_X),
        offset_y: record.int(vars::WINDOW_OFFSET_Y),
        panes: record.int(vars::WINDOW_PANES),
        raw_flags: record.get(vars::WINDOW_RAW_FLAGS).to_string(),
        session: record.get(vars::SESSION_NAME).to_string(),
        silence_flag: record.int(vars::WINDOW_SILENCE_FLAG),
        stack_index: record.int(vars::WINDOW_STACK_INDEX),
        start_flag: record.flag(vars::WINDOW_START_FLAG),
        visible_layout: record.get(vars::WINDOW_VISIBLE_LAYOUT).to_string(),
        width: record.int(vars::WINDOW_WIDTH),
        zoomed_flag: record.flag(vars::WINDOW_ZOOMED_FLAG),
        tmux: tmux.clone(),
    }
}

impl Tmux {
    /// List every window across all sessions.
    ///
    /// The direct `-a` listing is merged with per-session listings because
    /// some servers omit windows from the global form for unattached
    /// sessions.
    pub async fn list_all_windows(&self) -> Result<Vec<Window>, Error> {
        let direct = self.list_all_windows_direct().await;
        let mut windows = match &direct {
            Ok(windows) => windows.clone(),
            Err(_) => Vec::new(),
        };
        let mut seen: HashSet<String> =
            windows.iter().map(|window| window.id.clone()).collect();

        if let Ok(sessions) = self.list_sessions().await {
            for session in sessions {
                let Ok(listed) = session.list_windows().await else {
                    continue;
                };
                for mut window in listed {
                    if window.session.trim().is_empty() {
                        window.session = session.name.clone();
                    }
                    if seen.insert(window.id.clone()) {
                        windows.push(window);
                    }
                }
            }
        }

        if windows.is_empty() {
            if let Err(err) = direct {
                return Err(err);
            }
        }
        Ok(windows)
    }

    async fn list_all_windows_direct(&self) -> Result<Vec<Window>, Error> {
        let output = self
            .run_query(
                self.query()
                    .cmd("list-windows")
                    .fargs(&["-a"])
                    .vars(WINDOW_VARS),
            )
            .await?;
        Ok(output
            .collect()
            .iter()
            .map(|record| window_from_record(record, self))
            .collect())
    }

    /// Look a window up by its id (`@n`).
    pub async fn window_by_id(&self, id: &str) -> Result<Option<Window>, Error> {
        let windows = self.list_all_windows().await?;
        Ok(windows.into_iter().find(|window| window.id == id))
    }
}

impl Session {
    /// List the windows belonging to this session.
    ///
    /// The session id is tried first, then the name; a command-level error
    /// (e.g. the session vanished between listing and lookup) degrades to
    /// an empty list rather than a hard failure.
    pub async fn list_windows(&self) -> Result<Vec<Window>, Error> {
        let mut targets = Vec::new();
        let id = self.id.trim();
        if !id.is_empty() {
            targets.push(id.to_string());
        }
        let name = self.name.trim();
        if !name.is_empty() && name != id {
            targets.push(name.to_string());
        }

        for target in &targets {
            match self.list_windows_with_target(target).await {
                Ok(windows) => return Ok(windows),
                // The session vanished or the target did not resolve; try
                // the next target.
                Err(Error::CommandFailed { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(Vec::new())
    }

    async fn list_windows_with_target(&self, target: &str) -> Result<Vec<Window>, Error> {
        let output = self
            .tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("list-windows")
                    .fargs(&["-t", target])
                    .vars(WINDOW_VARS),
            )
            .await?;
        Ok(output
            .collect()
            .iter()
            .map(|record| window_from_record(record, &self.tmux))
            .collect())
    }

    /// Look a window up by name within this session.
    pub async fn window_by_name(&self, name: &str) -> Result<Option<Window>, Error> {
        let windows = self.list_windows().await?;
        Ok(windows.into_iter().find(|window| window.name == name))
    }

    /// Look a window up by index within this session.
    pub async fn window_by_index(&self, index: i64) -> Result<Option<Window>, Error> {
        let windows = self.list_windows().await?;
        Ok(windows.into_iter().find(|window| window.index == index))
    }

    /// Create a new window in this session.
    pub async fn new_window(&self, options: &NewWindowOptions) -> Result<Window, Error> {
        let mut query = self
            .tmux
            .query()
            .cmd("new-window")
            .fargs(&["-P", "-t", &self.name])
            .vars(WINDOW_VARS);

        if let Some(dir) = options.start_directory.as_deref() {
            query = query.fargs(&["-c", dir]);
        }
        if let Some(name) = options.window_name.as_deref() {
            query = query.fargs(&["-n", name]);
        }
        if options.do_not_attach {
            query = query.fargs(&["-d"]);
        }

        let output = self.tmux.run_query(query).await?;
        Ok(window_from_record(&output.one(), &self.tmux))
    }

    /// Select the next window in this session.
    pub async fn next_window(&self) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("next-window")
                    .fargs(&["-t", &self.name]),
            )
            .await?;
        Ok(())
    }

    /// Select the previous window in this session.
    pub async fn previous_window(&self) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("previous-window")
                    .fargs(&["-t", &self.name]),
            )
            .await?;
        Ok(())
    }
}

impl Window {
    /// List the panes in this window.
    pub async fn list_panes(&self) -> Result<Vec<Pane>, Error> {
        self.tmux.list_panes_with_target(&["-t", &self.id]).await
    }

    /// Terminate the window.
    pub async fn kill(&self) -> Result<(), Error> {
        self.tmux
            .run_query(self.tmux.query().cmd("kill-window").fargs(&["-t", &self.id]))
            .await?;
        Ok(())
    }

    /// Rename the window.
    pub async fn rename(&self, name: &str) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("rename-window")
                    .fargs(&["-t", &self.id])
                    .pargs(&[name]),
            )
            .await?;
        Ok(())
    }

    /// Make this the active window.
    pub async fn select(&self) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("select-window")
                    .fargs(&["-t", &self.id]),
            )
            .await?;
        Ok(())
    }

    /// Apply a preset layout to the window.
    pub async fn select_layout(&self, layout: WindowLayout) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("select-layout")
                    .fargs(&["-t", &self.id])
                    .pargs(&[layout.as_str()]),
            )
            .await?;
        Ok(())
    }

    /// Move the window to another session and index.
    pub async fn move_to(&self, target_session: &str, target_index: i64) -> Result<(), Error> {
        let target = format!("{target_session}:{target_index}");
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("move-window")
                    .fargs(&["-s", &self.id])
                    .fargs(&["-t", &target]),
            )
            .await?;
        Ok(())
    }

    /// Sessions this window is linked into.
    pub async fn list_linked_sessions(&self) -> Result<Vec<Session>, Error> {
        self.sessions_by_name(&self.linked_sessions_list).await
    }

    /// Sessions in which this window is the active one.
    pub async fn list_active_sessions(&self) -> Result<Vec<Session>, Error> {
        self.sessions_by_name(&self.active_sessions_list).await
    }

    async fn sessions_by_name(&self, names: &[String]) -> Result<Vec<Session>, Error> {
        let mut sessions = Vec::with_capacity(names.len());
        for name in names {
            if let Some(session) = self.tmux.session_by_name(name).await? {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    /// Clients currently displaying this window.
    pub async fn list_active_clients(&self) -> Result<Vec<Client>, Error> {
        let mut clients = Vec::with_capacity(self.active_clients_list.len());
        for tty in &self.active_clients_list {
            if let Some(client) = self.tmux.client_by_tty(tty).await? {
                clients.push(client);
            }
        }
        Ok(clients)
    }

    /// Set a window-scoped option.
    pub async fn set_option(&self, key: &str, value: &str) -> Result<(), Error> {
        self.tmux
            .set_option(&self.id, key, value, OptionScope::Window)
            .await
    }

    /// Retrieve a window option value.
    pub async fn option(&self, key: &str) -> Result<TmuxOption, Error> {
        self.tmux.option(&self.id, key, OptionScope::Window).await
    }

    /// List all window options.
    pub async fn options(&self) -> Result<Vec<TmuxOption>, Error> {
        self.tmux.options(&self.id, OptionScope::Window).await
    }

    /// Remove a window option.
    pub async fn delete_option(&self, key: &str) -> Result<(), Error> {
        self.tmux
            .delete_option(&self.id, key, OptionScope::Window)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RECORD_SEPARATOR;
    use crate::session::SESSION_VARS;
    use crate::testsupport::{respond_sequence, FakeReply, FakeTransport};

    fn window_record(id: &str, name: &str, index: &str, session: &str) -> String {
        WINDOW_VARS
            .iter()
            .map(|var| match *var {
                vars::WINDOW_ID => id,
                vars::WINDOW_NAME => name,
                vars::WINDOW_INDEX => index,
                vars::WINDOW_ACTIVE => "1",
                vars::SESSION_NAME => session,
                _ => "",
            })
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR)
    }

    fn session_record(id: &str, name: &str) -> String {
        SESSION_VARS
            .iter()
            .map(|var| match *var {
                vars::SESSION_ID => id,
                vars::SESSION_NAME => name,
                _ => "",
            })
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR)
    }

    #[tokio::test]
    async fn list_windows_prefers_session_id_target() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&session_record("$5", "work")]),
                FakeReply::success(&[&window_record("@1", "edit", "0", "work")]),
            ],
        );

        let session = tmux
            .session_by_name("work")
            .await
            .expect("lookup")
            .expect("session");
        let windows = session.list_windows().await.expect("windows");
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].id, "@1");
        assert_eq!(windows[0].name, "edit");
        assert!(windows[0].active);

        let sent = responder.await.expect("responder");
        assert!(
            sent[1].starts_with("list-windows -t $5 -F"),
            "unexpected command: {}",
            sent[1]
        );

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn list_windows_falls_back_to_name_then_empty() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&session_record("$9", "gone")]),
                FakeReply::failure("can't find session $9"),
                FakeReply::failure("can't find session gone"),
            ],
        );

        let session = tmux
            .session_by_name("gone")
            .await
            .expect("lookup")
            .expect("session");
        let windows = session.list_windows().await.expect("windows");
        assert!(
            windows.is_empty(),
            "command errors should degrade to an empty list"
        );

        let sent = responder.await.expect("responder");
        assert!(sent[1].starts_with("list-windows -t $9"));
        assert!(sent[2].starts_with("list-windows -t gone"));

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn new_window_builds_flags() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&session_record("$1", "work")]),
                FakeReply::success(&[&window_record("@7", "logs", "2", "work")]),
            ],
        );

        let session = tmux
            .session_by_name("work")
            .await
            .expect("lookup")
            .expect("session");
        let window = session
            .new_window(&NewWindowOptions {
                start_directory: Some("/var/log".into()),
                window_name: Some("logs".into()),
                do_not_attach: true,
            })
            .await
            .expect("window");
        assert_eq!(window.id, "@7");

        let sent = responder.await.expect("responder");
        assert!(
            sent[1].starts_with("new-window -P -t work -c /var/log -n logs -d -F"),
            "unexpected command: {}",
            sent[1]
        );

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn window_operations_target_by_id() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&window_record("@3", "edit", "1", "work")]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
            ],
        );

        let windows = tmux.list_all_windows_direct().await.expect("windows");
        let window = &windows[0];
        window.rename("code").await.expect("rename");
        window.select().await.expect("select");
        window
            .select_layout(WindowLayout::Tiled)
            .await
            .expect("layout");
        window.move_to("other", 4).await.expect("move");

        let sent = responder.await.expect("responder");
        assert_eq!(sent[1], "rename-window -t @3 code");
        assert_eq!(sent[2], "select-window -t @3");
        assert_eq!(sent[3], "select-layout -t @3 tiled");
        assert_eq!(sent[4], "move-window -s @3 -t other:4");

        tmux.close().await.expect("close");
    }
}
