//! Pane listing, capture, and manipulation.

use std::collections::HashSet;

use crate::error::Error;
use crate::query::QueryRecord;
use crate::tmux::Tmux;
use crate::types::{
    CaptureOptions, ChooseTreeOptions, OptionScope, Pane, SelectPaneOptions, Session,
    SplitWindowOptions, TmuxOption, Window,
};
use crate::vars;

pub(crate) const PANE_VARS: &[&str] = &[
    vars::PANE_ACTIVE,
    vars::PANE_AT_BOTTOM,
    vars::PANE_AT_LEFT,
    vars::PANE_AT_RIGHT,
    vars::PANE_AT_TOP,
    vars::PANE_BG,
    vars::PANE_BOTTOM,
    vars::PANE_CURRENT_COMMAND,
    vars::PANE_CURRENT_PATH,
    vars::PANE_DEAD,
    vars::PANE_DEAD_SIGNAL,
    vars::PANE_DEAD_STATUS,
    vars::PANE_DEAD_TIME,
    vars::PANE_FG,
    vars::PANE_FORMAT,
    vars::PANE_HEIGHT,
    vars::PANE_ID,
    vars::PANE_IN_MODE,
    vars::PANE_INDEX,
    vars::PANE_INPUT_OFF,
    vars::PANE_LAST,
    vars::PANE_LEFT,
    vars::PANE_MARKED,
    vars::PANE_MARKED_SET,
    vars::PANE_MODE,
    vars::PANE_PATH,
    vars::PANE_PID,
    vars::PANE_PIPE,
    vars::PANE_RIGHT,
    vars::PANE_SEARCH_STRING,
    vars::SESSION_NAME,
    vars::PANE_START_COMMAND,
    vars::PANE_START_PATH,
    vars::PANE_SYNCHRONIZED,
    vars::PANE_TABS,
    vars::PANE_TITLE,
    vars::PANE_TOP,
    vars::PANE_TTY,
    vars::PANE_UNSEEN_CHANGES,
    vars::PANE_WIDTH,
    vars::WINDOW_INDEX,
];

pub(crate) fn pane_from_record(record: &QueryRecord, tmux: &Tmux) -> Pane {
    Pane {
        active: record.flag(vars::PANE_ACTIVE),
        at_bottom: record.flag(vars::PANE_AT_BOTTOM),
        at_left: record.flag(vars::PANE_AT_LEFT),
        at_right: record.flag(vars::PANE_AT_RIGHT),
        at_top: record.flag(vars::PANE_AT_TOP),
        bg: record.get(vars::PANE_BG).to_string(),
        bottom: record.get(vars::PANE_BOTTOM).to_string(),
        current_command: record.get(vars::PANE_CURRENT_COMMAND).to_string(),
        current_path: record.get(vars::PANE_CURRENT_PATH).to_string(),
        dead: record.flag(vars::PANE_DEAD),
        dead_signal: record.int(vars::PANE_DEAD_SIGNAL),
        dead_status: record.int(vars::PANE_DEAD_STATUS),
        dead_time: record.get(vars::PANE_DEAD_TIME).to_string(),
        fg: record.get(vars::PANE_FG).to_string(),
        format: record.flag(vars::PANE_FORMAT),
        height: record.int(vars::PANE_HEIGHT),
        id: record.get(vars::PANE_ID).to_string(),
        in_mode: record.flag(vars::PANE_IN_MODE),
        index: record.int(vars::PANE_INDEX),
        input_off: record.flag(vars::PANE_INPUT_OFF),
        last: record.flag(vars::PANE_LAST),
        left: record.get(vars::PANE_LEFT).to_string(),
        marked: record.flag(vars::PANE_MARKED),
        marked_set: record.flag(vars::PANE_MARKED_SET),
        mode: record.get(vars::PANE_MODE).to_string(),
        path: record.get(vars::PANE_PATH).to_string(),
        pid: record.int(vars::PANE_PID) as i32,
        pipe: record.flag(vars::PANE_PIPE),
        right: record.get(vars::PANE_RIGHT).to_string(),
        search_string: record.get(vars::PANE_SEARCH_STRING).to_string(),
        session_name: record.get(vars::SESSION_NAME).to_string(),
        start_command: record.get(vars::PANE_START_COMMAND).to_string(),
        start_path: record.get(vars::PANE_START_PATH).to_string(),
        synchronized: record.flag(vars::PANE_SYNCHRONIZED),
        tabs: record.get(vars::PANE_TABS).to_string(),
        title: record.get(vars::PANE_TITLE).to_string(),
        top: record.get(vars::PANE_TOP).to_string(),
        tty: record.get(vars::PANE_TTY).to_string(),
        unseen_changes: record.flag(vars::PANE_UNSEEN_CHANGES),
        width: record.int(vars::PANE_WIDTH),
        window_index: record.int(vars::WINDOW_INDEX),
        tmux: tmux.clone(),
    }
}

impl Tmux {
    pub(crate) async fn list_panes_with_target(
        &self,
        target_args: &[&str],
    ) -> Result<Vec<Pane>, Error> {
        let output = self
            .run_query(
                self.query()
                    .cmd("list-panes")
                    .fargs(target_args)
                    .vars(PANE_VARS),
            )
            .await?;
        Ok(output
            .collect()
            .iter()
            .map(|record| pane_from_record(record, self))
            .collect())
    }

    /// List every pane across all sessions.
    ///
    /// As with windows, the direct `-a` listing is merged with per-window
    /// listings so no pane is missed.
    pub async fn list_all_panes(&self) -> Result<Vec<Pane>, Error> {
        let direct = self.list_panes_with_target(&["-a"]).await;
        let mut panes = match &direct {
            Ok(panes) => panes.clone(),
            Err(_) => Vec::new(),
        };
        let mut seen: HashSet<String> = panes.iter().map(|pane| pane.id.clone()).collect();

        if let Ok(windows) = self.list_all_windows().await {
            for window in windows {
                let Ok(listed) = window.list_panes().await else {
                    continue;
                };
                for pane in listed {
                    if seen.insert(pane.id.clone()) {
                        panes.push(pane);
                    }
                }
            }
        }

        if panes.is_empty() {
            if let Err(err) = direct {
                return Err(err);
            }
        }
        Ok(panes)
    }

    /// Look a pane up by its id (`%n`).
    pub async fn pane_by_id(&self, id: &str) -> Result<Option<Pane>, Error> {
        let panes = self.list_all_panes().await?;
        Ok(panes.into_iter().find(|pane| pane.id == id))
    }

    /// Capture the contents of a pane.
    pub async fn capture_pane(
        &self,
        target: Option<&str>,
        options: &CaptureOptions,
    ) -> Result<String, Error> {
        let mut query = self.query().cmd("capture-pane");
        if let Some(target) = target {
            query = query.fargs(&["-t", target]);
        }
        query = query.fargs(&["-p"]);

        if options.escape_attributes {
            query = query.fargs(&["-e"]);
        }
        if options.escape_non_printables {
            query = query.fargs(&["-C"]);
        }
        if options.ignore_trailing {
            query = query.fargs(&["-T"]);
        }
        if options.preserve_trailing {
            query = query.fargs(&["-N"]);
        }
        if options.preserve_and_join {
            query = query.fargs(&["-J"]);
        }

        let output = self.run_query(query).await?;
        Ok(output.raw())
    }
}

impl Session {
    /// List every pane in this session.
    pub async fn list_panes(&self) -> Result<Vec<Pane>, Error> {
        self.tmux
            .list_panes_with_target(&["-s", "-t", &self.name])
            .await
    }
}

impl Window {
    /// Look a pane up by index within this window.
    pub async fn pane_by_index(&self, index: i64) -> Result<Option<Pane>, Error> {
        let panes = self.list_panes().await?;
        Ok(panes.into_iter().find(|pane| pane.index == index))
    }
}

impl Pane {
    /// Send a key sequence to the pane.
    pub async fn send_keys(&self, keys: &str) -> Result<(), Error> {
        self.tmux
            .run_query(
                self.tmux
                    .query()
                    .cmd("send-keys")
                    .fargs(&["-t", &self.id])
                    .pargs(&[keys]),
            )
            .await?;
        Ok(())
    }

    /// Terminate the pane.
    pub async fn kill(&self) -> Result<(), Error> {
        self.tmux
            .run_query(self.tmux.query().cmd("kill-pane").fargs(&["-t", &self.id]))
            .await?;
        Ok(())
    }

    /// Make this the active pane, optionally moving in a direction.
    pub async fn select_pane(&self, options: &SelectPaneOptions) -> Result<(), Error> {
        let mut query = self
            .tmux
            .query()
            .cmd("select-pane")
            .fargs(&["-t", &self.id]);
        if let Some(position) = options.target_position {
            query = query.fargs(&[position.flag()]);
        }
        self.tmux.run_query(query).await?;
        Ok(())
    }

    /// Split the pane into a new pane.
    pub async fn split(&self, options: &SplitWindowOptions) -> Result<(), Error> {
        let mut query = self
            .tmux
            .query()
            .cmd("split-window")
            .fargs(&["-t", &self.id]);
        if let Some(direction) = options.split_direction {
            query = query.fargs(&[direction.flag()]);
        }
        if let Some(dir) = options.start_directory.as_deref() {
            query = query.fargs(&["-c", dir]);
        }
        if let Some(shell_command) = options.shell_command.as_deref() {
            query = query.pargs(&[&format!("'{shell_command}'")]);
        }
        self.tmux.run_query(query).await?;
        Ok(())
    }

    /// Enter choose-tree mode for this pane.
    pub async fn choose_tree(&self, options: &ChooseTreeOptions) -> Result<(), Error> {
        let mut query = self
            .tmux
            .query()
            .cmd("choose-tree")
            .fargs(&["-t", &self.id]);
        if options.sessions_collapsed {
            query = query.fargs(&["-s"]);
        }
        if options.windows_collapsed {
            query = query.fargs(&["-w"]);
        }
        self.tmux.run_query(query).await?;
        Ok(())
    }

    /// Capture the pane with explicit options.
    pub async fn capture_with(&self, options: &CaptureOptions) -> Result<String, Error> {
        self.tmux.capture_pane(Some(&self.id), options).await
    }

    /// Capture the pane, keeping text and background attributes escaped.
    pub async fn capture(&self) -> Result<String, Error> {
        self.capture_with(&CaptureOptions {
            escape_attributes: true,
            ..CaptureOptions::default()
        })
        .await
    }

    /// Set a pane-scoped option.
    pub async fn set_option(&self, key: &str, value: &str) -> Result<(), Error> {
        self.tmux
            .set_option(&self.id, key, value, OptionScope::Pane)
            .await
    }

    /// Retrieve a pane option value.
    pub async fn option(&self, key: &str) -> Result<TmuxOption, Error> {
        self.tmux.option(&self.id, key, OptionScope::Pane).await
    }

    /// List all pane options.
    pub async fn options(&self) -> Result<Vec<TmuxOption>, Error> {
        self.tmux.options(&self.id, OptionScope::Pane).await
    }

    /// Remove a pane option.
    pub async fn delete_option(&self, key: &str) -> Result<(), Error> {
        self.tmux
            .delete_option(&self.id, key, OptionScope::Pane)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RECORD_SEPARATOR;
    use crate::testsupport::{respond_sequence, respond_success, FakeReply, FakeTransport};
    use crate::types::{PanePosition, PaneSplitDirection};

    fn pane_record(id: &str, index: &str, session: &str) -> String {
        PANE_VARS
            .iter()
            .map(|var| match *var {
                vars::PANE_ID => id,
                vars::PANE_INDEX => index,
                vars::SESSION_NAME => session,
                vars::PANE_ACTIVE => "1",
                vars::PANE_PID => "4242",
                _ => "",
            })
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR)
    }

    #[tokio::test]
    async fn capture_pane_maps_options_to_flags() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_success(controls, &["line one", "line two"]);

        let captured = tmux
            .capture_pane(
                Some("%1"),
                &CaptureOptions {
                    escape_attributes: true,
                    preserve_and_join: true,
                    ..CaptureOptions::default()
                },
            )
            .await
            .expect("capture");
        assert_eq!(captured, "line one\nline two");

        let sent = responder.await.expect("responder");
        assert_eq!(sent, "capture-pane -t %1 -p -e -J");

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn pane_operations_target_by_id() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&pane_record("%2", "0", "work")]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
                FakeReply::success(&[]),
            ],
        );

        let panes = tmux.list_panes_with_target(&["-a"]).await.expect("panes");
        assert_eq!(panes.len(), 1);
        let pane = &panes[0];
        assert_eq!(pane.id, "%2");
        assert_eq!(pane.pid, 4242);
        assert!(pane.active);

        pane.send_keys("ls -la Enter").await.expect("send keys");
        pane.select_pane(&SelectPaneOptions {
            target_position: Some(PanePosition::Right),
        })
        .await
        .expect("select");
        pane.split(&SplitWindowOptions {
            split_direction: Some(PaneSplitDirection::Vertical),
            start_directory: Some("/src".into()),
            shell_command: Some("htop".into()),
        })
        .await
        .expect("split");
        pane.kill().await.expect("kill");

        let sent = responder.await.expect("responder");
        assert_eq!(sent[1], "send-keys -t %2 ls -la Enter");
        assert_eq!(sent[2], "select-pane -t %2 -R");
        assert_eq!(sent[3], "split-window -t %2 -v -c /src 'htop'");
        assert_eq!(sent[4], "kill-pane -t %2");

        tmux.close().await.expect("close");
    }

    #[tokio::test]
    async fn session_list_panes_uses_session_scope() {
        let (fake, controls) = FakeTransport::new();
        let tmux = Tmux::with_transport(fake);
        let responder = respond_sequence(
            controls,
            vec![
                FakeReply::success(&[&crate::session::SESSION_VARS
                    .iter()
                    .map(|var| match *var {
                        vars::SESSION_NAME => "work",
                        _ => "",
                    })
                    .collect::<Vec<_>>()
                    .join(RECORD_SEPARATOR)]),
                FakeReply::success(&[&pane_record("%0", "0", "work")]),
            ],
        );

        let session = tmux
            .session_by_name("work")
            .await
            .expect("lookup")
            .expect("session");
        let panes = session.list_panes().await.expect("panes");
        assert_eq!(panes.len(), 1);

        let sent = responder.await.expect("responder");
        assert!(
            sent[1].starts_with("list-panes -s -t work -F"),
            "unexpected command: {}",
            sent[1]
        );

        tmux.close().await.expect("close");
    }
}
