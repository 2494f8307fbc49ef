//! Data model for tmux entities and per-operation options.
//!
//! Entity structs are snapshots of tmux format variables taken at query
//! time; they also carry a [`Tmux`] handle so follow-up operations
//! (`kill`, `rename`, `split`, …) can run against the same connection.

use crate::tmux::Tmux;

/// A tmux socket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socket {
    /// Filesystem path passed to tmux via `-S`.
    pub path: String,
}

/// Global tmux server information.
#[derive(Debug, Clone)]
pub struct Server {
    pub pid: i32,
    pub socket: Option<Socket>,
    pub start_time: String,
    pub uid: String,
    pub user: String,
    pub version: String,
}

/// A tmux client.
#[derive(Debug, Clone)]
pub struct Client {
    pub activity: String,
    pub cell_height: i64,
    pub cell_width: i64,
    pub control_mode: bool,
    pub created: String,
    pub discarded: String,
    pub flags: String,
    pub height: i64,
    pub key_table: String,
    pub last_session: String,
    pub name: String,
    pub pid: i32,
    pub prefix: bool,
    pub readonly: bool,
    pub session: String,
    pub termfeatures: String,
    pub termname: String,
    pub termtype: String,
    pub tty: String,
    pub uid: i32,
    pub user: String,
    pub utf8: bool,
    pub width: i64,
    pub written: String,

    pub(crate) tmux: Tmux,
}

/// A tmux session.
#[derive(Debug, Clone)]
pub struct Session {
    pub activity: String,
    pub alerts: String,
    pub attached: i64,
    pub attached_list: Vec<String>,
    pub created: String,
    pub format: bool,
    pub group: String,
    pub group_attached: i64,
    pub group_attached_list: Vec<String>,
    pub group_list: Vec<String>,
    pub group_many_attached: bool,
    pub group_size: i64,
    pub grouped: bool,
    pub id: String,
    pub last_attached: String,
    pub many_attached: bool,
    pub marked: bool,
    pub name: String,
    pub path: String,
    pub stack: String,
    pub windows: i64,

    pub(crate) tmux: Tmux,
}

/// A tmux window.
#[derive(Debug, Clone)]
pub struct Window {
    pub active: bool,
    pub active_clients: i64,
    pub active_clients_list: Vec<String>,
    pub active_sessions: i64,
    pub active_sessions_list: Vec<String>,
    pub activity: String,
    pub activity_flag: bool,
    pub bell_flag: bool,
    pub bigger: bool,
    pub cell_height: i64,
    pub cell_width: i64,
    pub end_flag: bool,
    pub flags: String,
    pub format: bool,
    pub height: i64,
    pub id: String,
    pub index: i64,
    pub last_flag: bool,
    pub layout: String,
    pub linked: bool,
    pub linked_sessions: i64,
    pub linked_sessions_list: Vec<String>,
    pub marked_flag: bool,
    pub name: String,
    pub offset_x: i64,
    pub offset_y: i64,
    pub panes: i64,
    pub raw_flags: String,
    /// Name of the session the window was listed under.
    pub session: String,
    pub silence_flag: i64,
    pub stack_index: i64,
    pub start_flag: bool,
    pub visible_layout: String,
    pub width: i64,
    pub zoomed_flag: bool,

    pub(crate) tmux: Tmux,
}

/// A tmux pane.
#[derive(Debug, Clone)]
pub struct Pane {
    pub active: bool,
    pub at_bottom: bool,
    pub at_left: bool,
    pub at_right: bool,
    pub at_top: bool,
    pub bg: String,
    pub bottom: String,
    pub current_command: String,
    pub current_path: String,
    pub dead: bool,
    pub dead_signal: i64,
    pub dead_status: i64,
    pub dead_time: String,
    pub fg: String,
    pub format: bool,
    pub height: i64,
    pub id: String,
    pub in_mode: bool,
    pub index: i64,
    pub input_off: bool,
    pub last: bool,
    pub left: String,
    pub marked: bool,
    pub marked_set: bool,
    pub mode: String,
    pub path: String,
    pub pid: i32,
    pub pipe: bool,
    pub right: String,
    pub search_string: String,
    pub session_name: String,
    pub start_command: String,
    pub start_path: String,
    pub synchronized: bool,
    pub tabs: String,
    pub title: String,
    pub top: String,
    pub tty: String,
    pub unseen_changes: bool,
    pub width: i64,
    pub window_index: i64,

    pub(crate) tmux: Tmux,
}

/// A tmux option key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxOption {
    pub key: String,
    pub value: String,
}

impl TmuxOption {
    pub(crate) fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Scope an option operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionScope {
    /// Session options (tmux's default scope).
    #[default]
    Session,
    /// Window options (`-w`).
    Window,
    /// Pane options (`-p`).
    Pane,
}

impl OptionScope {
    pub(crate) fn flag(self) -> Option<&'static str> {
        match self {
            Self::Session => None,
            Self::Window => Some("-w"),
            Self::Pane => Some("-p"),
        }
    }
}

/// Preset window layouts accepted by `select-layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLayout {
    EvenHorizontal,
    EvenVertical,
    MainHorizontal,
    MainVertical,
    Tiled,
}

impl WindowLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EvenHorizontal => "even-horizontal",
            Self::EvenVertical => "even-vertical",
            Self::MainHorizontal => "main-horizontal",
            Self::MainVertical => "main-vertical",
            Self::Tiled => "tiled",
        }
    }
}

/// Directional targets for `select-pane`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanePosition {
    Up,
    Right,
    Down,
    Left,
}

impl PanePosition {
    pub(crate) fn flag(self) -> &'static str {
        match self {
            Self::Up => "-U",
            Self::Right => "-R",
            Self::Down => "-D",
            Self::Left => "-L",
        }
    }
}

/// Split orientation for `split-window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneSplitDirection {
    Horizontal,
    Vertical,
}

impl PaneSplitDirection {
    pub(crate) fn flag(self) -> &'static str {
        match self {
            Self::Horizontal => "-h",
            Self::Vertical => "-v",
        }
    }
}

/// Options for `new-session`.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub name: Option<String>,
    pub shell_command: Option<String>,
    pub start_directory: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// Options for `detach-client`.
#[derive(Debug, Clone, Default)]
pub struct DetachClientOptions {
    pub target_client: Option<String>,
    pub target_session: Option<String>,
}

/// Options for `switch-client`.
#[derive(Debug, Clone, Default)]
pub struct SwitchClientOptions {
    pub target_client: Option<String>,
    pub target_session: Option<String>,
}

/// Options for `attach-session`.
#[derive(Debug, Clone, Default)]
pub struct AttachSessionOptions {
    pub working_dir: Option<String>,
    pub detach_clients: bool,
}

/// Options for `new-window`.
#[derive(Debug, Clone, Default)]
pub struct NewWindowOptions {
    pub start_directory: Option<String>,
    pub window_name: Option<String>,
    pub do_not_attach: bool,
}

/// Options for `select-pane`.
#[derive(Debug, Clone, Default)]
pub struct SelectPaneOptions {
    pub target_position: Option<PanePosition>,
}

/// Options for `split-window`.
#[derive(Debug, Clone, Default)]
pub struct SplitWindowOptions {
    pub split_direction: Option<PaneSplitDirection>,
    pub start_directory: Option<String>,
    pub shell_command: Option<String>,
}

/// Options for `choose-tree`.
#[derive(Debug, Clone, Default)]
pub struct ChooseTreeOptions {
    pub sessions_collapsed: bool,
    pub windows_collapsed: bool,
}

/// Options for `capture-pane`.
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// `-e`: include escape sequences for text and background attributes.
    pub escape_attributes: bool,
    /// `-C`: escape non-printable characters as octal.
    pub escape_non_printables: bool,
    /// `-T`: ignore trailing positions that contain no content.
    pub ignore_trailing: bool,
    /// `-N`: preserve trailing spaces in each line.
    pub preserve_trailing: bool,
    /// `-J`: preserve trailing spaces and join wrapped lines.
    pub preserve_and_join: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_scope_flags() {
        assert_eq!(OptionScope::Session.flag(), None);
        assert_eq!(OptionScope::Window.flag(), Some("-w"));
        assert_eq!(OptionScope::Pane.flag(), Some("-p"));
    }

    #[test]
    fn layout_names_match_tmux() {
        assert_eq!(WindowLayout::EvenHorizontal.as_str(), "even-horizontal");
        assert_eq!(WindowLayout::MainVertical.as_str(), "main-vertical");
        assert_eq!(WindowLayout::Tiled.as_str(), "tiled");
    }

    #[test]
    fn pane_position_flags() {
        assert_eq!(PanePosition::Up.flag(), "-U");
        assert_eq!(PanePosition::Left.flag(), "-L");
    }

    #[test]
    fn split_direction_flags() {
        assert_eq!(PaneSplitDirection::Horizontal.flag(), "-h");
        assert_eq!(PaneSplitDirection::Vertical.flag(), "-v");
    }
}
