//! tmux format-variable names used by the entity queries.

// Session variables.
pub(crate) const SESSION_ACTIVITY: &str = "session_activity";
pub(crate) const SESSION_ALERTS: &str = "session_alerts";
pub(crate) const SESSION_ATTACHED: &str = "session_attached";
pub(crate) const SESSION_ATTACHED_LIST: &str = "session_attached_list";
pub(crate) const SESSION_CREATED: &str = "session_created";
pub(crate) const SESSION_FORMAT: &str = "session_format";
pub(crate) const SESSION_GROUP: &str = "session_group";
pub(crate) const SESSION_GROUP_ATTACHED: &str = "session_group_attached";
pub(crate) const SESSION_GROUP_ATTACHED_LIST: &str = "session_group_attached_list";
pub(crate) const SESSION_GROUP_LIST: &str = "session_group_list";
pub(crate) const SESSION_GROUP_MANY_ATTACHED: &str = "session_group_many_attached";
pub(crate) const SESSION_GROUP_SIZE: &str = "session_group_size";
pub(crate) const SESSION_GROUPED: &str = "session_grouped";
pub(crate) const SESSION_ID: &str = "session_id";
pub(crate) const SESSION_LAST_ATTACHED: &str = "session_last_attached";
pub(crate) const SESSION_MANY_ATTACHED: &str = "session_many_attached";
pub(crate) const SESSION_MARKED: &str = "session_marked";
pub(crate) const SESSION_NAME: &str = "session_name";
pub(crate) const SESSION_PATH: &str = "session_path";
pub(crate) const SESSION_STACK: &str = "session_stack";
pub(crate) const SESSION_WINDOWS: &str = "session_windows";

// Window variables.
pub(crate) const WINDOW_ACTIVE: &str = "window_active";
pub(crate) const WINDOW_ACTIVE_CLIENTS: &str = "window_active_clients";
pub(crate) const WINDOW_ACTIVE_CLIENTS_LIST: &str = "window_active_clients_list";
pub(crate) const WINDOW_ACTIVE_SESSIONS: &str = "window_active_sessions";
pub(crate) const WINDOW_ACTIVE_SESSIONS_LIST: &str = "window_active_sessions_list";
pub(crate) const WINDOW_ACTIVITY: &str = "window_activity";
pub(crate) const WINDOW_ACTIVITY_FLAG: &str = "window_activity_flag";
pub(crate) const WINDOW_BELL_FLAG: &str = "window_bell_flag";
pub(crate) const WINDOW_BIGGER: &str = "window_bigger";
pub(crate) const WINDOW_CELL_HEIGHT: &str = "window_cell_height";
pub(crate) const WINDOW_CELL_WIDTH: &str = "window_cell_width";
pub(crate) const WINDOW_END_FLAG: &str = "window_end_flag";
pub(crate) const WINDOW_FLAGS: &str = "window_flags";
pub(crate) const WINDOW_FORMAT: &str = "window_format";
pub(crate) const WINDOW_HEIGHT: &str = "window_height";
pub(crate) const WINDOW_ID: &str = "window_id";
pub(crate) const WINDOW_INDEX: &str = "window_index";
pub(crate) const WINDOW_LAST_FLAG: &str = "window_last_flag";
pub(crate) const WINDOW_LAYOUT: &str = "window_layout";
pub(crate) const WINDOW_LINKED: &str = "window_linked";
pub(crate) const WINDOW_LINKED_SESSIONS: &str = "window_linked_sessions";
pub(crate) const WINDOW_LINKED_SESSIONS_LIST: &str = "window_linked_sessions_list";
pub(crate) const WINDOW_MARKED_FLAG: &str = "window_marked_flag";
pub(crate) const WINDOW_NAME: &str = "window_name";
pub(crate) const WINDOW_OFFSET_X: &str = "window_offset_x";
pub(crate) const WINDOW_OFFSET_Y: &str = "window_offset_y";
pub(crate) const WINDOW_PANES: &str = "window_panes";
pub(crate) const WINDOW_RAW_FLAGS: &str = "window_raw_flags";
pub(crate) const WINDOW_SILENCE_FLAG: &str = "window_silence_flag";
pub(crate) const WINDOW_STACK_INDEX: &str = "window_stack_index";
pub(crate) const WINDOW_START_FLAG: &str = "window_start_flag";
pub(crate) const WINDOW_VISIBLE_LAYOUT: &str = "window_visible_layout";
pub(crate) const WINDOW_WIDTH: &str = "window_width";
pub(crate) const WINDOW_ZOOMED_FLAG: &str = "window_zoomed_flag";

// Pane variables.
pub(crate) const PANE_ACTIVE: &str = "pane_active";
pub(crate) const PANE_AT_BOTTOM: &str = "pane_at_bottom";
pub(crate) const PANE_AT_LEFT: &str = "pane_at_left";
pub(crate) const PANE_AT_RIGHT: &str = "pane_at_right";
pub(crate) const PANE_AT_TOP: &str = "pane_at_top";
pub(crate) const PANE_BG: &str = "pane_bg";
pub(crate) const PANE_BOTTOM: &str = "pane_bottom";
pub(crate) const PANE_CURRENT_COMMAND: &str = "pane_current_command";
pub(crate) const PANE_CURRENT_PATH: &str = "pane_current_path";
pub(crate) const PANE_DEAD: &str = "pane_dead";
pub(crate) const PANE_DEAD_SIGNAL: &str = "pane_dead_signal";
pub(crate) const PANE_DEAD_STATUS: &str = "pane_dead_status";
pub(crate) const PANE_DEAD_TIME: &str = "pane_dead_time";
pub(crate) const PANE_FG: &str = "pane_fg";
pub(crate) const PANE_FORMAT: &str = "pane_format";
pub(crate) const PANE_HEIGHT: &str = "pane_height";
pub(crate) const PANE_ID: &str = "pane_id";
pub(crate) const PANE_IN_MODE: &str = "pane_in_mode";
pub(crate) const PANE_INDEX: &str = "pane_index";
pub(crate) const PANE_INPUT_OFF: &str = "pane_input_off";
pub(crate) const PANE_LAST: &str = "pane_last";
pub(crate) const PANE_LEFT: &str = "pane_left";
pub(crate) const PANE_MARKED: &str = "pane_marked";
pub(crate) const PANE_MARKED_SET: &str = "pane_marked_set";
pub(crate) const PANE_MODE: &str = "pane_mode";
pub(crate) const PANE_PATH: &str = "pane_path";
pub(crate) const PANE_PID: &str = "pane_pid";
pub(crate) const PANE_PIPE: &str = "pane_pipe";
pub(crate) const PANE_RIGHT: &str = "pane_right";
pub(crate) const PANE_SEARCH_STRING: &str = "pane_search_string";
pub(crate) const PANE_START_COMMAND: &str = "pane_start_command";
pub(crate) const PANE_START_PATH: &str = "pane_start_path";
pub(crate) const PANE_SYNCHRONIZED: &str = "pane_synchronized";
pub(crate) const PANE_TABS: &str = "pane_tabs";
pub(crate) const PANE_TITLE: &str = "pane_title";
pub(crate) const PANE_TOP: &str = "pane_top";
pub(crate) const PANE_TTY: &str = "pane_tty";
pub(crate) const PANE_UNSEEN_CHANGES: &str = "pane_unseen_changes";
pub(crate) const PANE_WIDTH: &str = "pane_width";

// Client variables.
pub(crate) const CLIENT_ACTIVITY: &str = "client_activity";
pub(crate) const CLIENT_CELL_HEIGHT: &str = "client_cell_height";
pub(crate) const CLIENT_CELL_WIDTH: &str = "client_cell_width";
pub(crate) const CLIENT_CONTROL_MODE: &str = "client_control_mode";
pub(crate) const CLIENT_CREATED: &str = "client_created";
pub(crate) const CLIENT_DISCARDED: &str = "client_discarded";
pub(crate) const CLIENT_FLAGS: &str = "client_flags";
pub(crate) const CLIENT_HEIGHT: &str = "client_height";
pub(crate) const CLIENT_KEY_TABLE: &str = "client_key_table";
pub(crate) const CLIENT_LAST_SESSION: &str = "client_last_session";
pub(crate) const CLIENT_NAME: &str = "client_name";
pub(crate) const CLIENT_PID: &str = "client_pid";
pub(crate) const CLIENT_PREFIX: &str = "client_prefix";
pub(crate) const CLIENT_READONLY: &str = "client_readonly";
pub(crate) const CLIENT_SESSION: &str = "client_session";
pub(crate) const CLIENT_TERMFEATURES: &str = "client_termfeatures";
pub(crate) const CLIENT_TERMNAME: &str = "client_termname";
pub(crate) const CLIENT_TERMTYPE: &str = "client_termtype";
pub(crate) const CLIENT_TTY: &str = "client_tty";
pub(crate) const CLIENT_UID: &str = "client_uid";
pub(crate) const CLIENT_USER: &str = "client_user";
pub(crate) const CLIENT_UTF8: &str = "client_utf8";
pub(crate) const CLIENT_WIDTH: &str = "client_width";
pub(crate) const CLIENT_WRITTEN: &str = "client_written";

// Server variables.
pub(crate) const SERVER_PID: &str = "pid";
pub(crate) const SERVER_SOCKET_PATH: &str = "socket_path";
pub(crate) const SERVER_START_TIME: &str = "start_time";
pub(crate) const SERVER_UID: &str = "uid";
pub(crate) const SERVER_USER: &str = "user";
pub(crate) const SERVER_VERSION: &str = "version";
