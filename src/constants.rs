// src/constants.rs

use std::time::Duration;

pub const SERVER_VERSION: &str = "tickftpd-0.1.0";

/// Longest file name a directory entry may carry.
pub const MAX_NAME_LENGTH: usize = 255;
/// Capacity of the command line buffer.
pub const MAX_COMMAND_LINE: usize = MAX_NAME_LENGTH + 8;
/// Resolved paths must stay strictly below this length.
pub const MAX_PATH_LENGTH: usize = MAX_NAME_LENGTH + 8;
pub const MAX_VERB_LENGTH: usize = 4;

/// Characters a path may never contain, on top of the printable ASCII rule.
pub const FORBIDDEN_PATH_CHARS: &str = "\"*?:<>|";

/// Hold-off after each command received before login.
pub const AUTH_REPLY_DELAY: Duration = Duration::from_millis(200);
/// Hold-off between the timeout reply and closing the control connection.
pub const TIMEOUT_CLOSE_DELAY: Duration = Duration::from_millis(200);

pub const DEFAULT_CONFIG_PATH: &str = "/etc/tickftpd.conf";
