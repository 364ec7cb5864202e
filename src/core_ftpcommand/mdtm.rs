use crate::core_ftpcommand::utils::resolve_existing_path;
use crate::core_storage::fat_time::parse_mdtm_timestamp;
use crate::session::Context;
use chrono::NaiveDateTime;
use log::{error, warn};
use regex::Regex;

// YYYYMMDDHHMMSS, optional milliseconds, then the file name
const TIME_ARGUMENT: &str = r"^(\d{14})\d{0,3} +(.*)$";

#[derive(Debug, PartialEq, Eq)]
enum TimeArgument<'a> {
    Name(&'a str),
    Stamped(NaiveDateTime, &'a str, &'a str),
    InvalidDate,
}

fn split_time_argument(arg: &str) -> TimeArgument<'_> {
    let pattern = match Regex::new(TIME_ARGUMENT) {
        Ok(pattern) => pattern,
        Err(e) => {
            error!("Bad timestamp pattern: {}", e);
            return TimeArgument::Name(arg);
        }
    };
    let Some(caps) = pattern.captures(arg) else {
        return TimeArgument::Name(arg);
    };
    let (Some(digits), Some(name)) = (caps.get(1), caps.get(2)) else {
        return TimeArgument::Name(arg);
    };
    match parse_mdtm_timestamp(digits.as_str()) {
        Some(when) => TimeArgument::Stamped(when, digits.as_str(), name.as_str()),
        None => TimeArgument::InvalidDate,
    }
}

/// Handles the MDTM FTP command (RFC 3659): reads the modification time,
/// or sets it when the argument starts with a timestamp.
pub fn handle_mdtm_command(ctx: &mut Context<'_>, arg: &str) {
    modification_time(ctx, arg, false);
}

/// Handles the MFMT FTP command: sets the modification time.
pub fn handle_mfmt_command(ctx: &mut Context<'_>, arg: &str) {
    modification_time(ctx, arg, true);
}

fn modification_time(ctx: &mut Context<'_>, arg: &str, must_set: bool) {
    let (stamp, name) = match split_time_argument(arg) {
        TimeArgument::Name(name) => (None, name),
        TimeArgument::Stamped(when, digits, name) => (Some((when, digits)), name),
        TimeArgument::InvalidDate => {
            ctx.reply("501 Invalid date");
            return;
        }
    };
    if name.is_empty() {
        ctx.reply("501 No file name");
        return;
    }
    if stamp.is_none() && must_set {
        ctx.reply("501 Missing timestamp");
        return;
    }
    let Some(path) = resolve_existing_path(ctx, name) else {
        return;
    };

    match stamp {
        Some((when, digits)) => match ctx.storage.set_modified(&path, when) {
            Ok(()) => ctx.reply(format!("213 {}", digits)),
            Err(e) => {
                warn!("Failed to set the time of {}: {}", path, e);
                ctx.reply("550 Unable to modify time");
            }
        },
        None => match ctx.storage.modified(&path) {
            Ok(stamp) => ctx.reply(format!("213 {}", stamp)),
            Err(e) => {
                warn!("Failed to read the time of {}: {}", path, e);
                ctx.reply("550 Unable to retrieve time");
            }
        },
    }
}
