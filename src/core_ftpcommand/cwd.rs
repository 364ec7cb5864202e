use crate::core_ftpcommand::cdup::handle_cdup_command;
use crate::core_ftpcommand::pwd::handle_pwd_command;
use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::session::Context;
use log::{info, warn};

/// Handles the CWD (Change Working Directory) FTP command.
///
/// `CWD .` and `CWD ..` behave like PWD and CDUP.
///
/// # Arguments
///
/// * `ctx` - The session context of the current poll.
/// * `arg` - The directory to change to, absolute or relative.
pub fn handle_cwd_command(ctx: &mut Context<'_>, arg: &str) {
    match arg {
        "." => return handle_pwd_command(ctx, arg),
        ".." => return handle_cdup_command(ctx, arg),
        _ => {}
    }
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };
    if !ctx.storage.is_dir(&path) {
        warn!("CWD target is not a directory: {}", path);
        ctx.reply(format!("550 \"{}\" is not directory", path));
        return;
    }

    info!("Changed directory to: {}", path);
    ctx.session.current_dir = path;
    let response = format!("250 Directory changed to {}", ctx.session.current_dir);
    ctx.reply(response);
}
