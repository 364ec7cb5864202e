use crate::core_ftpcommand::path::parent;
use crate::session::Context;
use log::debug;

/// Handles the CDUP FTP command (also `CWD ..`).
///
/// Moves to the parent directory, or to the root when the parent has vanished.
pub fn handle_cdup_command(ctx: &mut Context<'_>, _arg: &str) {
    let up = parent(&ctx.session.current_dir).to_string();
    let new_dir = if ctx.storage.is_dir(&up) {
        up
    } else {
        debug!("Parent {} is gone, falling back to the root", up);
        String::from("/")
    };
    ctx.session.current_dir = new_dir;
    let response = format!("250 Ok. Current directory is {}", ctx.session.current_dir);
    ctx.reply(response);
}
