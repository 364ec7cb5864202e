use crate::core_ftpcommand::utils::{have_parameter, resolve_path};
use crate::session::Context;
use log::{error, info};

/// Handles the MKD (Make Directory) FTP command.
///
/// # Arguments
///
/// * `ctx` - The session context of the current poll.
/// * `arg` - The directory to create, absolute or relative.
pub fn handle_mkd_command(ctx: &mut Context<'_>, arg: &str) {
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_path(ctx, arg) else {
        return;
    };

    if ctx.storage.exists(&path) {
        ctx.reply(format!("521 \"{}\" directory already exists", arg));
        return;
    }

    match ctx.storage.mkdir(&path) {
        Ok(()) => {
            info!("Created directory {}", path);
            ctx.reply(format!("257 \"{}\" created", arg));
        }
        Err(e) => {
            error!("Failed to create directory {}: {}", path, e);
            ctx.reply(format!("550 Can't create \"{}\"", arg));
        }
    }
}
