use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::session::Context;
use log::{info, warn};

/// Handles the DELE (Delete) FTP command.
pub fn handle_dele_command(ctx: &mut Context<'_>, arg: &str) {
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };

    match ctx.storage.remove(&path) {
        Ok(()) => {
            info!("Deleted {}", path);
            ctx.reply(format!("250 Deleted {}", arg));
        }
        Err(e) => {
            warn!("Failed to delete {}: {}", path, e);
            ctx.reply(format!("450 Can't delete {}", arg));
        }
    }
}
