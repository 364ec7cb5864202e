use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::session::Context;
use log::{info, warn};

/// Handles the RMD (Remove Directory) FTP command. Only empty directories go.
pub fn handle_rmd_command(ctx: &mut Context<'_>, arg: &str) {
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };

    match ctx.storage.rmdir(&path) {
        Ok(()) => {
            info!("Removed directory {}", path);
            ctx.reply(format!("250 \"{}\" deleted", arg));
        }
        Err(e) => {
            warn!("Failed to remove directory {}: {}", path, e);
            ctx.reply(format!("550 Can't remove \"{}\". Directory not empty?", arg));
        }
    }
}
