use crate::core_ftpcommand::path::parent;
use crate::core_ftpcommand::utils::{have_parameter, resolve_path};
use crate::session::Context;
use log::{info, warn};

/// Handles the RNTO (Rename To) FTP command.
///
/// Needs a pending RNFR, which is consumed whatever the outcome. The
/// destination must not exist and its parent must be a directory.
pub fn handle_rnto_command(ctx: &mut Context<'_>, arg: &str) {
    let Some(from) = ctx.session.rename_from.take() else {
        ctx.reply("503 Need RNFR before RNTO");
        return;
    };
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(to) = resolve_path(ctx, arg) else {
        return;
    };

    if ctx.storage.exists(&to) {
        ctx.reply(format!("553 {} already exists", arg));
        return;
    }

    let dir = parent(&to).to_string();
    if !ctx.storage.is_dir(&dir) {
        warn!("Rename target parent is not a directory: {}", dir);
        ctx.reply("451 Rename/move failure");
        return;
    }

    match ctx.storage.rename(&from, &to) {
        Ok(()) => {
            info!("Renamed {} to {}", from, to);
            ctx.reply("250 File successfully renamed or moved");
        }
        Err(e) => {
            warn!("Failed to rename {} to {}: {}", from, to, e);
            ctx.reply("451 Rename/move failure");
        }
    }
}
