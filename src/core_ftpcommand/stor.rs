use crate::core_ftpcommand::utils::{have_parameter, resolve_path};
use crate::core_storage::storage::OpenMode;
use crate::core_transfer::engine::{begin_transfer, refuse_if_busy};
use crate::core_transfer::transfer::TransferKind;
use crate::session::Context;
use log::{info, warn};

/// Handles the STOR FTP command: create or truncate, then receive.
pub fn handle_stor_command(ctx: &mut Context<'_>, arg: &str) {
    store(ctx, arg, OpenMode::Write);
}

/// Handles the APPE FTP command: create or append, then receive.
pub fn handle_appe_command(ctx: &mut Context<'_>, arg: &str) {
    store(ctx, arg, OpenMode::Append);
}

fn store(ctx: &mut Context<'_>, arg: &str, mode: OpenMode) {
    if refuse_if_busy(ctx) || !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_path(ctx, arg) else {
        return;
    };

    let file = match ctx.storage.open(&path, mode) {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to open {} for writing: {}", path, e);
            ctx.reply(format!("451 Can't open/create {}", arg));
            return;
        }
    };

    info!("Receiving {} ({:?})", path, mode);
    begin_transfer(ctx, TransferKind::Store, Some(file), path);
}
