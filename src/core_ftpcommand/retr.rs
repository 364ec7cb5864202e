use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::core_storage::storage::OpenMode;
use crate::core_transfer::engine::{begin_transfer, refuse_if_busy};
use crate::core_transfer::transfer::TransferKind;
use crate::session::Context;
use log::{info, warn};

/// Handles the RETR (Retrieve) FTP command.
///
/// Opens the file, then hands it to the transfer engine which sends one
/// chunk per poll once the data connection is up.
pub fn handle_retr_command(ctx: &mut Context<'_>, arg: &str) {
    if refuse_if_busy(ctx) || !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };

    let file = match ctx.storage.open(&path, OpenMode::Read) {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to open {} for reading: {}", path, e);
            ctx.reply(format!("450 Can't open {}", arg));
            return;
        }
    };

    info!("Sending {}", path);
    begin_transfer(ctx, TransferKind::Retrieve, Some(file), path);
}
