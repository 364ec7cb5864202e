use crate::core_ftpcommand::utils::resolve_existing_path;
use crate::core_transfer::engine::{begin_transfer, refuse_if_busy};
use crate::core_transfer::transfer::{ListFormat, TransferKind};
use crate::session::Context;
use log::warn;

/// Handles the LIST FTP command (EPLF lines).
pub fn handle_list_command(ctx: &mut Context<'_>, arg: &str) {
    list(ctx, arg, ListFormat::List);
}

/// Handles the NLST FTP command (bare names).
pub fn handle_nlst_command(ctx: &mut Context<'_>, arg: &str) {
    list(ctx, arg, ListFormat::Nlst);
}

/// Handles the MLSD FTP command (RFC 3659 facts).
pub fn handle_mlsd_command(ctx: &mut Context<'_>, arg: &str) {
    list(ctx, arg, ListFormat::Mlsd);
}

fn list(ctx: &mut Context<'_>, arg: &str, format: ListFormat) {
    if refuse_if_busy(ctx) {
        return;
    }

    // Client options such as "-la" are not a directory
    let path = if arg.is_empty() || arg.starts_with('-') {
        ctx.session.current_dir.clone()
    } else {
        let Some(path) = resolve_existing_path(ctx, arg) else {
            return;
        };
        path
    };
    if !ctx.storage.is_dir(&path) {
        warn!("Cannot list {}: not a directory", path);
        ctx.reply(format!("550 Can't open directory {}", path));
        return;
    }

    begin_transfer(ctx, TransferKind::List(format), None, path);
}
