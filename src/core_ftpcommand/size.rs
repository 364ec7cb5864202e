use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::session::Context;
use log::debug;

/// Handles the SIZE FTP command (RFC 3659). Directories have no size.
pub fn handle_size_command(ctx: &mut Context<'_>, arg: &str) {
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };

    match ctx.storage.metadata(&path) {
        Ok(entry) if !entry.is_dir => ctx.reply(format!("213 {}", entry.size)),
        Ok(_) => ctx.reply(format!("450 Can't open {}", arg)),
        Err(e) => {
            debug!("SIZE on {} failed: {}", path, e);
            ctx.reply(format!("450 Can't open {}", arg));
        }
    }
}
