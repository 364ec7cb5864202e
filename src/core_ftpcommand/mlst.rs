use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::core_transfer::listing::mlsx_facts;
use crate::session::Context;
use log::warn;

/// Handles the MLST FTP command (RFC 3659). The facts travel on the control channel.
pub fn handle_mlst_command(ctx: &mut Context<'_>, arg: &str) {
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };

    match ctx.storage.metadata(&path) {
        Ok(entry) => {
            ctx.reply("250-Begin");
            ctx.reply(format!(" {}", mlsx_facts(&entry, &path)));
            ctx.reply("250 End.");
        }
        Err(e) => {
            warn!("MLST on {} failed: {}", path, e);
            ctx.reply(format!("450 Can't open {}", arg));
        }
    }
}
