use crate::core_ftpcommand::utils::{have_parameter, resolve_existing_path};
use crate::session::Context;
use log::debug;

/// Handles the RNFR (Rename From) FTP command.
pub fn handle_rnfr_command(ctx: &mut Context<'_>, arg: &str) {
    ctx.session.rename_from = None;
    if !have_parameter(ctx, arg) {
        return;
    }
    let Some(path) = resolve_existing_path(ctx, arg) else {
        return;
    };

    debug!("Ready for renaming {}", path);
    ctx.session.rename_from = Some(path);
    ctx.reply("350 RNFR accepted - file exists, ready for destination");
}
