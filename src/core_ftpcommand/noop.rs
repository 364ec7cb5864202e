use crate::session::Context;

/// Handles the NOOP FTP command.
pub fn handle_noop_command(ctx: &mut Context<'_>, _arg: &str) {
    ctx.reply("200 Zzz...");
}
