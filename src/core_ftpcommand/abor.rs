use crate::core_transfer::engine::abort_transfer;
use crate::session::Context;

/// Handles the ABOR FTP command.
pub fn handle_abor_command(ctx: &mut Context<'_>, _arg: &str) {
    abort_transfer(ctx);
    ctx.transport.close_data();
    ctx.reply("226 Data connection closed");
}
