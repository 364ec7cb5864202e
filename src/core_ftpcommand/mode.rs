use crate::session::Context;

/// Handles the MODE FTP command. Only stream mode exists here.
pub fn handle_mode_command(ctx: &mut Context<'_>, arg: &str) {
    if arg == "S" {
        ctx.reply("200 S Ok");
    } else {
        ctx.reply("504 Only S(tream) is supported");
    }
}
