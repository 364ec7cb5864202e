use crate::session::Context;

/// Handles the STRU FTP command. Only file structure exists here.
pub fn handle_stru_command(ctx: &mut Context<'_>, arg: &str) {
    if arg == "F" {
        ctx.reply("200 F Ok");
    } else {
        ctx.reply("504 Only F(ile) is supported");
    }
}
