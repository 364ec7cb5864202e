use crate::session::Context;

/// Handles the PWD FTP command (also `CWD .`).
pub fn handle_pwd_command(ctx: &mut Context<'_>, _arg: &str) {
    let response = format!("257 \"{}\" is your current directory", ctx.session.current_dir);
    ctx.reply(response);
}
