use crate::core_ftpcommand::path::{make_exists_path, make_path};
use crate::session::Context;
use log::debug;

/// Replies `501 No file name` when the command came without its argument.
pub fn have_parameter(ctx: &mut Context<'_>, arg: &str) -> bool {
    if arg.is_empty() {
        ctx.reply("501 No file name");
        return false;
    }
    true
}

/// Resolves `arg` against the working directory, replying on failure.
pub fn resolve_path(ctx: &mut Context<'_>, arg: &str) -> Option<String> {
    match make_path(&ctx.session.current_dir, arg) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!("Rejected path {:?}: {}", arg, e);
            ctx.reply(e.to_ftp_response());
            None
        }
    }
}

/// Same as `resolve_path`, and the result must exist.
pub fn resolve_existing_path(ctx: &mut Context<'_>, arg: &str) -> Option<String> {
    match make_exists_path(&*ctx.storage, &ctx.session.current_dir, arg) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!("Rejected path {:?}: {}", arg, e);
            ctx.reply(e.to_ftp_response());
            None
        }
    }
}
