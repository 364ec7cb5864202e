use crate::session::{Context, SessionEvent, SessionStage};
use log::{info, warn};

/// Handles the PASS FTP command.
///
/// Only valid right after an accepted USER. On success the idle deadline
/// takes over from the authentication deadline.
pub fn handle_pass_command(ctx: &mut Context<'_>, password: &str) {
    if ctx.session.stage != SessionStage::Pass {
        warn!("PASS received out of sequence");
        ctx.reply("503 Login with USER first");
        ctx.session.transition(SessionEvent::Rejected);
        return;
    }

    if password == ctx.config.server.password {
        info!("User {} logged in", ctx.config.server.username);
        ctx.reply("230 Ok");
        ctx.session.transition(SessionEvent::PassAccepted);
        ctx.session.deadline = ctx.now + ctx.config.server.idle_timeout();
    } else {
        warn!("Wrong password for user {}", ctx.config.server.username);
        ctx.reply("530 Login incorrect");
        ctx.session.transition(SessionEvent::Rejected);
    }
}
