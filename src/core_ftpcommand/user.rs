use crate::session::{Context, SessionEvent};
use log::{info, warn};

/// Handles the USER FTP command.
///
/// Accepted in every stage after the greeting: a known user name restarts
/// the login and resets the working directory, anything else ends the session.
///
/// # Arguments
///
/// * `ctx` - The session context of the current poll.
/// * `username` - The username provided by the client.
pub fn handle_user_command(ctx: &mut Context<'_>, username: &str) {
    info!("Received USER command with username: {}", username);

    if username == ctx.config.server.username {
        ctx.session.current_dir = String::from("/");
        ctx.reply("331 Ok. Password required");
        ctx.session.transition(SessionEvent::UserAccepted);
    } else {
        warn!("Unknown user: {}", username);
        ctx.reply("530 Not logged in");
        ctx.session.transition(SessionEvent::Rejected);
    }
}
