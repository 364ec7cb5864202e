use crate::session::{Context, SessionEvent};
use log::info;

/// Handles the QUIT FTP command. The Stop stage closes the socket on the next poll.
pub fn handle_quit_command(ctx: &mut Context<'_>, _arg: &str) {
    info!("Client requested to quit");
    ctx.reply("221 Goodbye");
    ctx.session.transition(SessionEvent::Quit);
}
