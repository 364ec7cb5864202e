use crate::core_ftpcommand::site::site_free::handle_free_command;
use crate::session::Context;
use log::{info, warn};

/// Handles the SITE FTP command by dispatching on its first word.
pub fn handle_site_command(ctx: &mut Context<'_>, arg: &str) {
    let mut args = arg.split_whitespace();
    let subcommand = args.next().unwrap_or_default().to_ascii_uppercase();

    match subcommand.as_str() {
        "FREE" => {
            info!("Handling SITE FREE command");
            handle_free_command(ctx);
        }
        _ => {
            warn!("Unknown SITE subcommand: {}", arg);
            ctx.reply(format!("500 Unknown SITE command {}", arg));
        }
    }
}
