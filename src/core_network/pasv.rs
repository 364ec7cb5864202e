use crate::session::Context;
use log::{debug, error};
use std::net::Ipv4Addr;

/// Formats the 227 reply advertising `ip:port`.
pub fn format_pasv_response(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{})",
        h1,
        h2,
        h3,
        h4,
        port >> 8,
        port & 0xff
    )
}

/// Handles the PASV command: (re)opens the data listener and tells the client where it is.
pub fn handle_pasv_command(ctx: &mut Context<'_>, _arg: &str) {
    let server = &ctx.config.server;
    let port = server.pasv_port;
    let ip = match server.pasv_ipv4() {
        Ok(ip) => ip,
        Err(e) => {
            error!("Cannot advertise passive address: {:#}", e);
            ctx.reply("425 Can't open data connection");
            return;
        }
    };

    if let Err(e) = ctx.session.data.set_passive(ctx.transport, port) {
        error!("Failed to set up the passive listener: {}", e);
        ctx.reply(e.to_ftp_response());
        return;
    }

    let response = format_pasv_response(ip, port);
    debug!("Passive mode on {}:{}", ip, port);
    ctx.reply(response);
}
