use crate::session::Context;
use log::{debug, info};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Parses `h1,h2,h3,h4,p1,p2`. Every field must be a decimal octet.
pub fn parse_port_argument(arg: &str) -> Option<SocketAddrV4> {
    let fields = arg
        .split(',')
        .map(|f| f.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .ok()?;
    let [h1, h2, h3, h4, p1, p2] = fields[..] else {
        return None;
    };
    let port = (p1 as u16) << 8 | p2 as u16;
    Some(SocketAddrV4::new(Ipv4Addr::new(h1, h2, h3, h4), port))
}

/// Handles the PORT (Active Mode) FTP command.
/// Only records the address; the connection is made when a transfer starts.
pub fn handle_port_command(ctx: &mut Context<'_>, arg: &str) {
    match parse_port_argument(arg) {
        Some(addr) => {
            info!("Received PORT command with address {}", addr);
            ctx.session.data.set_active(ctx.transport, addr);
            ctx.reply("200 PORT command successful");
        }
        None => {
            debug!("Rejected PORT argument {:?}", arg);
            ctx.reply("501 Can't interpret parameters");
        }
    }
}
