use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::reader::Command;
use crate::core_ftpcommand::{
    abor, cdup, cwd, dele, feat, list, mdtm, mkd, mlst, mode, noop, pass, pwd, quit, retr, rmd,
    rnfr, rnto, site, size, stor, stru, type_, user,
};
use crate::core_network::{pasv, port};
use crate::session::{Context, SessionEvent};
use log::{debug, warn};
use std::collections::HashMap;

pub type CommandHandler = fn(&mut Context<'_>, &str);

pub fn initialize_command_handlers() -> HashMap<FtpCommand, CommandHandler> {
    let mut handlers: HashMap<FtpCommand, CommandHandler> = HashMap::new();

    handlers.insert(FtpCommand::USER, user::handle_user_command);
    handlers.insert(FtpCommand::PASS, pass::handle_pass_command);
    handlers.insert(FtpCommand::AUTH, handle_auth_command);
    handlers.insert(FtpCommand::FEAT, feat::handle_feat_command);
    handlers.insert(FtpCommand::QUIT, quit::handle_quit_command);

    handlers.insert(FtpCommand::PWD, pwd::handle_pwd_command);
    handlers.insert(FtpCommand::CWD, cwd::handle_cwd_command);
    handlers.insert(FtpCommand::CDUP, cdup::handle_cdup_command);

    handlers.insert(FtpCommand::MODE, mode::handle_mode_command);
    handlers.insert(FtpCommand::STRU, stru::handle_stru_command);
    handlers.insert(FtpCommand::TYPE, type_::handle_type_command);
    handlers.insert(FtpCommand::PASV, pasv::handle_pasv_command);
    handlers.insert(FtpCommand::PORT, port::handle_port_command);

    handlers.insert(FtpCommand::ABOR, abor::handle_abor_command);
    handlers.insert(FtpCommand::RETR, retr::handle_retr_command);
    handlers.insert(FtpCommand::STOR, stor::handle_stor_command);
    handlers.insert(FtpCommand::APPE, stor::handle_appe_command);
    handlers.insert(FtpCommand::LIST, list::handle_list_command);
    handlers.insert(FtpCommand::NLST, list::handle_nlst_command);
    handlers.insert(FtpCommand::MLSD, list::handle_mlsd_command);
    handlers.insert(FtpCommand::MLST, mlst::handle_mlst_command);

    handlers.insert(FtpCommand::DELE, dele::handle_dele_command);
    handlers.insert(FtpCommand::MKD, mkd::handle_mkd_command);
    handlers.insert(FtpCommand::RMD, rmd::handle_rmd_command);
    handlers.insert(FtpCommand::RNFR, rnfr::handle_rnfr_command);
    handlers.insert(FtpCommand::RNTO, rnto::handle_rnto_command);

    handlers.insert(FtpCommand::NOOP, noop::handle_noop_command);
    handlers.insert(FtpCommand::MDTM, mdtm::handle_mdtm_command);
    handlers.insert(FtpCommand::MFMT, mdtm::handle_mfmt_command);
    handlers.insert(FtpCommand::SIZE, size::handle_size_command);
    handlers.insert(FtpCommand::SITE, site::handle_site_command);

    handlers
}

/// TLS is not offered.
fn handle_auth_command(ctx: &mut Context<'_>, _arg: &str) {
    ctx.reply("502 Security extensions not implemented");
}

/// Routes one command line to its handler, enforcing the login gate.
pub fn dispatch(
    handlers: &HashMap<FtpCommand, CommandHandler>,
    ctx: &mut Context<'_>,
    command: &Command,
) {
    if command.verb == "PASS" {
        debug!("Received command: PASS ****");
    } else {
        debug!("Received command: {} {}", command.verb, command.parameter);
    }

    let verb = FtpCommand::from_str(&command.verb);
    let logged_in = ctx.session.stage.is_logged_in();
    if !logged_in && !verb.map_or(false, FtpCommand::allowed_before_login) {
        warn!("Command {} refused before login", command.verb);
        ctx.reply("530 Please login with USER and PASS");
        ctx.session.transition(SessionEvent::Rejected);
        return;
    }

    match verb.and_then(|v| handlers.get(&v)) {
        Some(handler) => handler(ctx, &command.parameter),
        None => {
            debug!("Unknown command: {}", command.verb);
            ctx.reply("500 Unknown command");
        }
    }
}
