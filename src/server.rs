use crate::config::Config;
use crate::constants::{AUTH_REPLY_DELAY, MAX_COMMAND_LINE, SERVER_VERSION, TIMEOUT_CLOSE_DELAY};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{dispatch, initialize_command_handlers, CommandHandler};
use crate::core_ftpcommand::reader::{CommandReader, ReadOutcome};
use crate::core_network::error::NetworkError;
use crate::core_network::transport::Transport;
use crate::core_storage::storage::Storage;
use crate::core_transfer::engine;
use crate::session::{Context, Session, SessionEvent, SessionStage};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Retry pace when the control listener cannot be armed
const LISTEN_RETRY_DELAY: Duration = Duration::from_secs(1);

/// The whole server: one control session over a storage and a transport.
///
/// Nothing in here blocks. Call [`FtpServer::service`] repeatedly; each call
/// does a bounded amount of work and reports whether it made progress.
pub struct FtpServer {
    config: Arc<Config>,
    storage: Box<dyn Storage>,
    transport: Box<dyn Transport>,
    session: Session,
    reader: CommandReader,
    handlers: HashMap<FtpCommand, CommandHandler>,
}

impl FtpServer {
    pub fn new(config: Arc<Config>, storage: Box<dyn Storage>, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            storage,
            transport,
            session: Session::new(Instant::now()),
            reader: CommandReader::new(MAX_COMMAND_LINE),
            handlers: initialize_command_handlers(),
        }
    }

    /// Arms the control listener so bind errors surface at start-up.
    pub fn init(&mut self) -> Result<(), NetworkError> {
        self.transport.listen_control()?;
        info!("{} ready", SERVER_VERSION);
        Ok(())
    }

    pub fn stage(&self) -> SessionStage {
        self.session.stage
    }

    pub fn service(&mut self) -> bool {
        self.service_at(Instant::now())
    }

    /// One poll at `now`: command input first, then the transfer, then the timeout.
    pub fn service_at(&mut self, now: Instant) -> bool {
        if let Some(until) = self.session.hold_until {
            if now < until {
                return false;
            }
            self.session.hold_until = None;
        }

        let FtpServer {
            config,
            storage,
            transport,
            session,
            reader,
            handlers,
        } = self;
        let mut ctx = Context {
            config: &**config,
            storage: &mut **storage,
            transport: &mut **transport,
            session,
            now,
        };

        let mut progress = step_session(&mut ctx, reader, handlers);

        if !ctx.session.transfer.is_closed() {
            progress |= engine::step(&mut ctx);
            if ctx.session.transfer.is_closed() && ctx.session.stage.is_logged_in() {
                ctx.session.deadline = now + ctx.config.server.idle_timeout();
            }
        } else if ctx.session.stage.has_client() && now >= ctx.session.deadline {
            info!("Session timed out in stage {:?}", ctx.session.stage);
            ctx.reply("530 Timeout");
            ctx.session.transition(SessionEvent::TimedOut);
            ctx.session.hold_until = Some(now + TIMEOUT_CLOSE_DELAY);
            progress = true;
        }

        progress
    }

    /// Aborts any transfer and closes both channels.
    pub fn shutdown(&mut self) {
        info!("Shutting down");
        let mut ctx = Context {
            config: &self.config,
            storage: &mut *self.storage,
            transport: &mut *self.transport,
            session: &mut self.session,
            now: Instant::now(),
        };
        engine::abort_transfer(&mut ctx);
        ctx.transport.close_data();
        ctx.transport.close_control();
        ctx.session.reset();
        ctx.session.stage = SessionStage::Stop;
    }
}

fn step_session(
    ctx: &mut Context<'_>,
    reader: &mut CommandReader,
    handlers: &HashMap<FtpCommand, CommandHandler>,
) -> bool {
    match ctx.session.stage {
        SessionStage::Stop => {
            disconnect_client(ctx);
            ctx.session.transition(SessionEvent::Tick);
            true
        }
        SessionStage::Init => {
            disconnect_client(ctx);
            ctx.session.reset();
            reader.reset();
            if let Err(e) = ctx.transport.listen_control() {
                error!("Cannot listen for clients: {}", e);
                ctx.session.hold_until = Some(ctx.now + LISTEN_RETRY_DELAY);
                return false;
            }
            ctx.session.transition(SessionEvent::Tick);
            true
        }
        SessionStage::Client => match ctx.transport.accept_control() {
            Ok(true) => {
                send_greeting(ctx);
                ctx.session.deadline = ctx.now + ctx.config.server.auth_timeout();
                ctx.session.transition(SessionEvent::ClientAccepted);
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("Accept failed: {}", e);
                false
            }
        },
        SessionStage::User | SessionStage::Pass | SessionStage::Cmd => {
            read_command(ctx, reader, handlers)
        }
    }
}

fn read_command(
    ctx: &mut Context<'_>,
    reader: &mut CommandReader,
    handlers: &HashMap<FtpCommand, CommandHandler>,
) -> bool {
    match reader.poll(ctx.transport) {
        ReadOutcome::Command(command) => {
            dispatch(handlers, ctx, &command);
            match ctx.session.stage {
                SessionStage::User | SessionStage::Pass => {
                    ctx.session.hold_until = Some(ctx.now + AUTH_REPLY_DELAY);
                }
                SessionStage::Cmd => {
                    ctx.session.deadline = ctx.now + ctx.config.server.idle_timeout();
                }
                _ => {}
            }
            true
        }
        ReadOutcome::LineTooLong | ReadOutcome::SyntaxError => {
            debug!("Rejected malformed command line");
            ctx.reply("500 Syntax error");
            true
        }
        ReadOutcome::EmptyLine => true,
        ReadOutcome::NoData => {
            if ctx.transport.control_connected() {
                return false;
            }
            info!("Client disconnected");
            engine::abort_transfer(ctx);
            ctx.transport.close_data();
            ctx.session.transition(SessionEvent::Disconnected);
            true
        }
    }
}

fn send_greeting(ctx: &mut Context<'_>) {
    ctx.reply("220--- Welcome to tickftpd ---");
    ctx.reply("220---   One client at a time   ---");
    ctx.reply(format!("220 --   Version {}   --", SERVER_VERSION));
}

fn disconnect_client(ctx: &mut Context<'_>) {
    engine::abort_transfer(ctx);
    ctx.transport.close_data();
    if ctx.transport.control_connected() {
        info!("Closing control connection");
    }
    ctx.transport.close_control();
}
