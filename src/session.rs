use crate::config::Config;
use crate::core_network::data_channel::DataConnection;
use crate::core_network::transport::Transport;
use crate::core_storage::storage::Storage;
use crate::core_transfer::transfer::Transfer;
use crate::helpers::send_response;
use log::info;
use std::time::Instant;

/// Stage of the control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionStage {
    Stop,   // close any connection
    Init,   // reset the session and rearm listening
    Client, // wait for a client
    User,   // wait for the user name
    Pass,   // wait for the password
    Cmd,    // answer commands
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick,
    ClientAccepted,
    UserAccepted,
    PassAccepted,
    Rejected,
    Quit,
    TimedOut,
    Disconnected,
}

impl SessionStage {
    pub fn on(self, event: SessionEvent) -> SessionStage {
        use SessionEvent::*;
        use SessionStage::*;

        match (self, event) {
            (Stop, Tick) => Init,
            (Init, Tick) => Client,
            (Client, ClientAccepted) => User,
            (Stop, _) => Stop,
            (_, Disconnected) => Init,
            (User | Pass | Cmd, UserAccepted) => Pass,
            (Pass, PassAccepted) => Cmd,
            (User | Pass | Cmd, Rejected | Quit | TimedOut) => Stop,
            (stage, _) => stage,
        }
    }

    pub fn is_logged_in(self) -> bool {
        self == SessionStage::Cmd
    }

    /// A control client is attached and talking to us.
    pub fn has_client(self) -> bool {
        self > SessionStage::Client
    }
}

/// State of the single control connection.
#[derive(Debug)]
pub struct Session {
    pub stage: SessionStage,
    pub current_dir: String,
    pub rename_from: Option<String>,
    /// Auth deadline before login, idle deadline after.
    pub deadline: Instant,
    /// No poll does any work before this instant.
    pub hold_until: Option<Instant>,
    pub data: DataConnection,
    pub transfer: Transfer,
}

impl Session {
    pub fn new(now: Instant) -> Self {
        Self {
            stage: SessionStage::Stop,
            current_dir: String::from("/"),
            rename_from: None,
            deadline: now,
            hold_until: None,
            data: DataConnection::new(),
            transfer: Transfer::new(),
        }
    }

    pub fn transition(&mut self, event: SessionEvent) {
        let next = self.stage.on(event);
        if next != self.stage {
            info!("Session stage {:?} -> {:?} ({:?})", self.stage, next, event);
            self.stage = next;
        }
    }

    /// Forgets everything tied to the previous client.
    pub fn reset(&mut self) {
        self.current_dir = String::from("/");
        self.rename_from = None;
        self.hold_until = None;
        self.data.clear_mode();
    }
}

/// Everything a command handler or transfer step may touch during one poll.
pub struct Context<'a> {
    pub config: &'a Config,
    pub storage: &'a mut dyn Storage,
    pub transport: &'a mut dyn Transport,
    pub session: &'a mut Session,
    pub now: Instant,
}

impl Context<'_> {
    pub fn reply(&mut self, message: impl AsRef<str>) {
        send_response(self.transport, message.as_ref());
    }
}
