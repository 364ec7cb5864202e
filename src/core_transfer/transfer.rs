use crate::core_storage::storage::{DirCursor, StorageFile};
use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    List,
    Nlst,
    Mlsd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Retrieve,
    Store,
    List(ListFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Closed,
    /// Waiting for the data socket.
    Connecting(TransferKind),
    Running(TransferKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEvent {
    Start(TransferKind),
    DataReady,
    Finished,
    Aborted,
}

impl TransferStage {
    pub fn on(self, event: TransferEvent) -> TransferStage {
        use TransferEvent::*;
        use TransferStage::*;

        match (self, event) {
            (Closed, Start(kind)) => Connecting(kind),
            (Connecting(kind), DataReady) => Running(kind),
            (Running(_), Finished) => Closed,
            (_, Aborted) => Closed,
            (stage, _) => stage,
        }
    }

    pub fn is_closed(self) -> bool {
        self == TransferStage::Closed
    }
}

/// The one transfer a session may have in flight, with the handle it owns.
pub struct Transfer {
    pub stage: TransferStage,
    pub file: Option<Box<dyn StorageFile>>,
    pub cursor: Option<DirCursor>,
    /// Path being sent, received or listed.
    pub path: String,
    /// Outbound bytes read from the file or built from a listing entry;
    /// `sent` counts what already went out. Inbound chunks reuse it.
    pub buffer: Vec<u8>,
    pub filled: usize,
    pub sent: usize,
    pub bytes: u64,
    pub matches: u32,
    pub started: Option<Instant>,
    pub connect_deadline: Option<Instant>,
}

impl Default for Transfer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transfer")
            .field("stage", &self.stage)
            .field("path", &self.path)
            .field("file", &self.file.is_some())
            .field("cursor", &self.cursor.is_some())
            .field("bytes", &self.bytes)
            .field("matches", &self.matches)
            .finish()
    }
}

impl Transfer {
    pub fn new() -> Self {
        Self {
            stage: TransferStage::Closed,
            file: None,
            cursor: None,
            path: String::new(),
            buffer: Vec::new(),
            filled: 0,
            sent: 0,
            bytes: 0,
            matches: 0,
            started: None,
            connect_deadline: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.stage.is_closed()
    }

    pub fn kind(&self) -> Option<TransferKind> {
        match self.stage {
            TransferStage::Closed => None,
            TransferStage::Connecting(kind) | TransferStage::Running(kind) => Some(kind),
        }
    }

    /// Enters `Connecting` with fresh counters.
    pub fn prepare(
        &mut self,
        kind: TransferKind,
        file: Option<Box<dyn StorageFile>>,
        path: String,
        connect_deadline: Instant,
    ) {
        self.release();
        self.file = file;
        self.path = path;
        self.connect_deadline = Some(connect_deadline);
        self.stage = self.stage.on(TransferEvent::Start(kind));
    }

    pub fn begin_running(&mut self, now: Instant) {
        self.started = Some(now);
        self.connect_deadline = None;
        self.stage = self.stage.on(TransferEvent::DataReady);
    }

    pub fn has_pending(&self) -> bool {
        self.sent < self.filled
    }

    /// Loads `bytes` as the next outbound chunk.
    pub fn load(&mut self, bytes: &[u8]) {
        self.buffer.clear();
        self.buffer.extend_from_slice(bytes);
        self.filled = bytes.len();
        self.sent = 0;
    }

    pub fn finish(&mut self) {
        self.stage = self.stage.on(TransferEvent::Finished);
        self.drop_handles();
    }

    /// Drops the handles and returns to `Closed` whatever the stage.
    pub fn release(&mut self) {
        self.stage = self.stage.on(TransferEvent::Aborted);
        self.drop_handles();
    }

    fn drop_handles(&mut self) {
        self.file = None;
        self.cursor = None;
        self.filled = 0;
        self.sent = 0;
        self.bytes = 0;
        self.matches = 0;
        self.started = None;
        self.connect_deadline = None;
    }
}
