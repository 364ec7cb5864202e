// Data transfers, advanced one step per poll
pub mod engine;
pub mod listing;
pub mod transfer;

pub use transfer::{ListFormat, Transfer, TransferKind, TransferStage};
