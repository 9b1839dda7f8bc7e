//! Transfer engine for transfer-content.
//!
//! This crate validates a source/target node pair, performs the
//! default-variant copy or move, replays moves across the configured
//! dimension plan, and turns the recorded events into translated
//! user-facing messages.

mod executor;
mod messages;
mod outcome;
mod planner;
mod service;
mod validator;

pub use executor::Executor;
pub use messages::{Catalog, UserMessage, message_for, to_messages};
pub use outcome::{Severity, TransferEvent, TransferOutcome, TransferState};
pub use planner::DimensionPlanner;
pub use service::ContentTransfer;
pub use validator::{ResolvedPair, Validator};
