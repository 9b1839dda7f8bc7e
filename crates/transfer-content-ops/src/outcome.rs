//! Events recorded while a transfer runs.

use serde::{Deserialize, Serialize};
use strum::Display;
use transfer_content_core::{Mode, NodeIdentifier, StoreError, ValidationError, VariantKey};

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Severity {
    Error,
    Warning,
    Success,
}

/// Lifecycle of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransferState {
    Init,
    Validating,
    /// Validation failed; nothing was mutated.
    Rejected,
    DefaultTransfer,
    /// The default-variant operation failed.
    Failed,
    ReplayingDimensions,
    Done,
}

impl TransferState {
    /// Check whether no further transitions can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Failed | Self::Done)
    }
}

/// Something that happened during a transfer, in recording order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// The request failed validation.
    Rejected(ValidationError),
    /// The default-variant copy succeeded.
    Copied { copy: NodeIdentifier },
    /// The move finished (default variant plus every attempted variant).
    Moved,
    /// The default-variant copy or move failed.
    TransferFailed { mode: Mode, error: StoreError },
    /// A planned variant was moved.
    DimensionMoved { variant: VariantKey },
    /// A planned variant's move failed; remaining variants still ran.
    DimensionFailed { variant: VariantKey, error: StoreError },
    /// Source or target parent does not exist in a planned variant.
    DimensionMissing { variant: VariantKey },
}

impl TransferEvent {
    /// Severity of the message this event produces, if any.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Rejected(_) | Self::TransferFailed { .. } | Self::DimensionFailed { .. } => {
                Some(Severity::Error)
            }
            Self::DimensionMissing { .. } => Some(Severity::Warning),
            Self::Copied { .. } | Self::Moved => Some(Severity::Success),
            Self::DimensionMoved { .. } => None,
        }
    }
}

/// Everything recorded for one request.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    mode: Mode,
    state: TransferState,
    events: Vec<TransferEvent>,
}

impl TransferOutcome {
    /// Create an empty outcome for a request.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            state: TransferState::Init,
            events: Vec::new(),
        }
    }

    /// Outcome of a request rejected by validation.
    pub fn rejected(mode: Mode, error: ValidationError) -> Self {
        let mut outcome = Self::new(mode);
        outcome.transition(TransferState::Validating);
        outcome.record(TransferEvent::Rejected(error));
        outcome.transition(TransferState::Rejected);
        outcome
    }

    /// Requested mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Advance the lifecycle.
    pub(crate) fn transition(&mut self, state: TransferState) {
        tracing::trace!(from = %self.state, to = %state, "transfer state");
        self.state = state;
    }

    /// Append an event.
    pub(crate) fn record(&mut self, event: TransferEvent) {
        self.events.push(event);
    }

    /// Recorded events in order.
    pub fn events(&self) -> &[TransferEvent] {
        &self.events
    }

    /// Check whether the request ended in success (warnings allowed).
    pub fn is_success(&self) -> bool {
        self.state == TransferState::Done
    }

    /// Check whether any error was recorded.
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Number of events with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.events
            .iter()
            .filter(|event| event.severity() == Some(severity))
            .count()
    }

    /// Number of planned variants that were moved.
    pub fn dimensions_moved(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TransferEvent::DimensionMoved { .. }))
            .count()
    }

    /// Get a human-readable summary of the request.
    pub fn summary(&self) -> String {
        match self.state {
            TransferState::Rejected => "Transfer rejected".to_string(),
            TransferState::Failed => format!("{} failed", self.mode),
            TransferState::Done if self.mode == Mode::Copy => "Copied 1 subtree".to_string(),
            TransferState::Done => {
                let failed = self
                    .events
                    .iter()
                    .filter(|event| matches!(event, TransferEvent::DimensionFailed { .. }))
                    .count();
                let missing = self.count(Severity::Warning);
                format!(
                    "Moved 1 subtree, {} variants replayed, {} missing, {} failed",
                    self.dimensions_moved(),
                    missing,
                    failed
                )
            }
            state => format!("Transfer interrupted in state {state}"),
        }
    }
}
