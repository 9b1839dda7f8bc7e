//! Default-variant transfer followed by per-dimension replay.

use tracing::{debug, error, info, warn};
use transfer_content_core::{ContentStore, DimensionSpec, Mode, TransferRequest};

use crate::outcome::{TransferEvent, TransferOutcome, TransferState};
use crate::planner::DimensionPlanner;
use crate::validator::ResolvedPair;

/// Runs a validated transfer against a content store.
pub struct Executor<'a, S: ?Sized> {
    store: &'a mut S,
    planner: DimensionPlanner<'a>,
}

impl<'a, S: ContentStore + ?Sized> Executor<'a, S> {
    /// Create an executor replaying moves according to `planner`.
    pub fn new(store: &'a mut S, planner: DimensionPlanner<'a>) -> Self {
        Self { store, planner }
    }

    /// Execute a validated request.
    ///
    /// Copies never consult the dimension plan. Moves replay the plan only
    /// after the default-variant move succeeded.
    pub fn execute(&mut self, request: &TransferRequest, pair: ResolvedPair) -> TransferOutcome {
        let mut outcome = TransferOutcome::new(request.mode);
        outcome.transition(TransferState::DefaultTransfer);

        info!(
            mode = %request.mode,
            source = %request.source_node,
            target_parent = %request.target_parent,
            "starting transfer"
        );

        match request.mode {
            Mode::Copy => self.run_copy(&pair, &mut outcome),
            Mode::Move => {
                if self.run_default_move(&pair, &mut outcome) {
                    self.run_dimensions(request, &mut outcome);
                }
            }
        }

        outcome
    }

    fn run_copy(&mut self, pair: &ResolvedPair, outcome: &mut TransferOutcome) {
        match self.store.copy_into(&pair.source, &pair.target_parent) {
            Ok(copy) => {
                info!(copy = %copy.identifier, path = %copy.path, "copied subtree");
                outcome.record(TransferEvent::Copied {
                    copy: copy.identifier,
                });
                outcome.transition(TransferState::Done);
            }
            Err(e) => {
                error!(reference_code = %e.reference_code(), "copy failed: {e}");
                outcome.record(TransferEvent::TransferFailed {
                    mode: Mode::Copy,
                    error: e,
                });
                outcome.transition(TransferState::Failed);
            }
        }
    }

    /// Returns whether the default-variant move succeeded.
    fn run_default_move(&mut self, pair: &ResolvedPair, outcome: &mut TransferOutcome) -> bool {
        match self.store.move_into(&pair.source, &pair.target_parent) {
            Ok(()) => {
                info!(source = %pair.source.path, "moved default variant");
                true
            }
            Err(e) => {
                error!(reference_code = %e.reference_code(), "move failed: {e}");
                outcome.record(TransferEvent::TransferFailed {
                    mode: Mode::Move,
                    error: e,
                });
                outcome.transition(TransferState::Failed);
                false
            }
        }
    }

    fn run_dimensions(&mut self, request: &TransferRequest, outcome: &mut TransferOutcome) {
        let specs = self.planner.plan();
        if !specs.is_empty() {
            outcome.transition(TransferState::ReplayingDimensions);
        }

        for spec in specs {
            let event = self.replay(request, spec);
            outcome.record(event);
        }

        outcome.record(TransferEvent::Moved);
        outcome.transition(TransferState::Done);
    }

    /// Move one planned variant; failures stay local to the variant.
    fn replay(&mut self, request: &TransferRequest, spec: &DimensionSpec) -> TransferEvent {
        let variant = spec.variant_key();
        let source_context = spec.scope(request.source_site.clone());
        let target_context = spec.scope(request.target_site.clone());

        let source = self
            .store
            .node_by_identifier(&source_context, &request.source_node);
        let target = self
            .store
            .node_by_identifier(&target_context, &request.target_parent);

        let (Some(source), Some(target)) = (source, target) else {
            warn!(variant = %variant, "node missing in variant, skipped");
            return TransferEvent::DimensionMissing { variant };
        };
        debug_assert!(source.belongs_to(&source_context));
        debug_assert!(target.belongs_to(&target_context));

        match self.store.move_into(&source, &target) {
            Ok(()) => {
                debug!(variant = %variant, path = %source.path, "moved variant");
                TransferEvent::DimensionMoved { variant }
            }
            Err(e) => {
                error!(
                    variant = %variant,
                    reference_code = %e.reference_code(),
                    "variant move failed: {e}"
                );
                TransferEvent::DimensionFailed { variant, error: e }
            }
        }
    }
}
