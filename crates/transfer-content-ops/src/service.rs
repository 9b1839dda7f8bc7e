//! The `transfer` entry point.

use tracing::{info, warn};
use transfer_content_core::{ContentRepository, Site, TransferConfig, TransferRequest};

use crate::executor::Executor;
use crate::outcome::TransferOutcome;
use crate::planner::DimensionPlanner;
use crate::validator::Validator;

/// Transfers content subtrees within a content repository.
///
/// Owns the repository handle and the configuration it was started with;
/// no state survives between requests.
#[derive(Debug)]
pub struct ContentTransfer<R> {
    repository: R,
    config: TransferConfig,
}

impl<R: ContentRepository> ContentTransfer<R> {
    /// Create a service over `repository`.
    pub fn new(repository: R, config: TransferConfig) -> Self {
        Self { repository, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Consume the service, returning the repository.
    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Sites that can be chosen as source or target.
    pub fn online_sites(&self) -> Vec<Site> {
        self.repository.online_sites()
    }

    /// Copy or move `request.source_node` into `request.target_parent`.
    pub fn transfer(&mut self, request: &TransferRequest) -> TransferOutcome {
        let validator = Validator::new(&self.repository, &self.config.document_type);
        let pair = match validator.validate_request(request) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(mode = %request.mode, "transfer rejected: {e}");
                return TransferOutcome::rejected(request.mode, e);
            }
        };

        let planner = DimensionPlanner::new(&self.config.dimensions);
        let outcome = Executor::new(&mut self.repository, planner).execute(request, pair);
        info!(state = %outcome.state(), "{}", outcome.summary());
        outcome
    }
}
