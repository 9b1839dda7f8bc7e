//! Dimension plan expansion.

use transfer_content_core::{DimensionPlan, DimensionSpec};

/// Hands out the configured dimension plan to the executor.
///
/// Entries come back verbatim and in configured order; an empty plan means
/// the default variant only.
#[derive(Debug, Clone, Copy)]
pub struct DimensionPlanner<'a> {
    plan: &'a DimensionPlan,
}

impl<'a> DimensionPlanner<'a> {
    /// Create a planner over a loaded plan.
    pub fn new(plan: &'a DimensionPlan) -> Self {
        Self { plan }
    }

    /// Entries to replay, in order.
    pub fn plan(&self) -> &'a [DimensionSpec] {
        self.plan.specs()
    }

    /// Check whether only the default variant is involved.
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }
}
