//! In-memory content repository for transfer-content.
//!
//! Loads a JSON snapshot of sites, node types and node variants, implements
//! every collaborator trait the transfer engine needs, and writes the
//! mutated snapshot back.

mod naming;
mod registry;
mod repository;
mod snapshot;

pub use naming::unique_child_name;
pub use registry::TypeRegistry;
pub use repository::MemoryRepository;
pub use snapshot::{NodeRecord, NodeTypeDefinition, SiteRecord, Snapshot, SnapshotError};

/// Path under which every site root lives.
pub const SITES_ROOT: &str = "/sites";
