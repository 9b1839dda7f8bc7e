use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use transfer_content_core::{
    ContentStore, ContextScope, DimensionPlan, DimensionSpec, Mode, NodeHandle, NodeIdentifier,
    NodeTypeName, NodeTypeRegistry, ReferenceCode, Site, SiteDirectory, SiteId, StoreError,
    TransferConfig, TransferRequest,
};
use transfer_content_ops::{
    Catalog, ContentTransfer, Severity, TransferEvent, TransferState, UserMessage,
};

const DOCUMENT: &str = "Neos.Neos:Document";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Move { variant: String, node: String },
    Copy { variant: String, node: String },
}

/// Store double keyed by (site, variant key, identifier); the default
/// variant has the empty key.
#[derive(Default)]
struct RecordingStore {
    sites: Vec<&'static str>,
    nodes: HashMap<(String, String, String), String>,
    non_documents: HashSet<String>,
    disallowed: HashSet<(String, String)>,
    failures: HashMap<String, String>,
    resolved_variants: RefCell<Vec<String>>,
    calls: Vec<Call>,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            sites: vec!["source", "target"],
            ..Default::default()
        }
    }

    fn with_node(mut self, site: &str, variant: &str, id: &str, node_type: &str) -> Self {
        self.nodes.insert(
            (site.to_string(), variant.to_string(), id.to_string()),
            node_type.to_string(),
        );
        self
    }

    /// Source `page` and target parent `parent` in the default variant.
    fn with_default_pair(self) -> Self {
        self.with_node("source", "", "page", "Acme:Page")
            .with_node("target", "", "parent", "Acme:Page")
    }

    /// Source and target parent in a planned variant.
    fn with_variant(self, variant: &str) -> Self {
        self.with_node("source", variant, "page", "Acme:Page")
            .with_node("target", variant, "parent", "Acme:Page")
    }

    fn failing(mut self, variant: &str, code: &str) -> Self {
        self.failures.insert(variant.to_string(), code.to_string());
        self
    }

    fn fail_for(&self, context: &ContextScope) -> Result<(), StoreError> {
        match self.failures.get(context.variant_key().as_str()) {
            Some(code) => Err(StoreError::Other {
                message: "store refused".into(),
                reference_code: ReferenceCode::new(code.clone()),
            }),
            None => Ok(()),
        }
    }
}

impl SiteDirectory for RecordingStore {
    fn find_site(&self, id: &SiteId) -> Option<Site> {
        self.sites
            .iter()
            .find(|site| **site == id.as_str())
            .map(|site| Site::new(*site, *site))
    }

    fn online_sites(&self) -> Vec<Site> {
        self.sites.iter().map(|site| Site::new(*site, *site)).collect()
    }
}

impl ContentStore for RecordingStore {
    fn node_by_identifier(
        &self,
        context: &ContextScope,
        identifier: &NodeIdentifier,
    ) -> Option<NodeHandle> {
        let variant = context.variant_key().0;
        self.resolved_variants.borrow_mut().push(variant.clone());
        let key = (
            context.site.to_string(),
            variant,
            identifier.to_string(),
        );
        self.nodes.get(&key).map(|node_type| {
            NodeHandle::new(
                identifier.clone(),
                NodeTypeName::new(node_type.as_str()),
                format!("/sites/{}/{}", context.site, identifier),
                context.clone(),
            )
        })
    }

    fn move_into(&mut self, node: &NodeHandle, target_parent: &NodeHandle) -> Result<(), StoreError> {
        assert_eq!(
            node.context.variant_key(),
            target_parent.context.variant_key(),
            "handles from different variants"
        );
        self.calls.push(Call::Move {
            variant: node.context.variant_key().0,
            node: node.identifier.to_string(),
        });
        self.fail_for(&node.context)
    }

    fn copy_into(
        &mut self,
        node: &NodeHandle,
        target_parent: &NodeHandle,
    ) -> Result<NodeHandle, StoreError> {
        self.calls.push(Call::Copy {
            variant: node.context.variant_key().0,
            node: node.identifier.to_string(),
        });
        self.fail_for(&node.context)?;
        Ok(NodeHandle::new(
            NodeIdentifier::new("copy-1"),
            node.node_type.clone(),
            format!("{}/{}", target_parent.path, node.name()),
            target_parent.context.clone(),
        ))
    }
}

impl NodeTypeRegistry for RecordingStore {
    fn is_of_type(&self, node_type: &NodeTypeName, super_type: &str) -> bool {
        super_type == DOCUMENT && !self.non_documents.contains(node_type.as_str())
    }

    fn is_allowed_as_child(&self, parent_type: &NodeTypeName, child_type: &NodeTypeName) -> bool {
        !self
            .disallowed
            .contains(&(parent_type.to_string(), child_type.to_string()))
    }
}

fn plan(variants: &[&str]) -> TransferConfig {
    TransferConfig::new(DimensionPlan::new(
        variants
            .iter()
            .map(|variant| DimensionSpec::single([("language", *variant)]))
            .collect(),
    ))
}

fn run(
    store: RecordingStore,
    config: TransferConfig,
    request: TransferRequest,
) -> (Vec<UserMessage>, RecordingStore, TransferState) {
    let mut service = ContentTransfer::new(store, config);
    let outcome = service.transfer(&request);
    let messages = outcome.to_messages(&Catalog::english());
    (messages, service.into_repository(), outcome.state())
}

fn move_request() -> TransferRequest {
    TransferRequest::move_to("source", "target", "page", "parent")
}

fn copy_request() -> TransferRequest {
    TransferRequest::copy("source", "target", "page", "parent")
}

fn ids(messages: &[UserMessage]) -> Vec<(Severity, &str)> {
    messages.iter().map(|m| (m.severity, m.id.as_str())).collect()
}

#[test]
fn test_missing_source_is_single_error_without_operations() {
    let store = RecordingStore::new().with_node("target", "", "parent", "Acme:Page");
    let (messages, store, state) = run(store, plan(&["de"]), move_request());

    assert_eq!(ids(&messages), vec![(Severity::Error, "error.sourceNodeNotFound")]);
    assert!(store.calls.is_empty());
    assert_eq!(state, TransferState::Rejected);
}

#[test]
fn test_source_checked_before_target_parent() {
    let (messages, _, _) = run(RecordingStore::new(), plan(&[]), copy_request());
    assert_eq!(ids(&messages), vec![(Severity::Error, "error.sourceNodeNotFound")]);
}

#[test]
fn test_missing_target_parent() {
    let store = RecordingStore::new().with_node("source", "", "page", "Acme:Page");
    let (messages, store, _) = run(store, plan(&[]), copy_request());

    assert_eq!(
        ids(&messages),
        vec![(Severity::Error, "error.targetParentNodeNotFound")]
    );
    assert!(store.calls.is_empty());
}

#[test]
fn test_invalid_source_type_names_the_type() {
    let mut store = RecordingStore::new()
        .with_node("source", "", "page", "Acme:Text")
        .with_node("target", "", "parent", "Acme:Page");
    store.non_documents.insert("Acme:Text".into());

    let (messages, store, _) = run(store, plan(&[]), copy_request());
    assert_eq!(ids(&messages), vec![(Severity::Error, "error.invalidSourceNode")]);
    assert_eq!(messages[0].arguments, vec!["Acme:Text".to_string()]);
    assert!(messages[0].text.contains("Acme:Text"));
    assert!(store.calls.is_empty());
}

#[test]
fn test_invalid_target_type() {
    let mut store = RecordingStore::new()
        .with_node("source", "", "page", "Acme:Page")
        .with_node("target", "", "parent", "Acme:Column");
    store.non_documents.insert("Acme:Column".into());

    let (messages, _, _) = run(store, plan(&[]), move_request());
    assert_eq!(
        ids(&messages),
        vec![(Severity::Error, "error.invalidTargetParentNode")]
    );
    assert_eq!(messages[0].arguments, vec!["Acme:Column".to_string()]);
}

#[test]
fn test_disallowed_child_is_single_error_without_operations() {
    let mut store = RecordingStore::new()
        .with_node("source", "", "page", "Acme:Page")
        .with_node("target", "", "parent", "Acme:Shortcut");
    store
        .disallowed
        .insert(("Acme:Shortcut".into(), "Acme:Page".into()));

    let (messages, store, _) = run(store, plan(&["de", "fr"]), move_request());
    assert_eq!(
        ids(&messages),
        vec![(Severity::Error, "error.sourceNodeNotAllowedAsChildNode")]
    );
    assert!(store.calls.is_empty());
}

#[test]
fn test_empty_argument_and_unknown_site() {
    let request = TransferRequest::move_to("source", "target", " ", "parent");
    let (messages, _, _) = run(RecordingStore::new().with_default_pair(), plan(&[]), request);
    assert_eq!(ids(&messages), vec![(Severity::Error, "error.emptyArgument")]);

    let request = TransferRequest::move_to("source", "elsewhere", "page", "parent");
    let (messages, _, _) = run(RecordingStore::new().with_default_pair(), plan(&[]), request);
    assert_eq!(ids(&messages), vec![(Severity::Error, "error.siteNotFound")]);
    assert_eq!(messages[0].arguments, vec!["elsewhere".to_string()]);
}

#[test]
fn test_copy_ignores_dimension_plan() {
    let store = RecordingStore::new()
        .with_default_pair()
        .with_variant("de")
        .with_variant("fr");
    let (messages, store, state) = run(store, plan(&["de", "fr"]), copy_request());

    assert_eq!(ids(&messages), vec![(Severity::Success, "message.copied")]);
    assert_eq!(
        store.calls,
        vec![Call::Copy {
            variant: String::new(),
            node: "page".into()
        }]
    );
    assert!(store.resolved_variants.borrow().iter().all(|v| v.is_empty()));
    assert_eq!(state, TransferState::Done);
}

#[test]
fn test_copy_failure_reports_reference_code() {
    let store = RecordingStore::new().with_default_pair().failing("", "R0");
    let (messages, _, state) = run(store, plan(&["de"]), copy_request());

    assert_eq!(ids(&messages), vec![(Severity::Error, "error.copyFailed")]);
    assert_eq!(messages[0].arguments, vec!["R0".to_string()]);
    assert_eq!(state, TransferState::Failed);
}

#[test]
fn test_move_with_empty_plan_is_single_success() {
    let store = RecordingStore::new().with_default_pair();
    let (messages, store, state) = run(store, plan(&[]), move_request());

    assert_eq!(ids(&messages), vec![(Severity::Success, "message.moved")]);
    assert_eq!(store.calls.len(), 1);
    assert_eq!(state, TransferState::Done);
}

#[test]
fn test_move_missing_variant_warns_and_succeeds() {
    // "de" resolves both nodes, "fr" resolves neither
    let store = RecordingStore::new().with_default_pair().with_variant("de");
    let (messages, store, state) = run(store, plan(&["de", "fr"]), move_request());

    assert_eq!(
        ids(&messages),
        vec![
            (Severity::Warning, "warning.sourceNodeDimensionNull"),
            (Severity::Success, "message.moved"),
        ]
    );
    assert_eq!(messages[0].arguments, vec!["fr".to_string()]);
    assert_eq!(
        store.calls,
        vec![
            Call::Move {
                variant: String::new(),
                node: "page".into()
            },
            Call::Move {
                variant: "de".into(),
                node: "page".into()
            },
        ]
    );
    assert_eq!(state, TransferState::Done);
}

#[test]
fn test_only_target_missing_in_variant_is_warning() {
    let store = RecordingStore::new()
        .with_default_pair()
        .with_node("source", "de", "page", "Acme:Page");
    let (messages, store, _) = run(store, plan(&["de"]), move_request());

    assert_eq!(
        ids(&messages),
        vec![
            (Severity::Warning, "warning.sourceNodeDimensionNull"),
            (Severity::Success, "message.moved"),
        ]
    );
    assert_eq!(store.calls.len(), 1);
}

#[test]
fn test_default_move_failure_skips_replay() {
    let store = RecordingStore::new()
        .with_default_pair()
        .with_variant("de")
        .failing("", "R1");
    let (messages, store, state) = run(store, plan(&["de"]), move_request());

    assert_eq!(ids(&messages), vec![(Severity::Error, "error.copyFailed")]);
    assert_eq!(messages[0].arguments, vec!["R1".to_string()]);
    assert_eq!(store.calls.len(), 1);
    assert!(store.resolved_variants.borrow().iter().all(|v| v.is_empty()));
    assert_eq!(state, TransferState::Failed);
}

#[test]
fn test_variant_failure_is_isolated() {
    let store = RecordingStore::new()
        .with_default_pair()
        .with_variant("ch")
        .with_variant("de")
        .failing("ch", "R2");
    let (messages, store, state) = run(store, plan(&["ch", "de"]), move_request());

    assert_eq!(
        ids(&messages),
        vec![
            (Severity::Error, "error.dimensionMoveFailed"),
            (Severity::Success, "message.moved"),
        ]
    );
    assert_eq!(messages[0].arguments, vec!["ch".to_string(), "R2".to_string()]);
    assert!(store.calls.contains(&Call::Move {
        variant: "de".into(),
        node: "page".into()
    }));
    assert_eq!(store.calls.len(), 3);
    assert_eq!(state, TransferState::Done);
}

#[test]
fn test_replay_messages_follow_plan_order() {
    let store = RecordingStore::new().with_default_pair().with_variant("it");
    let (messages, _, _) = run(store, plan(&["fr", "it", "de", "es"]), move_request());

    let variants: Vec<_> = messages
        .iter()
        .filter(|m| m.severity == Severity::Warning)
        .map(|m| m.arguments[0].as_str())
        .collect();
    assert_eq!(variants, vec!["fr", "de", "es"]);
    assert_eq!(messages.last().map(|m| m.id.as_str()), Some("message.moved"));
}

#[test]
fn test_outcome_events_include_silent_moves() {
    let store = RecordingStore::new()
        .with_default_pair()
        .with_variant("de");
    let mut service = ContentTransfer::new(store, plan(&["de"]));
    let outcome = service.transfer(&move_request());

    assert_eq!(outcome.mode(), Mode::Move);
    assert_eq!(outcome.dimensions_moved(), 1);
    assert!(matches!(
        outcome.events(),
        [TransferEvent::DimensionMoved { .. }, TransferEvent::Moved]
    ));
    assert_eq!(outcome.to_messages(&Catalog::english()).len(), 1);
}

#[test]
fn test_online_sites_pass_through() {
    let service = ContentTransfer::new(RecordingStore::new(), plan(&[]));
    let names: Vec<_> = service
        .online_sites()
        .into_iter()
        .map(|site| site.id.to_string())
        .collect();
    assert_eq!(names, vec!["source", "target"]);
}
