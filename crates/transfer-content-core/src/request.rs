//! Transfer modes and requests.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::node::{NodeIdentifier, SiteId};
use crate::repository::Translator;

/// How the source subtree reaches the target parent.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Duplicate the subtree in the default variant only.
    #[default]
    Copy,
    /// Relocate the subtree, replaying the move for every planned variant.
    Move,
}

impl Mode {
    /// Message id of this mode's label.
    pub fn label_id(&self) -> &'static str {
        match self {
            Self::Copy => "mode.copy",
            Self::Move => "mode.move",
        }
    }

    /// Selectable modes with translated labels, in display order.
    pub fn choices(translator: &dyn Translator) -> Vec<ModeChoice> {
        Self::iter()
            .map(|mode| ModeChoice {
                mode,
                label: translator.translate(mode.label_id(), &[]),
            })
            .collect()
    }
}

/// A selectable mode and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChoice {
    pub mode: Mode,
    pub label: String,
}

/// A single transfer invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Site the source node lives in.
    pub source_site: SiteId,
    /// Site the target parent lives in.
    pub target_site: SiteId,
    /// Identifier of the subtree root to transfer.
    pub source_node: NodeIdentifier,
    /// Identifier of the node receiving the subtree.
    pub target_parent: NodeIdentifier,
    /// Copy or move.
    pub mode: Mode,
}

impl TransferRequest {
    /// Create a new request.
    pub fn new(
        source_site: impl Into<SiteId>,
        target_site: impl Into<SiteId>,
        source_node: impl Into<NodeIdentifier>,
        target_parent: impl Into<NodeIdentifier>,
        mode: Mode,
    ) -> Self {
        Self {
            source_site: source_site.into(),
            target_site: target_site.into(),
            source_node: source_node.into(),
            target_parent: target_parent.into(),
            mode,
        }
    }

    /// Create a copy request.
    pub fn copy(
        source_site: impl Into<SiteId>,
        target_site: impl Into<SiteId>,
        source_node: impl Into<NodeIdentifier>,
        target_parent: impl Into<NodeIdentifier>,
    ) -> Self {
        Self::new(source_site, target_site, source_node, target_parent, Mode::Copy)
    }

    /// Create a move request.
    pub fn move_to(
        source_site: impl Into<SiteId>,
        target_site: impl Into<SiteId>,
        source_node: impl Into<NodeIdentifier>,
        target_parent: impl Into<NodeIdentifier>,
    ) -> Self {
        Self::new(source_site, target_site, source_node, target_parent, Mode::Move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Translator for Echo {
        fn translate(&self, id: &str, _arguments: &[String]) -> String {
            id.to_uppercase()
        }
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("move".parse::<Mode>().unwrap(), Mode::Move);
        assert_eq!("COPY".parse::<Mode>().unwrap(), Mode::Copy);
        assert!("rename".parse::<Mode>().is_err());
        assert_eq!(Mode::Move.to_string(), "move");
        assert_eq!(Mode::default(), Mode::Copy);
    }

    #[test]
    fn test_mode_choices_order() {
        let choices = Mode::choices(&Echo);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].mode, Mode::Copy);
        assert_eq!(choices[0].label, "MODE.COPY");
        assert_eq!(choices[1].mode, Mode::Move);
    }

    #[test]
    fn test_request_constructors() {
        let request = TransferRequest::move_to("a", "b", "n1", "p1");
        assert_eq!(request.mode, Mode::Move);
        assert_eq!(request.source_site.as_str(), "a");
        assert_eq!(request.target_parent.as_str(), "p1");
    }
}
