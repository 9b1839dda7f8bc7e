//! Translating recorded events into user-facing messages.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use transfer_content_core::{ConfigError, Mode, Translator, ValidationError};

use crate::outcome::{Severity, TransferEvent, TransferOutcome};

/// Built-in English messages.
const ENGLISH: &[(&str, &str)] = &[
    ("mode.copy", "Copy"),
    ("mode.move", "Move"),
    ("message.copied", "The node has been copied."),
    ("message.moved", "The node has been moved."),
    ("error.emptyArgument", "The argument \"{0}\" must not be empty."),
    ("error.siteNotFound", "The site \"{0}\" could not be found."),
    ("error.sourceNodeNotFound", "The source node could not be found."),
    (
        "error.targetParentNodeNotFound",
        "The target parent node could not be found.",
    ),
    (
        "error.invalidSourceNode",
        "The source node of type \"{0}\" is not a document.",
    ),
    (
        "error.invalidTargetParentNode",
        "The target parent node of type \"{0}\" is not a document.",
    ),
    (
        "error.sourceNodeNotAllowedAsChildNode",
        "The source node is not allowed as a child of the target parent node.",
    ),
    (
        "error.copyFailed",
        "The transfer failed. Reference code: {0}",
    ),
    (
        "error.dimensionMoveFailed",
        "Moving the variant \"{0}\" failed. Reference code: {1}",
    ),
    (
        "warning.sourceNodeDimensionNull",
        "The source or target parent node does not exist in the variant \"{0}\" and was skipped.",
    ),
];

/// Message catalog with positional `{0}`, `{1}` placeholders.
///
/// Unknown ids translate to the id itself.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<String, String>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English catalog.
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect(),
        }
    }

    /// Add or replace a message.
    pub fn insert(&mut self, id: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(id.into(), template.into());
    }

    /// Look up a raw template.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of this catalog.
    pub fn merge(mut self, other: Catalog) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Parse a TOML catalog. Nested tables are flattened with `.`, so
    /// `[error] copyFailed = "..."` defines `error.copyFailed`.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut catalog = Self::new();
        flatten(&table, "", &mut catalog)?;
        Ok(catalog)
    }

    /// Load a TOML catalog from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml(&source, path)
    }
}

fn flatten(table: &toml::Table, prefix: &str, catalog: &mut Catalog) -> Result<(), ConfigError> {
    for (key, value) in table {
        let id = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(text) => catalog.insert(id, text.clone()),
            toml::Value::Table(nested) => flatten(nested, &id, catalog)?,
            _ => {
                return Err(ConfigError::Invalid {
                    message: format!("message '{id}' must be a string"),
                });
            }
        }
    }
    Ok(())
}

impl Translator for Catalog {
    fn translate(&self, id: &str, arguments: &[String]) -> String {
        let Some(template) = self.get(id) else {
            return id.to_string();
        };

        substitute(template, arguments)
    }
}

/// Replace `{N}` placeholders in one pass; argument text is never rescanned.
fn substitute(template: &str, arguments: &[String]) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let argument = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            arguments.get(index).map(|argument| (argument, close))
        });
        match argument {
            Some((argument, close)) => {
                text.push_str(argument);
                rest = &after[close + 1..];
            }
            None => {
                text.push('{');
                rest = after;
            }
        }
    }
    text.push_str(rest);
    text
}

/// A translated message ready to show to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub severity: Severity,
    pub title: String,
    pub text: String,
    /// Message id the text was translated from.
    pub id: String,
    /// Positional arguments substituted into the text.
    pub arguments: Vec<String>,
}

/// Message id and arguments for an event, if it produces a message.
pub fn message_for(event: &TransferEvent) -> Option<(&'static str, Vec<String>)> {
    let message = match event {
        TransferEvent::Rejected(error) => rejection(error),
        TransferEvent::Copied { .. } => ("message.copied", Vec::new()),
        TransferEvent::Moved => ("message.moved", Vec::new()),
        TransferEvent::TransferFailed { error, .. } => {
            ("error.copyFailed", vec![error.reference_code().to_string()])
        }
        TransferEvent::DimensionFailed { variant, error } => (
            "error.dimensionMoveFailed",
            vec![variant.to_string(), error.reference_code().to_string()],
        ),
        TransferEvent::DimensionMissing { variant } => {
            ("warning.sourceNodeDimensionNull", vec![variant.to_string()])
        }
        TransferEvent::DimensionMoved { .. } => return None,
    };
    Some(message)
}

fn rejection(error: &ValidationError) -> (&'static str, Vec<String>) {
    match error {
        ValidationError::EmptyArgument { argument } => {
            ("error.emptyArgument", vec![argument.to_string()])
        }
        ValidationError::SiteNotFound { site } => ("error.siteNotFound", vec![site.to_string()]),
        ValidationError::SourceNotFound { .. } => ("error.sourceNodeNotFound", Vec::new()),
        ValidationError::TargetParentNotFound { .. } => {
            ("error.targetParentNodeNotFound", Vec::new())
        }
        ValidationError::InvalidSourceType { node_type } => {
            ("error.invalidSourceNode", vec![node_type.to_string()])
        }
        ValidationError::InvalidTargetType { node_type } => {
            ("error.invalidTargetParentNode", vec![node_type.to_string()])
        }
        ValidationError::DisallowedChild { .. } => {
            ("error.sourceNodeNotAllowedAsChildNode", Vec::new())
        }
    }
}

/// Translate an outcome into messages, preserving recording order.
pub fn to_messages(outcome: &TransferOutcome, translator: &dyn Translator) -> Vec<UserMessage> {
    outcome
        .events()
        .iter()
        .filter_map(|event| {
            let severity = event.severity()?;
            let (id, arguments) = message_for(event)?;
            Some(UserMessage {
                severity,
                title: severity.to_string(),
                text: translator.translate(id, &arguments),
                id: id.to_string(),
                arguments,
            })
        })
        .collect()
}

impl TransferOutcome {
    /// Translate this outcome into messages.
    pub fn to_messages(&self, translator: &dyn Translator) -> Vec<UserMessage> {
        to_messages(self, translator)
    }
}

impl Catalog {
    /// Label of a mode.
    pub fn mode_label(&self, mode: Mode) -> String {
        self.translate(mode.label_id(), &[])
    }
}
