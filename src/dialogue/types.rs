//! Wire types for the remote dialogue service

use crate::transcript::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk classification returned by the service, ordered by escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Crisis,
}

impl Severity {
    /// Suggestions are shown from `Moderate` upwards
    pub fn discloses_suggestions(self) -> bool {
        self >= Severity::Moderate
    }

    /// Crisis resources are shown from `High` upwards
    pub fn discloses_resources(self) -> bool {
        self >= Severity::High
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::High => "HIGH",
            Severity::Crisis => "CRISIS",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A support contact attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub contact: String,
    /// Availability note, e.g. "24/7"
    pub available: String,
}

impl Resource {
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        available: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            available: available.into(),
        }
    }
}

/// Service reply before rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    pub response: String,
    #[serde(rename = "detected_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl StructuredReply {
    pub fn new(response: impl Into<String>, severity: Severity) -> Self {
        Self {
            response: response.into(),
            severity,
            resources: vec![],
            suggestions: vec![],
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }
}

/// Body of `POST /chat`
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub text: &'a str,
    pub conversation_history: &'a [HistoryEntry],
}
