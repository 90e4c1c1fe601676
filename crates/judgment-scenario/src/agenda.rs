//! The agenda: labelled issues in a fixed canonical order.

use serde::{Deserialize, Serialize};

use crate::formula::Formula;

/// One agenda item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Integer label, unique within the agenda.
    pub label: u32,
    /// The formula judged under this label.
    pub formula: Formula,
}

impl Issue {
    /// Creates an issue.
    pub fn new(label: u32, formula: Formula) -> Self {
        Self { label, formula }
    }

    /// Name of the auxiliary variable standing for this issue in
    /// consistency queries and optimisation encodings.
    pub fn label_variable(&self) -> String {
        label_variable(self.label)
    }
}

/// Returns the auxiliary variable name for an issue label.
pub fn label_variable(label: u32) -> String {
    format!("l{label}")
}

/// Ordered list of issues. Declaration order is the canonical order used
/// for every judgment signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    issues: Vec<Issue>,
}

impl Agenda {
    /// Creates an agenda from issues in canonical order.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Returns the issues.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns the labels in canonical order.
    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.issues.iter().map(|issue| issue.label)
    }

    /// Returns the canonical position of `label`.
    pub fn position(&self, label: u32) -> Option<usize> {
        self.issues.iter().position(|issue| issue.label == label)
    }

    /// Returns the number of issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if the agenda has no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
