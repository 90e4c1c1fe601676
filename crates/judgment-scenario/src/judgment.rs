//! Judgments and their canonical binary signatures.
//!
//! A [`Judgment`] assigns a truth value to every agenda issue, in agenda
//! order. Its signature is the string of `0`/`1` digits in that order, and
//! two judgments are equal exactly when their signatures are. The derived
//! ordering matches lexicographic signature order.
//!
//! A [`JudgmentSet`] is the complementary view: the labels a voter accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agenda::Agenda;
use crate::error::{Result, ScenarioError};

/// A complete truth assignment to the agenda, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Judgment {
    values: Vec<bool>,
}

impl Judgment {
    /// Creates a judgment from per-issue values in agenda order.
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// Parses a binary signature such as `"0110"`.
    ///
    /// Returns `None` if the string contains anything but `0` and `1`.
    pub fn from_signature(signature: &str) -> Option<Self> {
        signature
            .chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()
            .map(Self::new)
    }

    /// Returns the per-issue values.
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Returns the number of issues judged.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the judgment covers no issues.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value for the issue at `position`.
    pub fn get(&self, position: usize) -> Option<bool> {
        self.values.get(position).copied()
    }

    /// Returns the canonical binary signature.
    pub fn signature(&self) -> String {
        self.values.iter().map(|&v| if v { '1' } else { '0' }).collect()
    }

    /// Counts the issues on which both judgments agree.
    ///
    /// This is the Hamming similarity `len - hamming_distance`.
    pub fn agreement(&self, other: &Judgment) -> u32 {
        let matching = self
            .values
            .iter()
            .zip(&other.values)
            .filter(|(a, b)| a == b)
            .count();
        u32::try_from(matching).unwrap_or(u32::MAX)
    }

    /// Returns the judgment that flips every issue.
    #[must_use]
    pub fn complement(&self) -> Judgment {
        Judgment::new(self.values.iter().map(|v| !v).collect())
    }

    /// Returns true if `other` disagrees with `self` on every issue.
    pub fn is_antipodal_to(&self, other: &Judgment) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().zip(&other.values).all(|(a, b)| a != b)
    }

    /// Returns the labels accepted by this judgment.
    pub fn to_judgment_set(&self, agenda: &Agenda) -> JudgmentSet {
        let accepted = agenda
            .labels()
            .zip(&self.values)
            .filter(|(_, accepted)| **accepted)
            .map(|(label, _)| label)
            .collect();
        JudgmentSet::new(accepted)
    }
}

impl fmt::Display for Judgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// The labels of the agenda items a voter accepts; all others are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentSet {
    accepted: Vec<u32>,
}

impl JudgmentSet {
    /// Creates a judgment set from accepted labels.
    pub fn new(accepted: Vec<u32>) -> Self {
        Self { accepted }
    }

    /// Returns the accepted labels.
    pub fn accepted(&self) -> &[u32] {
        &self.accepted
    }

    /// Expands to a complete judgment in agenda order.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownIssue`] if a label is not on the agenda.
    pub fn to_judgment(&self, agenda: &Agenda) -> Result<Judgment> {
        if let Some(&label) = self.accepted.iter().find(|l| agenda.position(**l).is_none()) {
            return Err(ScenarioError::UnknownIssue(label));
        }
        let values = agenda
            .labels()
            .map(|label| self.accepted.contains(&label))
            .collect();
        Ok(Judgment::new(values))
    }
}

/// Counts unordered pairs of mutually antipodal judgments.
pub fn antipodal_pairs(judgments: &[Judgment]) -> usize {
    let mut count = 0;
    for (i, first) in judgments.iter().enumerate() {
        for second in &judgments[i + 1..] {
            if first.is_antipodal_to(second) {
                count += 1;
            }
        }
    }
    count
}
