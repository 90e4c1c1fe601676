//! Profiles: multisets of individual judgments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::judgment::Judgment;

/// A judgment together with the number of voters holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Multiplicity.
    pub count: usize,
    /// The shared judgment.
    pub judgment: Judgment,
}

impl ProfileEntry {
    /// Creates an entry.
    pub fn new(count: usize, judgment: Judgment) -> Self {
        Self { count, judgment }
    }
}

/// A multiset of judgments across an electorate.
///
/// Profiles are plain values. Whoever constructs one validates it against
/// a scenario with [`Scenario::validate_profile`](crate::Scenario::validate_profile);
/// solvers and statistics take `&Profile` explicitly and never store it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    entries: Vec<ProfileEntry>,
}

impl Profile {
    /// Creates a profile from entries. Zero-count entries are dropped.
    pub fn new(entries: Vec<ProfileEntry>) -> Self {
        Self {
            entries: entries.into_iter().filter(|e| e.count > 0).collect(),
        }
    }

    /// Builds a profile by tallying per-judgment counts.
    ///
    /// `counts[i]` voters hold `universe[i]`; zero counts are skipped.
    pub fn from_tally(counts: &[usize], universe: &[Judgment]) -> Self {
        let entries = counts
            .iter()
            .zip(universe)
            .filter(|&(&count, _)| count > 0)
            .map(|(&count, judgment)| ProfileEntry::new(count, judgment.clone()))
            .collect();
        Self { entries }
    }

    /// Returns the entries.
    pub fn entries(&self) -> &[ProfileEntry] {
        &self.entries
    }

    /// Returns the total number of voters.
    pub fn number_voters(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Returns true if no voter is present.
    pub fn is_empty(&self) -> bool {
        self.number_voters() == 0
    }

    /// Iterates over every voter's judgment, repeating by multiplicity.
    pub fn voters(&self) -> impl Iterator<Item = &Judgment> + '_ {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat(&e.judgment).take(e.count))
    }
}

impl fmt::Display for Profile {
    /// Multiset notation, e.g. `{11×2, 00×1}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}×{}", entry.judgment, entry.count)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn j(sig: &str) -> Judgment {
        Judgment::from_signature(sig).unwrap()
    }

    #[test]
    fn test_tally_skips_zero_counts() {
        let universe = vec![j("00"), j("01"), j("10")];
        let profile = Profile::from_tally(&[2, 0, 1], &universe);
        assert_eq!(profile.entries().len(), 2);
        assert_eq!(profile.number_voters(), 3);
        assert_eq!(profile.to_string(), "{00×2, 10×1}");
    }

    #[test]
    fn test_voters_repeat_by_multiplicity() {
        let profile = Profile::new(vec![ProfileEntry::new(2, j("1")), ProfileEntry::new(1, j("0"))]);
        let sigs: Vec<String> = profile.voters().map(Judgment::signature).collect();
        assert_eq!(sigs, vec!["1", "1", "0"]);
    }

    #[test]
    fn test_empty_profile() {
        let profile = Profile::new(vec![ProfileEntry::new(0, j("1"))]);
        assert!(profile.is_empty());
        assert!(profile.entries().is_empty());
    }
}
