//! # Scenario Fingerprints
//!
//! A fingerprint is the SHA-256 of a canonical text rendering of the agenda
//! and both consistency sets. Two scenarios with the same fingerprint have
//! identical judgment indices, so reports produced from them can be compared
//! entry by entry.
//!
//! ## Canonical Form
//!
//! ```text
//! agenda:<label>=<formula>;<label>=<formula>;...
//! in:<signature>,<signature>,...
//! out:<signature>,<signature>,...
//! ```
//!
//! Formulas render through their `Display` impl and signatures are already
//! sorted, so the rendering is deterministic. The electorate size is not part
//! of the fingerprint.

use sha2::{Digest, Sha256};

use crate::agenda::Agenda;
use crate::judgment::Judgment;
use crate::scenario::ConsistencySets;

/// Raw 32-byte digest.
pub type Digest32 = [u8; 32];

/// Renders the canonical text hashed by [`fingerprint_scenario`].
pub fn canonical_text(agenda: &Agenda, sets: &ConsistencySets) -> String {
    let issues: Vec<String> = agenda
        .issues()
        .iter()
        .map(|issue| format!("{}={}", issue.label, issue.formula))
        .collect();
    format!(
        "agenda:{}\nin:{}\nout:{}\n",
        issues.join(";"),
        join_signatures(sets.in_consistent()),
        join_signatures(sets.out_consistent())
    )
}

fn join_signatures(judgments: &[Judgment]) -> String {
    judgments
        .iter()
        .map(Judgment::signature)
        .collect::<Vec<_>>()
        .join(",")
}

/// SHA-256 of arbitrary text.
pub fn digest(text: &str) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().into()
}

/// Lowercase hex encoding.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Hex fingerprint of an agenda and its consistency sets.
pub fn fingerprint_scenario(agenda: &Agenda, sets: &ConsistencySets) -> String {
    to_hex(&digest(&canonical_text(agenda, sets)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::Issue;
    use crate::formula::Formula;

    fn j(sig: &str) -> Judgment {
        Judgment::from_signature(sig).unwrap()
    }

    fn agenda() -> Agenda {
        Agenda::new(vec![
            Issue::new(1, Formula::var("p")),
            Issue::new(2, Formula::var("q")),
        ])
    }

    #[test]
    fn test_canonical_text_layout() {
        let sets = ConsistencySets::new(vec![j("11"), j("00")], vec![j("00")]);
        assert_eq!(
            canonical_text(&agenda(), &sets),
            "agenda:1=p;2=q\nin:00,11\nout:00\n"
        );
    }

    #[test]
    fn test_fingerprint_is_order_insensitive_for_sets() {
        let a = ConsistencySets::new(vec![j("01"), j("10")], vec![j("01")]);
        let b = ConsistencySets::new(vec![j("10"), j("01")], vec![j("01")]);
        assert_eq!(fingerprint_scenario(&agenda(), &a), fingerprint_scenario(&agenda(), &b));
    }

    #[test]
    fn test_fingerprint_changes_with_sets() {
        let a = ConsistencySets::new(vec![j("01"), j("10")], vec![j("01")]);
        let b = ConsistencySets::new(vec![j("01"), j("10")], vec![j("10")]);
        assert_ne!(fingerprint_scenario(&agenda(), &a), fingerprint_scenario(&agenda(), &b));
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(to_hex(&[0x00, 0xab, 0x0f]), "00ab0f");
        assert_eq!(to_hex(&digest("")).len(), 64);
    }
}
