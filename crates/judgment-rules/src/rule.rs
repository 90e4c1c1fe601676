//! # Rule Table
//!
//! Aggregation rules form a closed set. Each one maps to a row of the
//! table below; solvers dispatch on the row, never on the rule name.
//!
//! | Rule id | Aggregator | Direction | λ |
//! |---------|------------|-----------|---|
//! | `kemeny` | sum of agreements | maximise | ignored |
//! | `kemnash` | product, 0 → λ | maximise | forced to 0 |
//! | `lamb-kemnash` | product, 0 → λ | maximise | used |
//! | `maxham` | minimum agreement | maximise | ignored |
//! | `maxeq` | max − min agreement | minimise | ignored |
//! | `kemeny-original` | per-issue support tally | maximise | ignored |
//! | `all_rules` | the four base rules in one pass | - | used for Kemeny-Nash |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SolverError};
use crate::lambda::Lambda;

/// Reduction applied to an outcome's agreement vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregator {
    /// Sum of agreements.
    Sum,
    /// Product of agreements, zero entries replaced by λ.
    Product,
    /// Smallest agreement.
    Minimum,
    /// Largest minus smallest agreement.
    Spread,
    /// Sum over issues of the voters siding with the outcome.
    SupportTally,
}

/// Which extreme of the aggregate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Largest aggregate wins.
    Maximise,
    /// Smallest aggregate wins.
    Minimise,
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    /// Reduction over the agreement vector.
    pub aggregator: Aggregator,
    /// Winning extreme.
    pub direction: Direction,
    /// Whether the caller's λ reaches the aggregator.
    pub needs_lambda: bool,
}

/// Judgment aggregation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rule {
    /// Maximise total agreement.
    #[serde(rename = "kemeny")]
    Kemeny,
    /// Maximise the product of agreements with λ = 0.
    #[serde(rename = "kemnash")]
    KemenyNash,
    /// Maximise the product of agreements, zero agreement counted as λ.
    #[serde(rename = "lamb-kemnash")]
    LambdaKemenyNash,
    /// Maximise the minimum agreement.
    #[serde(rename = "maxham")]
    Maxham,
    /// Minimise the spread between best and worst served voter.
    #[serde(rename = "maxeq")]
    Maxeq,
    /// Kemeny via per-issue support counts.
    #[serde(rename = "kemeny-original")]
    KemenyOriginal,
    /// Kemeny, Kemeny-Nash, Maxham and Maxeq together.
    #[serde(rename = "all_rules")]
    AllRules,
}

impl Rule {
    /// Every rule, in table order.
    pub const ALL: [Rule; 7] = [
        Rule::Kemeny,
        Rule::KemenyNash,
        Rule::LambdaKemenyNash,
        Rule::Maxham,
        Rule::Maxeq,
        Rule::KemenyOriginal,
        Rule::AllRules,
    ];

    /// The four rules computed by [`Rule::AllRules`].
    pub const BASE: [Rule; 4] = [Rule::Kemeny, Rule::KemenyNash, Rule::Maxham, Rule::Maxeq];

    /// Textual identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Rule::Kemeny => "kemeny",
            Rule::KemenyNash => "kemnash",
            Rule::LambdaKemenyNash => "lamb-kemnash",
            Rule::Maxham => "maxham",
            Rule::Maxeq => "maxeq",
            Rule::KemenyOriginal => "kemeny-original",
            Rule::AllRules => "all_rules",
        }
    }

    /// Looks up the table row. `None` for the composite rule.
    pub fn spec(&self) -> Option<RuleSpec> {
        let (aggregator, direction, needs_lambda) = match self {
            Rule::Kemeny => (Aggregator::Sum, Direction::Maximise, false),
            Rule::KemenyNash => (Aggregator::Product, Direction::Maximise, false),
            Rule::LambdaKemenyNash => (Aggregator::Product, Direction::Maximise, true),
            Rule::Maxham => (Aggregator::Minimum, Direction::Maximise, false),
            Rule::Maxeq => (Aggregator::Spread, Direction::Minimise, false),
            Rule::KemenyOriginal => (Aggregator::SupportTally, Direction::Maximise, false),
            Rule::AllRules => return None,
        };
        Some(RuleSpec {
            aggregator,
            direction,
            needs_lambda,
        })
    }

    /// Returns true for rules in the Kemeny-Nash family.
    pub fn is_kemeny_nash(&self) -> bool {
        matches!(self, Rule::KemenyNash | Rule::LambdaKemenyNash)
    }

    /// Validates λ and returns the value this rule actually uses.
    ///
    /// `kemnash` always runs with λ = 0; a positive λ is overridden with a
    /// warning. [`Rule::AllRules`] passes λ to its Kemeny-Nash component.
    /// Rules without a product return zero.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidLambda`] if λ is not finite and non-negative.
    pub fn effective_lambda(&self, lambda: f64) -> Result<Lambda> {
        let parsed = Lambda::new(lambda)?;
        match self {
            Rule::LambdaKemenyNash | Rule::AllRules => Ok(parsed),
            Rule::KemenyNash => {
                if lambda > 0.0 {
                    warn!("kemnash runs with lambda = 0; ignoring lambda = {}", lambda);
                }
                Ok(Lambda::zero())
            }
            _ => Ok(Lambda::zero()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Rule {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.id() == s)
            .ok_or_else(|| SolverError::UnknownRule(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for rule in Rule::ALL {
            assert_eq!(rule.id().parse::<Rule>().unwrap(), rule);
        }
    }

    #[test]
    fn test_unknown_rule() {
        let err = "borda".parse::<Rule>().unwrap_err();
        assert!(matches!(err, SolverError::UnknownRule(ref id) if id == "borda"));
    }

    #[test]
    fn test_table_rows() {
        let maxeq = Rule::Maxeq.spec().unwrap();
        assert_eq!(maxeq.aggregator, Aggregator::Spread);
        assert_eq!(maxeq.direction, Direction::Minimise);
        assert!(Rule::LambdaKemenyNash.spec().unwrap().needs_lambda);
        assert!(Rule::AllRules.spec().is_none());
    }

    #[test]
    fn test_kemnash_forces_zero_lambda() {
        assert!(Rule::KemenyNash.effective_lambda(0.5).unwrap().is_zero());
        let lambda = Rule::LambdaKemenyNash.effective_lambda(0.5).unwrap();
        assert_eq!((lambda.numerator(), lambda.denominator()), (1, 2));
    }

    #[test]
    fn test_negative_lambda_rejected_for_every_rule() {
        for rule in Rule::ALL {
            assert!(rule.effective_lambda(-1.0).is_err());
        }
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Rule::LambdaKemenyNash).unwrap();
        assert_eq!(json, "\"lamb-kemnash\"");
        let rule: Rule = serde_json::from_str("\"kemeny-original\"").unwrap();
        assert_eq!(rule, Rule::KemenyOriginal);
    }
}
