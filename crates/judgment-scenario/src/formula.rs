//! # Propositional Formulas
//!
//! Structured expression trees for agenda items and constraints.
//!
//! Formulas are built directly as values (or deserialized from JSON); there
//! is no string evaluation anywhere in the pipeline. The consistency oracle
//! evaluates them under total assignments, and the optimisation encoding
//! consumes their clause form.
//!
//! ## Normal Forms
//!
//! | Form | Connectives | Produced by |
//! |------|-------------|-------------|
//! | NNF  | `Const`, `Var`, `Not(Var)`, `And`, `Or` | [`Formula::to_nnf`] |
//! | CNF  | conjunction of [`Clause`]s | [`Formula::to_cnf`] |
//!
//! CNF conversion distributes disjunctions over conjunctions, so clause
//! counts can grow exponentially. Agendas in this domain are small.
//!
//! ## Example
//!
//! ```rust
//! use judgment_scenario::Formula;
//!
//! // p -> q
//! let rule = Formula::implies(Formula::var("p"), Formula::var("q"));
//! let clauses = rule.to_cnf();
//! assert_eq!(clauses.len(), 1);
//! assert_eq!(rule.to_string(), "(p -> q)");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A propositional formula over named variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// Truth constant.
    Const(bool),
    /// Propositional variable.
    Var(String),
    /// Negation.
    Not(Box<Formula>),
    /// Conjunction; the empty conjunction is true.
    And(Vec<Formula>),
    /// Disjunction; the empty disjunction is false.
    Or(Vec<Formula>),
    /// Material implication.
    Implies(Box<Formula>, Box<Formula>),
    /// Biconditional.
    Iff(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Creates a variable.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Negates a formula.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Creates a conjunction.
    pub fn and(parts: Vec<Formula>) -> Self {
        Self::And(parts)
    }

    /// Creates a disjunction.
    pub fn or(parts: Vec<Formula>) -> Self {
        Self::Or(parts)
    }

    /// Creates `lhs -> rhs`.
    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Self::Implies(Box::new(lhs), Box::new(rhs))
    }

    /// Creates `lhs <-> rhs`.
    pub fn iff(lhs: Formula, rhs: Formula) -> Self {
        Self::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// Creates the tautology `name | ~name`.
    ///
    /// Used to force a variable into every model of a query.
    pub fn excluded_middle(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::Or(vec![Self::var(name.clone()), Self::var(name).negate()])
    }

    /// Evaluates the formula.
    ///
    /// `lookup` resolves variable names. Returns `None` if any variable
    /// reached during evaluation is unresolved.
    pub fn evaluate<F>(&self, lookup: &F) -> Option<bool>
    where
        F: Fn(&str) -> Option<bool>,
    {
        match self {
            Self::Const(value) => Some(*value),
            Self::Var(name) => lookup(name),
            Self::Not(inner) => inner.evaluate(lookup).map(|v| !v),
            Self::And(parts) => {
                for part in parts {
                    if !part.evaluate(lookup)? {
                        return Some(false);
                    }
                }
                Some(true)
            }
            Self::Or(parts) => {
                for part in parts {
                    if part.evaluate(lookup)? {
                        return Some(true);
                    }
                }
                Some(false)
            }
            Self::Implies(lhs, rhs) => Some(!lhs.evaluate(lookup)? || rhs.evaluate(lookup)?),
            Self::Iff(lhs, rhs) => Some(lhs.evaluate(lookup)? == rhs.evaluate(lookup)?),
        }
    }

    /// Returns the set of variable names occurring in the formula.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Const(_) => {}
            Self::Var(name) => {
                out.insert(name.as_str());
            }
            Self::Not(inner) => inner.collect_variables(out),
            Self::And(parts) | Self::Or(parts) => {
                for part in parts {
                    part.collect_variables(out);
                }
            }
            Self::Implies(lhs, rhs) | Self::Iff(lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
        }
    }

    /// Converts to negation normal form.
    ///
    /// Implications and biconditionals are eliminated and negations are
    /// pushed down to variables.
    #[must_use]
    pub fn to_nnf(&self) -> Formula {
        self.nnf(true)
    }

    fn nnf(&self, positive: bool) -> Formula {
        match self {
            Self::Const(value) => Self::Const(*value == positive),
            Self::Var(name) => {
                if positive {
                    Self::Var(name.clone())
                } else {
                    Self::Var(name.clone()).negate()
                }
            }
            Self::Not(inner) => inner.nnf(!positive),
            Self::And(parts) => {
                let parts = parts.iter().map(|p| p.nnf(positive)).collect();
                if positive {
                    Self::And(parts)
                } else {
                    Self::Or(parts)
                }
            }
            Self::Or(parts) => {
                let parts = parts.iter().map(|p| p.nnf(positive)).collect();
                if positive {
                    Self::Or(parts)
                } else {
                    Self::And(parts)
                }
            }
            Self::Implies(lhs, rhs) => {
                // a -> b == ~a | b
                let rewritten = Self::Or(vec![Self::Not(lhs.clone()), (**rhs).clone()]);
                rewritten.nnf(positive)
            }
            Self::Iff(lhs, rhs) => {
                // a <-> b == (~a | b) & (a | ~b)
                let rewritten = Self::And(vec![
                    Self::Or(vec![Self::Not(lhs.clone()), (**rhs).clone()]),
                    Self::Or(vec![(**lhs).clone(), Self::Not(rhs.clone())]),
                ]);
                rewritten.nnf(positive)
            }
        }
    }

    /// Converts to conjunctive normal form.
    ///
    /// Tautological clauses are dropped and literals inside a clause are
    /// deduplicated. An unsatisfiable formula yields a list containing the
    /// empty clause; a valid one yields no clauses.
    pub fn to_cnf(&self) -> Vec<Clause> {
        cnf_of_nnf(&self.to_nnf())
    }
}

fn cnf_of_nnf(formula: &Formula) -> Vec<Clause> {
    match formula {
        Formula::Const(true) => Vec::new(),
        Formula::Const(false) => vec![Clause::default()],
        Formula::Var(name) => vec![Clause::unit(Literal::positive(name.clone()))],
        Formula::Not(inner) => match inner.as_ref() {
            Formula::Var(name) => vec![Clause::unit(Literal::negative(name.clone()))],
            // NNF guarantees negation only wraps variables.
            other => cnf_of_nnf(&other.nnf(false)),
        },
        Formula::And(parts) => parts.iter().flat_map(cnf_of_nnf).collect(),
        Formula::Or(parts) => {
            let mut acc = vec![Clause::default()];
            for part in parts {
                let part_clauses = cnf_of_nnf(part);
                let mut next = Vec::with_capacity(acc.len() * part_clauses.len());
                for left in &acc {
                    for right in &part_clauses {
                        if let Some(merged) = left.merge(right) {
                            next.push(merged);
                        }
                    }
                }
                acc = next;
            }
            acc
        }
        Formula::Implies(..) | Formula::Iff(..) => cnf_of_nnf(&formula.to_nnf()),
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(true) => write!(f, "T"),
            Self::Const(false) => write!(f, "F"),
            Self::Var(name) => write!(f, "{name}"),
            Self::Not(inner) => write!(f, "~{inner}"),
            Self::And(parts) => write_joined(f, parts, " & ", "T"),
            Self::Or(parts) => write_joined(f, parts, " | ", "F"),
            Self::Implies(lhs, rhs) => write!(f, "({lhs} -> {rhs})"),
            Self::Iff(lhs, rhs) => write!(f, "({lhs} <-> {rhs})"),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    parts: &[Formula],
    separator: &str,
    empty: &str,
) -> fmt::Result {
    if parts.is_empty() {
        return write!(f, "{empty}");
    }
    write!(f, "(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, "{separator}")?;
        }
        write!(f, "{part}")?;
    }
    write!(f, ")")
}

/// A possibly negated variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    /// Variable name.
    pub variable: String,
    /// `true` for the variable itself, `false` for its negation.
    pub positive: bool,
}

impl Literal {
    /// Creates a positive literal.
    pub fn positive(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            positive: true,
        }
    }

    /// Creates a negative literal.
    pub fn negative(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            positive: false,
        }
    }

    /// Returns true if the literal holds for the given variable value.
    pub fn holds(&self, value: bool) -> bool {
        value == self.positive
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "~{}", self.variable)
        }
    }
}

/// A disjunction of literals, kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Creates a clause from literals.
    ///
    /// Returns `None` if the clause is a tautology.
    pub fn new(mut literals: Vec<Literal>) -> Option<Self> {
        literals.sort();
        literals.dedup();
        let tautology = literals
            .windows(2)
            .any(|w| w[0].variable == w[1].variable && w[0].positive != w[1].positive);
        if tautology {
            None
        } else {
            Some(Self { literals })
        }
    }

    fn unit(literal: Literal) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    fn merge(&self, other: &Clause) -> Option<Clause> {
        let mut literals = self.literals.clone();
        literals.extend(other.literals.iter().cloned());
        Clause::new(literals)
    }

    /// Returns the literals of this clause.
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Returns true for the empty (unsatisfiable) clause.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Evaluates the clause; `None` if a variable is unresolved.
    pub fn evaluate<F>(&self, lookup: &F) -> Option<bool>
    where
        F: Fn(&str) -> Option<bool>,
    {
        for literal in &self.literals {
            if literal.holds(lookup(&literal.variable)?) {
                return Some(true);
            }
        }
        Some(false)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "F");
        }
        for (i, literal) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{literal}")?;
        }
        Ok(())
    }
}
