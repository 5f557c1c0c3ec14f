//! Lookup patterns.
//!
//! A `Pattern` is a partial quad. Each slot is either free (`None`), bound to
//! an exact term, or bound to a range of terms. Exact and range constraints
//! are mutually exclusive per slot by construction (`TermMatch` is an enum),
//! and a range has at most one lower and one upper bound by construction
//! (`TermRange` stores one of each).

use std::cmp::Ordering;
use std::fmt;

use super::quad::Quad;
use super::term::{Term, TermName};

/// One side of a range: a value plus whether the value itself is included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeBound {
    pub value: Term,
    pub inclusive: bool,
}

/// A half-open or closed range of terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TermRange {
    pub lower: Option<RangeBound>,
    pub upper: Option<RangeBound>,
}

impl TermRange {
    /// An unbounded range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive lower bound. Replaces any existing lower bound.
    #[must_use]
    pub fn gt(mut self, value: impl Into<Term>) -> Self {
        self.lower = Some(RangeBound {
            value: value.into(),
            inclusive: false,
        });
        self
    }

    /// Inclusive lower bound. Replaces any existing lower bound.
    #[must_use]
    pub fn gte(mut self, value: impl Into<Term>) -> Self {
        self.lower = Some(RangeBound {
            value: value.into(),
            inclusive: true,
        });
        self
    }

    /// Exclusive upper bound. Replaces any existing upper bound.
    #[must_use]
    pub fn lt(mut self, value: impl Into<Term>) -> Self {
        self.upper = Some(RangeBound {
            value: value.into(),
            inclusive: false,
        });
        self
    }

    /// Inclusive upper bound. Replaces any existing upper bound.
    #[must_use]
    pub fn lte(mut self, value: impl Into<Term>) -> Self {
        self.upper = Some(RangeBound {
            value: value.into(),
            inclusive: true,
        });
        self
    }

    /// Check whether a term falls inside the range.
    #[must_use]
    pub fn contains(&self, term: &Term) -> bool {
        let above_lower = self.lower.as_ref().is_none_or(|bound| {
            if bound.inclusive {
                term >= &bound.value
            } else {
                term > &bound.value
            }
        });
        let below_upper = self.upper.as_ref().is_none_or(|bound| {
            if bound.inclusive {
                term <= &bound.value
            } else {
                term < &bound.value
            }
        });
        above_lower && below_upper
    }

    /// Intersect two ranges, keeping the tighter bound on each side.
    ///
    /// When both sides carry the same value, the exclusive bound wins.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            lower: tighter(self.lower.as_ref(), other.lower.as_ref(), Ordering::Greater),
            upper: tighter(self.upper.as_ref(), other.upper.as_ref(), Ordering::Less),
        }
    }
}

/// Pick the tighter of two bounds. `wins` is the ordering a value must have
/// relative to the other to be the tighter one.
fn tighter(a: Option<&RangeBound>, b: Option<&RangeBound>, wins: Ordering) -> Option<RangeBound> {
    match (a, b) {
        (None, None) => None,
        (Some(bound), None) | (None, Some(bound)) => Some(bound.clone()),
        (Some(a), Some(b)) => match a.value.cmp(&b.value) {
            Ordering::Equal => Some(RangeBound {
                value: a.value.clone(),
                inclusive: a.inclusive && b.inclusive,
            }),
            ordering if ordering == wins => Some(a.clone()),
            _ => Some(b.clone()),
        },
    }
}

impl fmt::Display for TermRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Some(bound) if bound.inclusive => write!(f, "[{}", bound.value)?,
            Some(bound) => write!(f, "({}", bound.value)?,
            None => f.write_str("(*")?,
        }
        f.write_str(", ")?;
        match &self.upper {
            Some(bound) if bound.inclusive => write!(f, "{}]", bound.value),
            Some(bound) => write!(f, "{})", bound.value),
            None => f.write_str("*)"),
        }
    }
}

/// A constraint on a single pattern slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermMatch {
    /// The slot must equal this term.
    Exact(Term),
    /// The slot must fall inside this range.
    Range(TermRange),
}

impl TermMatch {
    /// Check whether a term satisfies the constraint.
    #[must_use]
    pub fn matches(&self, term: &Term) -> bool {
        match self {
            Self::Exact(expected) => expected == term,
            Self::Range(range) => range.contains(term),
        }
    }
}

impl From<Term> for TermMatch {
    fn from(term: Term) -> Self {
        Self::Exact(term)
    }
}

impl From<&str> for TermMatch {
    fn from(value: &str) -> Self {
        Self::Exact(Term::from(value))
    }
}

impl From<String> for TermMatch {
    fn from(value: String) -> Self {
        Self::Exact(Term::from(value))
    }
}

impl From<TermRange> for TermMatch {
    fn from(range: TermRange) -> Self {
        Self::Range(range)
    }
}

impl fmt::Display for TermMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(term) => write!(f, "{term:?}"),
            Self::Range(range) => write!(f, "{range}"),
        }
    }
}

/// A partial quad used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern {
    pub subject: Option<TermMatch>,
    pub predicate: Option<TermMatch>,
    pub object: Option<TermMatch>,
    pub graph: Option<TermMatch>,
}

impl Pattern {
    /// A pattern with every slot free.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the subject slot.
    #[must_use]
    pub fn subject(self, constraint: impl Into<TermMatch>) -> Self {
        self.with(TermName::Subject, constraint)
    }

    /// Constrain the predicate slot.
    #[must_use]
    pub fn predicate(self, constraint: impl Into<TermMatch>) -> Self {
        self.with(TermName::Predicate, constraint)
    }

    /// Constrain the object slot.
    #[must_use]
    pub fn object(self, constraint: impl Into<TermMatch>) -> Self {
        self.with(TermName::Object, constraint)
    }

    /// Constrain the graph slot.
    #[must_use]
    pub fn graph(self, constraint: impl Into<TermMatch>) -> Self {
        self.with(TermName::Graph, constraint)
    }

    /// Constrain an arbitrary slot.
    #[must_use]
    pub fn with(mut self, name: TermName, constraint: impl Into<TermMatch>) -> Self {
        self.set(name, Some(constraint.into()));
        self
    }

    /// Get the constraint on a slot.
    #[must_use]
    pub const fn get(&self, name: TermName) -> Option<&TermMatch> {
        match name {
            TermName::Subject => self.subject.as_ref(),
            TermName::Predicate => self.predicate.as_ref(),
            TermName::Object => self.object.as_ref(),
            TermName::Graph => self.graph.as_ref(),
        }
    }

    /// Replace the constraint on a slot.
    pub fn set(&mut self, name: TermName, constraint: Option<TermMatch>) {
        let slot = match name {
            TermName::Subject => &mut self.subject,
            TermName::Predicate => &mut self.predicate,
            TermName::Object => &mut self.object,
            TermName::Graph => &mut self.graph,
        };
        *slot = constraint;
    }

    /// Iterate over constrained slots in canonical order.
    pub fn constraints(&self) -> impl Iterator<Item = (TermName, &TermMatch)> {
        TermName::ALL
            .into_iter()
            .filter_map(|name| self.get(name).map(|constraint| (name, constraint)))
    }

    /// Check whether every slot is free.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints().next().is_none()
    }

    /// Check whether a quad satisfies every constraint.
    #[must_use]
    pub fn matches(&self, quad: &Quad) -> bool {
        self.constraints()
            .all(|(name, constraint)| constraint.matches(quad.get(name)))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, constraint)) in self.constraints().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {constraint}")?;
        }
        f.write_str("}")
    }
}
