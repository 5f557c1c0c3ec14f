//! Pattern-to-range planning.
//!
//! Given a pattern, the planner picks the index whose slot order gives the
//! longest contiguous prefix of exact-bound slots, then turns that prefix
//! (plus at most one ranged slot right after it) into a byte range over the
//! index's keys. Whatever the range cannot express becomes a residual filter.
//!
//! # Range encoding
//!
//! With `P` the encoded prefix (ending with the separator):
//!
//! ```text
//! gte v  ->  lower  P v SEP            inclusive
//! gt v   ->  lower  P v SEP BOUNDARY   exclusive
//! lte v  ->  upper  P v SEP BOUNDARY   inclusive
//! lt v   ->  upper  P v SEP            exclusive
//! none   ->  lower  P                  inclusive
//!            upper  P BOUNDARY         exclusive
//! ```
//!
//! # Invariants
//!
//! - Every key the range admits belongs to the chosen index and satisfies
//!   every constraint that is not in the residual filter.
//! - Planning never touches the backend.

use std::ops::Bound;

use tracing::debug;

use crate::codec::KeyCodec;
use crate::error::{QuadstoreError, Result};
use crate::index::{Index, IndexRegistry};
use crate::types::{Pattern, RangeBound, TermMatch, TermName, TermNameSet, TermRange};

/// A planned scan over one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    /// The chosen index.
    pub index: Index,
    /// Lower key bound.
    pub lower: Bound<Vec<u8>>,
    /// Upper key bound.
    pub upper: Bound<Vec<u8>>,
    /// Number of leading index slots fixed by exact constraints.
    pub prefix_len: usize,
    /// The ranged slot that narrows the scan, if any.
    pub range_slot: Option<TermName>,
    /// Constraints checked on every decoded quad.
    pub residual: Pattern,
}

impl ScanPlan {
    /// Slot order of the results: the chosen index's order.
    #[must_use]
    pub const fn sorting(&self) -> &[TermName; 4] {
        self.index.terms()
    }

    /// Start and end keys for a size estimate.
    ///
    /// The bounds' inclusivity is ignored: the estimate is advisory.
    #[must_use]
    pub fn size_range(&self) -> (&[u8], &[u8]) {
        (bound_key(&self.lower), bound_key(&self.upper))
    }
}

fn bound_key(bound: &Bound<Vec<u8>>) -> &[u8] {
    match bound {
        Bound::Included(key) | Bound::Excluded(key) => key,
        Bound::Unbounded => &[],
    }
}

/// Plans scans against a fixed registry and codec.
#[derive(Debug, Clone, Copy)]
pub struct RangePlanner<'a> {
    registry: &'a IndexRegistry,
    codec: &'a KeyCodec,
}

impl<'a> RangePlanner<'a> {
    #[must_use]
    pub const fn new(registry: &'a IndexRegistry, codec: &'a KeyCodec) -> Self {
        Self { registry, codec }
    }

    /// Plan a scan for a pattern.
    ///
    /// # Errors
    ///
    /// - `Validation` if more than one slot carries a range, or the registry
    ///   is empty
    /// - `Encoding` if a constraint value contains a reserved sequence
    pub fn plan(&self, pattern: &Pattern) -> Result<ScanPlan> {
        let mut exact = TermNameSet::empty();
        let mut ranged: Option<(TermName, &TermRange)> = None;
        for (name, constraint) in pattern.constraints() {
            match constraint {
                TermMatch::Exact(term) => {
                    self.codec.validate_term(name, term)?;
                    exact.insert(name);
                }
                TermMatch::Range(range) => {
                    for bound in [&range.lower, &range.upper].into_iter().flatten() {
                        self.codec.validate_term(name, &bound.value)?;
                    }
                    if let Some((first, _)) = ranged {
                        return Err(QuadstoreError::Validation(format!(
                            "pattern {pattern} has ranges on both {first} and {name}"
                        )));
                    }
                    ranged = Some((name, range));
                }
            }
        }

        let index = self.choose_index(exact, ranged.map(|(name, _)| name))?;
        let prefix_len = index.usable_prefix_len(exact);
        let prefix_slots = &index.terms()[..prefix_len];

        let prefix = self.codec.encode_key(
            index.name(),
            prefix_slots.iter().filter_map(|&name| match pattern.get(name) {
                Some(TermMatch::Exact(term)) => Some((name, term)),
                _ => None,
            }),
        )?;

        let narrowing = ranged.filter(|(name, _)| index.terms().get(prefix_len) == Some(name));
        let (lower, upper) = match narrowing {
            Some((_, range)) => self.range_bounds(&prefix, range),
            None => (
                Bound::Included(prefix.clone()),
                Bound::Excluded(format!("{prefix}{}", self.codec.boundary())),
            ),
        };

        let mut residual = Pattern::new();
        for (name, constraint) in pattern.constraints() {
            let covered = prefix_slots.contains(&name)
                || narrowing.is_some_and(|(range_slot, _)| range_slot == name);
            if !covered {
                residual.set(name, Some(constraint.clone()));
            }
        }

        debug!(
            pattern = %pattern,
            index = %index,
            prefix_len,
            residual_slots = residual.constraints().count(),
            "planned scan"
        );

        Ok(ScanPlan {
            index: index.clone(),
            lower: into_bytes(lower),
            upper: into_bytes(upper),
            prefix_len,
            range_slot: narrowing.map(|(name, _)| name),
            residual,
        })
    }

    /// Pick the index with the longest usable prefix over the exact slots.
    ///
    /// Among equals, an index whose next slot is the ranged one wins; after
    /// that, registration order decides.
    fn choose_index(&self, exact: TermNameSet, range_slot: Option<TermName>) -> Result<&'a Index> {
        let mut best: Option<(&Index, (usize, bool))> = None;
        for index in self.registry.all_indexes() {
            let prefix_len = index.usable_prefix_len(exact);
            let range_next =
                range_slot.is_some_and(|slot| index.terms().get(prefix_len) == Some(&slot));
            let score = (prefix_len, range_next);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        best.map(|(index, _)| index)
            .ok_or_else(|| QuadstoreError::Validation("no index is registered".to_string()))
    }

    fn range_bounds(&self, prefix: &str, range: &TermRange) -> (Bound<String>, Bound<String>) {
        let sep = self.codec.separator();
        let boundary = self.codec.boundary();
        let lower = match &range.lower {
            None => Bound::Included(prefix.to_owned()),
            Some(RangeBound { value, inclusive: true }) => {
                Bound::Included(format!("{prefix}{value}{sep}"))
            }
            Some(RangeBound { value, inclusive: false }) => {
                Bound::Excluded(format!("{prefix}{value}{sep}{boundary}"))
            }
        };
        let upper = match &range.upper {
            None => Bound::Excluded(format!("{prefix}{boundary}")),
            Some(RangeBound { value, inclusive: true }) => {
                Bound::Included(format!("{prefix}{value}{sep}{boundary}"))
            }
            Some(RangeBound { value, inclusive: false }) => {
                Bound::Excluded(format!("{prefix}{value}{sep}"))
            }
        };
        (lower, upper)
    }
}

fn into_bytes(bound: Bound<String>) -> Bound<Vec<u8>> {
    bound.map(String::into_bytes)
}
