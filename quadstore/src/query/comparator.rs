//! Comparator factories.
//!
//! A scan is sorted by its index's slot order only. These comparators give
//! callers a canonical order of their choosing, for use with `sort_by`.

use std::cmp::Ordering;

use super::binding::Binding;
use crate::types::{Quad, Term, TermName};

/// Byte-wise term order, the order keys are stored in.
#[must_use]
pub fn term_comparator() -> impl Fn(&Term, &Term) -> Ordering + Copy {
    |a, b| a.cmp(b)
}

/// Order quads slot by slot, in the given slot order.
#[must_use]
pub fn quad_comparator(order: &[TermName]) -> impl Fn(&Quad, &Quad) -> Ordering + Clone {
    let order = order.to_vec();
    move |a, b| {
        order
            .iter()
            .map(|&name| a.get(name).cmp(b.get(name)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Order bindings variable by variable, in the given order.
///
/// An unbound variable sorts before any bound one.
#[must_use]
pub fn binding_comparator<S: AsRef<str>>(
    variables: &[S],
) -> impl Fn(&Binding, &Binding) -> Ordering + Clone {
    let variables: Vec<String> = variables.iter().map(|v| v.as_ref().to_owned()).collect();
    move |a, b| {
        variables
            .iter()
            .map(|variable| a.get(variable).cmp(&b.get(variable)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}
