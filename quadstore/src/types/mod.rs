//! Value types shared by every layer: terms, quads and patterns.

pub mod pattern;
pub mod quad;
pub mod term;

pub use pattern::{Pattern, RangeBound, TermMatch, TermRange};
pub use quad::Quad;
pub use term::{Term, TermName, TermNameSet};
