//! Multi-pattern search.
//!
//! A search is an ordered list of stages plus optional filters. Each stage is
//! a pattern whose slots may name variables: a variable bound by an earlier
//! stage is substituted as an exact term before the stage is planned, and a
//! variable seen for the first time is bound from every quad the stage
//! yields. Evaluation is a nested-loop join in stage order.
//!
//! Searches are compiled before anything is read, so an ill-formed search
//! fails without touching the backend.
//!
//! # Filters
//!
//! A range or equality filter on a variable is pushed into the slot of the
//! stage that binds it, as long as that does not give the stage a second
//! ranged slot. Everything else is checked on the binding right after the
//! binding stage.

use std::collections::BTreeSet;
use std::fmt;

use crate::codec::KeyCodec;
use crate::error::{QuadstoreError, Result};
use crate::types::{Pattern, Quad, Term, TermMatch, TermName, TermRange};

use super::binding::Binding;

/// The content of one stage slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageTerm {
    /// The slot must equal this term.
    Exact(Term),
    /// The slot must fall in this range.
    Range(TermRange),
    /// A variable: bound here if no earlier stage binds it, otherwise used
    /// as an input.
    Variable(String),
    /// A variable that an earlier stage must have bound.
    Input(String),
}

impl StageTerm {
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    #[must_use]
    pub fn input(name: impl Into<String>) -> Self {
        Self::Input(name.into())
    }
}

impl From<Term> for StageTerm {
    fn from(term: Term) -> Self {
        Self::Exact(term)
    }
}

impl From<&str> for StageTerm {
    fn from(value: &str) -> Self {
        Self::Exact(Term::from(value))
    }
}

impl From<String> for StageTerm {
    fn from(value: String) -> Self {
        Self::Exact(Term::from(value))
    }
}

impl From<TermRange> for StageTerm {
    fn from(range: TermRange) -> Self {
        Self::Range(range)
    }
}

impl From<TermMatch> for StageTerm {
    fn from(constraint: TermMatch) -> Self {
        match constraint {
            TermMatch::Exact(term) => Self::Exact(term),
            TermMatch::Range(range) => Self::Range(range),
        }
    }
}

impl fmt::Display for StageTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(term) => write!(f, "{term:?}"),
            Self::Range(range) => write!(f, "{range}"),
            Self::Variable(name) => write!(f, "?{name}"),
            Self::Input(name) => write!(f, "<?{name}>"),
        }
    }
}

/// One pattern of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStage {
    pub subject: Option<StageTerm>,
    pub predicate: Option<StageTerm>,
    pub object: Option<StageTerm>,
    pub graph: Option<StageTerm>,
}

impl SearchStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subject(self, term: impl Into<StageTerm>) -> Self {
        self.with(TermName::Subject, term)
    }

    #[must_use]
    pub fn predicate(self, term: impl Into<StageTerm>) -> Self {
        self.with(TermName::Predicate, term)
    }

    #[must_use]
    pub fn object(self, term: impl Into<StageTerm>) -> Self {
        self.with(TermName::Object, term)
    }

    #[must_use]
    pub fn graph(self, term: impl Into<StageTerm>) -> Self {
        self.with(TermName::Graph, term)
    }

    /// Set an arbitrary slot.
    #[must_use]
    pub fn with(mut self, name: TermName, term: impl Into<StageTerm>) -> Self {
        let slot = match name {
            TermName::Subject => &mut self.subject,
            TermName::Predicate => &mut self.predicate,
            TermName::Object => &mut self.object,
            TermName::Graph => &mut self.graph,
        };
        *slot = Some(term.into());
        self
    }

    #[must_use]
    pub const fn get(&self, name: TermName) -> Option<&StageTerm> {
        match name {
            TermName::Subject => self.subject.as_ref(),
            TermName::Predicate => self.predicate.as_ref(),
            TermName::Object => self.object.as_ref(),
            TermName::Graph => self.graph.as_ref(),
        }
    }
}

impl From<Pattern> for SearchStage {
    fn from(pattern: Pattern) -> Self {
        Self {
            subject: pattern.subject.map(StageTerm::from),
            predicate: pattern.predicate.map(StageTerm::from),
            object: pattern.object.map(StageTerm::from),
            graph: pattern.graph.map(StageTerm::from),
        }
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut first = true;
        for name in TermName::ALL {
            if let Some(term) = self.get(name) {
                if !first {
                    f.write_str(", ")?;
                }
                first = false;
                write!(f, "{name}: {term}")?;
            }
        }
        f.write_str("}")
    }
}

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Ne,
}

/// A comparison between a variable and a constant term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub op: FilterOp,
    pub variable: String,
    pub value: Term,
}

impl SearchFilter {
    #[must_use]
    pub fn new(op: FilterOp, variable: impl Into<String>, value: impl Into<Term>) -> Self {
        Self {
            op,
            variable: variable.into(),
            value: value.into(),
        }
    }

    /// Check whether a bound value passes the filter.
    #[must_use]
    pub fn accepts(&self, term: &Term) -> bool {
        match self.op {
            FilterOp::Lt => term < &self.value,
            FilterOp::Lte => term <= &self.value,
            FilterOp::Gt => term > &self.value,
            FilterOp::Gte => term >= &self.value,
            FilterOp::Eq => term == &self.value,
            FilterOp::Ne => term != &self.value,
        }
    }

    /// The slot constraint equivalent to this filter, if there is one.
    fn constraint(&self) -> Option<TermMatch> {
        let value = self.value.clone();
        match self.op {
            FilterOp::Lt => Some(TermRange::new().lt(value).into()),
            FilterOp::Lte => Some(TermRange::new().lte(value).into()),
            FilterOp::Gt => Some(TermRange::new().gt(value).into()),
            FilterOp::Gte => Some(TermRange::new().gte(value).into()),
            FilterOp::Eq => Some(TermMatch::Exact(value)),
            FilterOp::Ne => None,
        }
    }
}

/// A multi-pattern search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    pub stages: Vec<SearchStage>,
    pub filters: Vec<SearchFilter>,
}

impl Search {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    #[must_use]
    pub fn stage(mut self, stage: SearchStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: SearchFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// How a compiled stage fills one slot of its pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SlotPlan {
    Free,
    Fixed(TermMatch),
    Input(String),
}

/// A stage ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledStage {
    /// Slot plans in canonical slot order.
    slots: [SlotPlan; 4],
    /// Variables first bound by this stage, with the slot they are read from.
    outputs: Vec<(String, TermName)>,
    /// Slot pairs holding the same new variable; they must be equal.
    equalities: Vec<(TermName, TermName)>,
    /// Filters checked on the binding after this stage.
    post_filters: Vec<SearchFilter>,
}

impl CompiledStage {
    /// The pattern to scan for, given the binding so far.
    pub(crate) fn pattern(&self, binding: &Binding) -> Result<Pattern> {
        let mut pattern = Pattern::new();
        for (name, slot) in TermName::ALL.into_iter().zip(&self.slots) {
            let constraint = match slot {
                SlotPlan::Free => None,
                SlotPlan::Fixed(constraint) => Some(constraint.clone()),
                SlotPlan::Input(variable) => {
                    let term = binding.get(variable).ok_or_else(|| {
                        QuadstoreError::Plan(format!("?{variable} is not bound"))
                    })?;
                    Some(TermMatch::Exact(term.clone()))
                }
            };
            pattern.set(name, constraint);
        }
        Ok(pattern)
    }

    /// Extend a binding with a quad this stage yielded.
    ///
    /// Returns `None` if the quad breaks a repeated variable or a filter.
    pub(crate) fn extend(&self, binding: &Binding, quad: &Quad) -> Option<Binding> {
        if !self
            .equalities
            .iter()
            .all(|&(a, b)| quad.get(a) == quad.get(b))
        {
            return None;
        }
        let mut next = binding.clone();
        for (variable, slot) in &self.outputs {
            next.set(variable.clone(), quad.get(*slot).clone());
        }
        self.post_filters
            .iter()
            .all(|filter| {
                next.get(&filter.variable)
                    .is_some_and(|term| filter.accepts(term))
            })
            .then_some(next)
    }

    /// Variables bound by this stage, listed in the given slot order.
    pub(crate) fn output_variables(&self, order: &[TermName]) -> Vec<String> {
        order
            .iter()
            .filter_map(|slot| {
                self.outputs
                    .iter()
                    .find(|(_, output_slot)| output_slot == slot)
                    .map(|(variable, _)| variable.clone())
            })
            .collect()
    }

    fn has_range_outside(&self, name: TermName) -> bool {
        TermName::ALL
            .into_iter()
            .zip(&self.slots)
            .any(|(slot, plan)| {
                slot != name && matches!(plan, SlotPlan::Fixed(TermMatch::Range(_)))
            })
    }
}

/// A search ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledSearch {
    stages: Vec<CompiledStage>,
}

impl CompiledSearch {
    /// Check a search and resolve every variable to an input or an output.
    ///
    /// # Errors
    ///
    /// - `Plan` if there are no stages, a stage reads a variable no earlier
    ///   stage binds, or a filter names a variable no stage binds
    /// - `Validation` if a stage has more than one ranged slot
    /// - `Encoding` if a constant contains a reserved sequence
    pub(crate) fn compile(search: &Search, codec: &KeyCodec) -> Result<Self> {
        if search.stages.is_empty() {
            return Err(QuadstoreError::Plan("search has no stages".to_string()));
        }

        let mut known: BTreeSet<String> = BTreeSet::new();
        let mut stages = Vec::with_capacity(search.stages.len());
        for (i, stage) in search.stages.iter().enumerate() {
            let compiled = compile_stage(i, stage, &known, codec)?;
            known.extend(compiled.outputs.iter().map(|(variable, _)| variable.clone()));
            stages.push(compiled);
        }

        for filter in &search.filters {
            let (stage, slot) = stages
                .iter_mut()
                .find_map(|stage| {
                    let slot = stage
                        .outputs
                        .iter()
                        .find(|(variable, _)| *variable == filter.variable)
                        .map(|(_, slot)| *slot)?;
                    Some((stage, slot))
                })
                .ok_or_else(|| {
                    QuadstoreError::Plan(format!(
                        "filter on ?{} but no stage binds it",
                        filter.variable
                    ))
                })?;
            push_filter(stage, slot, filter, codec)?;
        }

        Ok(Self { stages })
    }

    pub(crate) fn stage(&self, depth: usize) -> Option<&CompiledStage> {
        self.stages.get(depth)
    }

    pub(crate) fn first(&self) -> Option<&CompiledStage> {
        self.stages.first()
    }
}

fn compile_stage(
    position: usize,
    stage: &SearchStage,
    known: &BTreeSet<String>,
    codec: &KeyCodec,
) -> Result<CompiledStage> {
    let mut compiled = CompiledStage {
        slots: [SlotPlan::Free, SlotPlan::Free, SlotPlan::Free, SlotPlan::Free],
        outputs: Vec::new(),
        equalities: Vec::new(),
        post_filters: Vec::new(),
    };

    for (name, slot) in TermName::ALL.into_iter().zip(compiled.slots.iter_mut()) {
        *slot = match stage.get(name) {
            None => SlotPlan::Free,
            Some(StageTerm::Exact(term)) => {
                codec.validate_term(name, term)?;
                SlotPlan::Fixed(TermMatch::Exact(term.clone()))
            }
            Some(StageTerm::Range(range)) => {
                for bound in [&range.lower, &range.upper].into_iter().flatten() {
                    codec.validate_term(name, &bound.value)?;
                }
                SlotPlan::Fixed(TermMatch::Range(range.clone()))
            }
            Some(StageTerm::Input(variable)) => {
                if !known.contains(variable) {
                    return Err(QuadstoreError::Plan(format!(
                        "stage {position} reads ?{variable} before any stage binds it"
                    )));
                }
                SlotPlan::Input(variable.clone())
            }
            Some(StageTerm::Variable(variable)) if known.contains(variable) => {
                SlotPlan::Input(variable.clone())
            }
            Some(StageTerm::Variable(variable)) => {
                match compiled.outputs.iter().find(|(output, _)| output == variable) {
                    Some(&(_, first)) => compiled.equalities.push((first, name)),
                    None => compiled.outputs.push((variable.clone(), name)),
                }
                SlotPlan::Free
            }
        };
    }

    let ranged = compiled
        .slots
        .iter()
        .filter(|slot| matches!(slot, SlotPlan::Fixed(TermMatch::Range(_))))
        .count();
    if ranged > 1 {
        return Err(QuadstoreError::Validation(format!(
            "stage {position} {stage} has {ranged} ranged slots"
        )));
    }
    Ok(compiled)
}

/// Push a filter into the slot it constrains, or keep it as a post-check.
fn push_filter(
    stage: &mut CompiledStage,
    slot: TermName,
    filter: &SearchFilter,
    codec: &KeyCodec,
) -> Result<()> {
    let position = slot.position();
    let pushed = match (&stage.slots[position], filter.constraint()) {
        (SlotPlan::Free, Some(constraint @ TermMatch::Exact(_))) => Some(constraint),
        (SlotPlan::Free, Some(constraint @ TermMatch::Range(_)))
            if !stage.has_range_outside(slot) =>
        {
            Some(constraint)
        }
        (SlotPlan::Fixed(TermMatch::Range(current)), Some(TermMatch::Range(range))) => {
            Some(TermMatch::Range(current.intersect(&range)))
        }
        _ => None,
    };

    match pushed {
        Some(constraint) => {
            codec.validate_term(slot, &filter.value)?;
            stage.slots[position] = SlotPlan::Fixed(constraint);
        }
        None => stage.post_filters.push(filter.clone()),
    }
    Ok(())
}
