//! The cardinality constraint record: "between `min_true` and `max_true`
//! of these variables are True".

use crate::{
    error::{Result, SolverError},
    solver::{state::VarId, value::TriBool},
};

/// A rule binding a set of member variables: at least `min_true` and at
/// most `max_true` of them must end up True.
///
/// The record keeps running counts of its True and Unknown members, which
/// the owning [`State`](crate::solver::state::State) adjusts on every
/// member assignment; nothing here is ever recomputed by scanning the
/// membership list outside of debug assertions.
///
/// The payload `C` is opaque client bookkeeping (a label, a rule
/// description); the engine never looks inside it.
#[derive(Debug, Clone)]
pub struct CardinalityConstraint<C> {
    min_true: usize,
    max_true: Option<usize>,
    members: Vec<VarId>,
    n_true: usize,
    n_unknown: usize,
    payload: C,
}

impl<C> CardinalityConstraint<C> {
    /// `max_true: None` means there is no upper bound.
    pub(crate) fn new(min_true: usize, max_true: Option<usize>, payload: C) -> Result<Self> {
        if let Some(max_true) = max_true {
            if min_true > max_true {
                return Err(SolverError::ImpossibleBounds { min_true, max_true }.into());
            }
        }
        Ok(Self {
            min_true,
            max_true,
            members: Vec::new(),
            n_true: 0,
            n_unknown: 0,
            payload,
        })
    }

    pub fn min_true(&self) -> usize {
        self.min_true
    }

    /// `None` when the constraint has no upper bound.
    pub fn max_true(&self) -> Option<usize> {
        self.max_true
    }

    pub fn members(&self) -> &[VarId] {
        &self.members
    }

    pub fn n_true(&self) -> usize {
        self.n_true
    }

    pub fn n_unknown(&self) -> usize {
        self.n_unknown
    }

    pub fn n_false(&self) -> usize {
        self.members.len() - self.n_true - self.n_unknown
    }

    pub fn payload(&self) -> &C {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut C {
        &mut self.payload
    }

    /// True when the bounds can no longer be met: too many members are
    /// already True, or too few could still become True.
    pub fn is_violated(&self) -> bool {
        if let Some(max_true) = self.max_true {
            if self.n_true > max_true {
                return true;
            }
        }
        self.n_true + self.n_unknown < self.min_true
    }

    /// All Unknown members are needed to reach the lower bound.
    pub fn must_all_be_true(&self) -> bool {
        self.n_unknown > 0 && self.n_true + self.n_unknown == self.min_true
    }

    /// The upper bound is already met, so no Unknown member may be True.
    pub fn must_all_be_false(&self) -> bool {
        self.n_unknown > 0 && Some(self.n_true) == self.max_true
    }

    /// A constraint is eager exactly when a forced assignment can be read
    /// off it right now.
    pub fn is_eager(&self) -> bool {
        self.must_all_be_true() || self.must_all_be_false()
    }

    pub(crate) fn add_member(&mut self, var: VarId, value: TriBool) {
        self.members.push(var);
        self.count(value, 1);
    }

    pub(crate) fn has_member(&self, var: VarId) -> bool {
        self.members.contains(&var)
    }

    /// O(1) count maintenance for one member moving between truth states.
    pub(crate) fn notice_change(&mut self, prev: TriBool, new: TriBool) {
        self.count(prev, -1);
        self.count(new, 1);
    }

    fn count(&mut self, value: TriBool, delta: isize) {
        let bump = |n: &mut usize| *n = n.checked_add_signed(delta).expect("member count underflow");
        match value {
            TriBool::True => bump(&mut self.n_true),
            TriBool::Unknown => bump(&mut self.n_unknown),
            TriBool::False => {}
        }
    }
}
