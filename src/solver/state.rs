//! The shared problem state: every variable, every constraint, the undo
//! trail, and the propagation engine that runs over them.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    error::{Result, SolverError},
    solver::{
        constraint::CardinalityConstraint, stats::SearchStats, value::TriBool,
        work_list::WorkList,
    },
};

pub type VarId = usize;
pub type ConstraintId = usize;

#[derive(Debug, Clone)]
struct Variable<V> {
    value: TriBool,
    constraints: Vec<ConstraintId>,
    payload: V,
}

/// One undo frame: (variable, value to restore), replayed in reverse.
type Frame = Vec<(VarId, TriBool)>;

/// One constraint problem and everything the solver mutates while working
/// on it.
///
/// Variables and constraints live in index arenas and refer to each other
/// by id, so the many-to-many graph between them involves no shared
/// ownership. The membership graph is append-only; after setup, only
/// variable *values* change, and every change flows through the undo
/// trail so it can be rolled back frame by frame.
///
/// `V` and `C` are opaque payload types for client bookkeeping on
/// variables and constraints respectively; the engine never inspects
/// them.
#[derive(Debug)]
pub struct State<V = (), C = ()> {
    vars: Vec<Variable<V>>,
    constraints: Vec<CardinalityConstraint<C>>,
    n_unknown: usize,
    violated: HashSet<ConstraintId>,
    work: WorkList,
    trail: Vec<Frame>,
}

impl<V, C> State<V, C> {
    /// A fresh, empty problem. The trail starts with a bottom frame that
    /// records client pre-seeding; it is never popped.
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            constraints: Vec::new(),
            n_unknown: 0,
            violated: HashSet::new(),
            work: WorkList::new(),
            trail: vec![Vec::new()],
        }
    }

    /// Creates a new variable, initially Unknown.
    pub fn new_var(&mut self, payload: V) -> VarId {
        let var = self.vars.len();
        self.vars.push(Variable {
            value: TriBool::Unknown,
            constraints: Vec::new(),
            payload,
        });
        self.n_unknown += 1;
        var
    }

    /// Creates a new, empty constraint. `max_true: None` means no upper
    /// bound. Fails fast on `min_true > max_true`.
    pub fn new_constraint(
        &mut self,
        min_true: usize,
        max_true: Option<usize>,
        payload: C,
    ) -> Result<ConstraintId> {
        let constraint = CardinalityConstraint::new(min_true, max_true, payload)?;
        let id = self.constraints.len();
        self.constraints.push(constraint);
        self.check(id);
        Ok(id)
    }

    /// Binds `var` and `constraint` bidirectionally. Adding the same
    /// variable twice is an error.
    pub fn add_member(&mut self, constraint: ConstraintId, var: VarId) -> Result<()> {
        if self.constraints[constraint].has_member(var) {
            return Err(SolverError::DuplicateMember { var, constraint }.into());
        }
        let value = self.vars[var].value;
        self.constraints[constraint].add_member(var, value);
        self.vars[var].constraints.push(constraint);
        self.check(constraint);
        Ok(())
    }

    pub fn n_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn var_ids(&self) -> std::ops::Range<VarId> {
        0..self.vars.len()
    }

    pub fn constraint_ids(&self) -> std::ops::Range<ConstraintId> {
        0..self.constraints.len()
    }

    pub fn value(&self, var: VarId) -> TriBool {
        self.vars[var].value
    }

    pub fn payload(&self, var: VarId) -> &V {
        &self.vars[var].payload
    }

    pub fn payload_mut(&mut self, var: VarId) -> &mut V {
        &mut self.vars[var].payload
    }

    /// The constraints this variable is a member of.
    pub fn owning_constraints(&self, var: VarId) -> &[ConstraintId] {
        &self.vars[var].constraints
    }

    pub fn constraint(&self, constraint: ConstraintId) -> &CardinalityConstraint<C> {
        &self.constraints[constraint]
    }

    pub fn constraint_payload_mut(&mut self, constraint: ConstraintId) -> &mut C {
        self.constraints[constraint].payload_mut()
    }

    /// All variables whose value is still Unknown, in id order.
    pub fn unknown_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.vars
            .iter()
            .enumerate()
            .filter(|(_, var)| var.value.is_unknown())
            .map(|(id, _)| id)
    }

    pub fn unknown_count(&self) -> usize {
        self.n_unknown
    }

    /// No constraint is currently violated.
    pub fn consistent(&self) -> bool {
        self.violated.is_empty()
    }

    /// Consistent and every variable is decided.
    pub fn is_solved(&self) -> bool {
        self.violated.is_empty() && self.n_unknown == 0
    }

    /// The constraints currently known to be violated.
    pub fn violations(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.violated.iter().copied()
    }

    /// Search depth: the number of frames above the bottom setup frame.
    pub fn depth(&self) -> usize {
        self.trail.len() - 1
    }

    /// Attempts an assignment. Returns whether the problem is still
    /// consistent afterwards.
    ///
    /// Re-deciding an already-decided variable to the *other* value is an
    /// error (it signals a bug in the code building the problem);
    /// re-stating the same value is a no-op.
    pub fn set(&mut self, var: VarId, value: bool) -> Result<bool> {
        match self.vars[var].value {
            TriBool::Unknown => Ok(self.assign(var, value)),
            current => {
                let current = current == TriBool::True;
                if current == value {
                    Ok(self.consistent())
                } else {
                    Err(SolverError::Redecided {
                        var,
                        current,
                        requested: value,
                    }
                    .into())
                }
            }
        }
    }

    /// Records the previous value into the current frame, then assigns.
    /// Unlike [`set`](Self::set) this will happily overwrite a decided
    /// variable; the search driver relies on that to pre-record the
    /// complement of a guess.
    pub(crate) fn assign(&mut self, var: VarId, value: bool) -> bool {
        let prev = self.vars[var].value;
        self.trail
            .last_mut()
            .expect("the bottom frame is never popped")
            .push((var, prev));
        self.raw_set(var, value.into())
    }

    /// Assigns without touching the trail, doing all the count and status
    /// bookkeeping. Used on the way down (after recording) and on the way
    /// back up (replaying a frame). Every owning constraint is notified;
    /// assignments must always be accounted for, even when the caller is
    /// about to bail out on a contradiction.
    fn raw_set(&mut self, var: VarId, value: TriBool) -> bool {
        let prev = self.vars[var].value;
        self.vars[var].value = value;
        trace!(var, %value, "set");
        match (prev.is_unknown(), value.is_unknown()) {
            (true, false) => self.n_unknown -= 1,
            (false, true) => self.n_unknown += 1,
            _ => {}
        }
        for constraint in self.vars[var].constraints.clone() {
            self.constraints[constraint].notice_change(prev, value);
            self.check(constraint);
        }
        self.consistent()
    }

    /// Re-derives one constraint's violated status and queues it for
    /// propagation if it is eager.
    fn check(&mut self, constraint: ConstraintId) {
        let record = &self.constraints[constraint];
        let violated = record.is_violated();
        if record.is_eager() {
            self.work.push_back(constraint);
        }
        if violated != self.violated.contains(&constraint) {
            if violated {
                debug!(constraint, "constraint became violated");
                self.violated.insert(constraint);
            } else {
                trace!(constraint, "constraint no longer violated");
                self.violated.remove(&constraint);
            }
        }
    }

    /// Re-derives every constraint's status. The search driver runs this
    /// once on entry so that constraints which were born eager (or made
    /// eager by pre-seeding) are queued.
    pub fn check_all(&mut self) {
        for constraint in 0..self.constraints.len() {
            self.check(constraint);
        }
    }

    /// Pushes a new undo frame.
    pub fn push(&mut self) {
        self.trail.push(Vec::new());
        trace!(depth = self.depth(), "push");
    }

    /// Pops one frame, undoing its assignments in reverse order, and
    /// returns true; returns false (doing nothing) at the bottom frame.
    pub fn pop(&mut self) -> bool {
        if self.trail.len() <= 1 {
            trace!("pop refused at the bottom frame");
            return false;
        }
        let frame = self.trail.pop().expect("frame stack checked non-empty");
        for (var, prev) in frame.into_iter().rev() {
            self.raw_set(var, prev);
        }
        trace!(depth = self.depth(), "pop");
        debug_assert!(
            self.bookkeeping_is_consistent(),
            "count bookkeeping corrupted across a frame pop"
        );
        true
    }

    /// Repeatedly applies the two forced-assignment rules until nothing
    /// is left to infer (returns true) or some constraint is violated
    /// (returns false, immediately).
    pub fn propagate(&mut self, stats: &mut SearchStats) -> bool {
        if !self.consistent() {
            return false;
        }
        while let Some(constraint) = self.work.pop_front() {
            if !self.propagate_constraint(constraint, stats) {
                return false;
            }
        }
        true
    }

    fn propagate_constraint(&mut self, constraint: ConstraintId, stats: &mut SearchStats) -> bool {
        if !self.consistent() {
            return false;
        }
        let record = &self.constraints[constraint];
        let forced = if record.must_all_be_true() {
            true
        } else if record.must_all_be_false() {
            false
        } else {
            // Stale work-list entry; the constraint settled down since it
            // was queued.
            return true;
        };
        stats.constraint(constraint).propagations += 1;
        let unknowns: Vec<VarId> = record
            .members()
            .iter()
            .copied()
            .filter(|&var| self.vars[var].value.is_unknown())
            .collect();
        for var in unknowns {
            debug!(var, value = forced, "inferred");
            stats.constraint(constraint).inferences += 1;
            if !self.assign(var, forced) {
                // Reporting the contradiction outranks finishing the
                // remaining inferences; the accounting is already right.
                return false;
            }
        }
        true
    }

    /// Recomputes every count from scratch and compares with the
    /// incremental bookkeeping. Debug-assertion fodder for frame-pop
    /// boundaries, where a mistake would corrupt silently.
    fn bookkeeping_is_consistent(&self) -> bool {
        let unknown = self.vars.iter().filter(|v| v.value.is_unknown()).count();
        if unknown != self.n_unknown {
            return false;
        }
        self.constraints.iter().enumerate().all(|(id, record)| {
            let n_true = record
                .members()
                .iter()
                .filter(|&&var| self.vars[var].value == TriBool::True)
                .count();
            let n_unknown = record
                .members()
                .iter()
                .filter(|&&var| self.vars[var].value.is_unknown())
                .count();
            n_true == record.n_true()
                && n_unknown == record.n_unknown()
                && record.is_violated() == self.violated.contains(&id)
        })
    }
}

impl<V, C> Default for State<V, C> {
    fn default() -> Self {
        Self::new()
    }
}
