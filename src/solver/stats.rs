use std::collections::HashMap;

use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

use crate::solver::state::{ConstraintId, State};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerConstraintStats {
    /// Times the constraint was taken off the work list while eager.
    pub propagations: u64,
    /// Forced assignments it performed.
    pub inferences: u64,
}

/// Counters accumulated over one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub guesses: u64,
    pub dead_ends: u64,
    pub solutions: u64,
    pub max_depth: usize,
    pub constraint_stats: HashMap<ConstraintId, PerConstraintStats>,
}

impl SearchStats {
    pub fn constraint(&mut self, id: ConstraintId) -> &mut PerConstraintStats {
        self.constraint_stats.entry(id).or_default()
    }
}

/// Renders a per-constraint summary of where the work went.
pub fn render_stats_table<V, C: std::fmt::Debug>(
    stats: &SearchStats,
    state: &State<V, C>,
) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Constraint"),
        Cell::new("Bounds"),
        Cell::new("Members"),
        Cell::new("Propagations"),
        Cell::new("Inferences"),
    ]));

    let empty = PerConstraintStats::default();
    for id in state.constraint_ids() {
        let record = state.constraint(id);
        let per = stats.constraint_stats.get(&id).unwrap_or(&empty);
        let bounds = match record.max_true() {
            Some(max) => format!("{}..={}", record.min_true(), max),
            None => format!("{}..", record.min_true()),
        };
        table.add_row(Row::new(vec![
            Cell::new(&format!("#{id} {:?}", record.payload())),
            Cell::new(&bounds),
            Cell::new(&record.members().len().to_string()),
            Cell::new(&per.propagations.to_string()),
            Cell::new(&per.inferences.to_string()),
        ]));
    }

    table.to_string()
}
