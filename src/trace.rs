//! Pivot Tracing
//!
//! An optional sink the solver reports to after building the tableau and after every pivot.
//! Tracing only observes; the default [`NoTrace`] does nothing and the results never depend on it.
//!

use crate::tableau::*;
use crate::util::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// clearing negative right hand sides
    Feasibility,
    /// improving the objective row
    Optimality,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feasibility => f.write_str("phase 1"),
            Self::Optimality => f.write_str("phase 2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotEvent {
    pub phase: Phase,
    pub row: RowIndex,
    pub column: ColumnIndex,
    /// the entry divided by, read before the pivot
    pub pivot_value: Coefficient,
}

pub trait PivotTracer {
    /// called once with the tableau as built
    fn initial(&mut self, _tableau: &Tableau) {}
    /// called with the tableau right after the pivot described by `event`
    fn after_pivot(&mut self, _event: &PivotEvent, _tableau: &Tableau) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl PivotTracer for NoTrace {}

/// print every tableau to stdout, highlighting the pivot that produced it
#[derive(Debug, Clone, Default)]
pub struct PrintTracer;

impl PivotTracer for PrintTracer {
    fn initial(&mut self, tableau: &Tableau) {
        println!("initial tableau");
        tableau.printstd();
    }

    fn after_pivot(&mut self, event: &PivotEvent, tableau: &Tableau) {
        println!(
            "{} pivot on {} at row {}, column {}",
            event.phase,
            pretty_coefficient(event.pivot_value),
            event.row,
            tableau.column_title(event.column)
        );
        VizTable::highlighted(tableau, Some((event.row, event.column))).printstd();
    }
}

/// keep every intermediate tableau as JSON
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableauRecorder {
    pub snapshots: Vec<serde_json::Value>,
}

impl TableauRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&serde_json::Value> {
        self.snapshots.last()
    }
}

impl PivotTracer for TableauRecorder {
    fn initial(&mut self, tableau: &Tableau) {
        let table: serde_json::Value = VizTable::new(tableau).into();
        self.snapshots.push(json!({
            "name": "initial",
            "table": table,
        }));
    }

    fn after_pivot(&mut self, event: &PivotEvent, tableau: &Tableau) {
        let table: serde_json::Value = VizTable::new(tableau).into();
        self.snapshots.push(json!({
            "name": format!("{} pivot", event.phase),
            "pivot": [event.row, event.column],
            "pivot_value": event.pivot_value,
            "table": table,
        }));
    }
}
