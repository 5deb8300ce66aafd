//! Simplex Tableau
//!
//! A dense matrix with one row per canonical constraint below the objective row, and columns for
//! the decision variables (in registry order), one slack variable per constraint row, and the
//! right hand side. Row 0 holds the negated objective coefficients, so the objective improves
//! while any of them is negative, and its right hand side is the current objective value.
//!
//! The tableau is the only state mutated while solving; see [`Tableau::pivot`].
//!

mod pivot;
pub mod table;

pub use table::*;

use crate::expression::*;
use crate::util::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Distinct variable names in first-seen order; fixes the decision column order of a tableau.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRegistry {
    names: Vec<String>,
}

impl VariableRegistry {
    /// scan the objective and then each constraint, left to right
    pub fn discover(objective: &Objective, constraints: &[Equation]) -> Self {
        let names = objective
            .variable_terms()
            .filter_map(Term::name)
            .chain(constraints.iter().flat_map(Equation::variable_names))
            .unique()
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<VarIndex> {
        self.names.iter().position(|known| known == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tableau {
    variables: VariableRegistry,
    /// row major, `rows[0]` is the objective row
    rows: Vec<Vec<Coefficient>>,
    /// the basic column of each constraint row, `basis[row - 1]`; starts as the row's own slack
    basis: Vec<ColumnIndex>,
}

/// add `factor * coefficient` of every variable term into its column
fn accumulate(row: &mut [Coefficient], variables: &VariableRegistry, terms: &[Term], factor: Coefficient) {
    for term in terms.iter() {
        if let Some(index) = term.name().and_then(|name| variables.index_of(name)) {
            row[index] += factor * term.coefficient();
        }
    }
}

impl Tableau {
    /// `constraints` must already be canonical: `<=` with variables on the left and one constant on the right
    pub fn build(objective: &Objective, constraints: &[Equation]) -> Self {
        let variables = VariableRegistry::discover(objective, constraints);
        let variable_num = variables.len();
        let constraint_num = constraints.len();
        let width = variable_num + constraint_num + 1;
        let mut rows = Vec::with_capacity(constraint_num + 1);
        let mut objective_row = vec![0.; width];
        accumulate(&mut objective_row, &variables, &objective.terms, -1.);
        objective_row[width - 1] = objective.constant();
        rows.push(objective_row);
        for (index, constraint) in constraints.iter().enumerate() {
            debug_assert_eq!(constraint.operator, Operator::LessEqual, "constraint must be canonical");
            let mut row = vec![0.; width];
            accumulate(&mut row, &variables, &constraint.lhs, 1.);
            row[variable_num + index] = 1.;
            row[width - 1] = constraint.rhs_constant();
            rows.push(row);
        }
        let basis = (0..constraint_num).map(|index| variable_num + index).collect();
        trace!("tableau built with {} rows and {width} columns", constraint_num + 1);
        Self { variables, rows, basis }
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    /// number of rows, including the objective row
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// number of columns, including the right hand side
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn constraint_num(&self) -> usize {
        self.height() - 1
    }

    pub fn variable_num(&self) -> usize {
        self.variables.len()
    }

    pub fn rhs_column(&self) -> ColumnIndex {
        self.width() - 1
    }

    /// slack column owned by a constraint row (`row >= 1`)
    pub fn slack_column(&self, row: RowIndex) -> ColumnIndex {
        self.variable_num() + row - 1
    }

    pub fn get(&self, row: RowIndex, column: ColumnIndex) -> Coefficient {
        self.rows[row][column]
    }

    pub fn rhs(&self, row: RowIndex) -> Coefficient {
        self.rows[row][self.rhs_column()]
    }

    pub fn row(&self, row: RowIndex) -> &[Coefficient] {
        &self.rows[row]
    }

    /// current objective value
    pub fn objective_value(&self) -> Coefficient {
        self.rhs(0)
    }

    pub fn basic_column(&self, row: RowIndex) -> Option<ColumnIndex> {
        row.checked_sub(1).and_then(|index| self.basis.get(index).copied())
    }

    pub fn basic_row(&self, column: ColumnIndex) -> Option<RowIndex> {
        self.basis.iter().position(|&basic| basic == column).map(|index| index + 1)
    }

    /// the row holding the single `1` when the column is exactly a unit vector across all rows
    pub fn unit_row(&self, column: ColumnIndex) -> Option<RowIndex> {
        let mut unit_row = None;
        for (index, row) in self.rows.iter().enumerate() {
            match row[column] {
                value if value == 0. => {}
                value if value == 1. && unit_row.is_none() => unit_row = Some(index),
                _ => return None,
            }
        }
        unit_row
    }

    /// `x`, `s1`, ..., `rhs`
    pub fn column_title(&self, column: ColumnIndex) -> String {
        if column < self.variable_num() {
            self.variables.names()[column].clone()
        } else if column < self.rhs_column() {
            format!("s{}", column - self.variable_num() + 1)
        } else {
            "rhs".to_string()
        }
    }

    /// the objective key for row 0, otherwise the title of the basic column
    pub fn row_title(&self, row: RowIndex) -> String {
        match self.basic_column(row) {
            Some(column) => self.column_title(column),
            None => OBJECTIVE_KEY.to_string(),
        }
    }
}
