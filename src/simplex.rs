//! Two-Phase Simplex
//!
//! [`Solver`] owns the tableau of one problem and drives it to a terminal state:
//! phase 1 clears negative right hand sides left by `>=` and `=` constraints, phase 2 improves
//! the objective with Dantzig's rule and the minimum ratio test, and the extractor reads the
//! value of each variable off the final basis.
//!
//! Ties are broken by scan order everywhere (rows top to bottom, columns left to right, the
//! first strict improvement wins), which keeps repeated solves bit-identical. There is no
//! anti-cycling rule; a pivot budget can be configured to stop degenerate inputs.
//!

use crate::derivative::Derivative;
use crate::error::*;
use crate::expression::*;
use crate::normalize::*;
use crate::parser::*;
use crate::tableau::*;
use crate::trace::*;
use crate::util::*;
use serde::{Deserialize, Serialize};

#[derive(Derivative, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[derivative(Debug, Default(new = "true"))]
#[serde(deny_unknown_fields)]
pub struct SimplexConfig {
    /// stop with [`SimplexError::PivotLimit`] after this many pivots; unlimited by default
    #[serde(default = "simplex_default_configs::max_pivots")]
    pub max_pivots: Option<usize>,
}

pub mod simplex_default_configs {
    pub fn max_pivots() -> Option<usize> {
        None
    }
}

impl SimplexConfig {
    pub fn from_json(config: serde_json::Value) -> SimplexResult<Self> {
        serde_json::from_value(config).map_err(|error| SimplexError::InvalidConfig(error.to_string()))
    }
}

/// Values of every variable at the optimum, in the order the variables were first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub variables: Vec<String>,
    pub values: Vec<Coefficient>,
    pub objective: Coefficient,
}

impl Solution {
    pub fn get(&self, name: &str) -> Option<Coefficient> {
        self.variables
            .iter()
            .position(|variable| variable == name)
            .map(|index| self.values[index])
    }

    /// value of a variable, zero for names the problem never mentioned
    pub fn value_of(&self, name: &str) -> Coefficient {
        self.get(name).unwrap_or(0.)
    }

    pub fn objective(&self) -> Coefficient {
        self.objective
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Coefficient)> {
        self.variables.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// substitute into the original objective and constraints, reporting the first mismatch
    pub fn verify(&self, objective: &Objective, constraints: &[Equation], epsilon: Coefficient) -> Result<(), String> {
        let assignment = |name: &str| self.value_of(name);
        for (name, value) in self.iter() {
            if value < -epsilon {
                return Err(format!("variable `{name}` is negative: {value}"));
            }
        }
        for constraint in constraints.iter() {
            if !constraint.is_satisfied(&assignment, epsilon) {
                let (lhs, rhs) = constraint.evaluate(&assignment);
                return Err(format!("constraint `{constraint}` violated: {lhs} {} {rhs}", constraint.operator));
            }
        }
        let expected = objective.evaluate(&assignment);
        if !approx_eq(expected, self.objective, epsilon) {
            return Err(format!(
                "objective `{objective}` evaluates to {expected} but {} is reported",
                self.objective
            ));
        }
        Ok(())
    }
}

impl From<&Solution> for serde_json::Value {
    /// the flat mapping of variable names to values, with the optimum under `max`
    fn from(solution: &Solution) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in solution.iter() {
            map.insert(name.to_string(), json!(value));
        }
        map.insert(OBJECTIVE_KEY.to_string(), json!(solution.objective));
        serde_json::Value::Object(map)
    }
}

/// One linear program and its tableau, from construction to a terminal state.
#[derive(Debug, Clone)]
pub struct Solver {
    objective: Objective,
    /// as written, before any operator expansion
    constraints: Vec<Equation>,
    tableau: Tableau,
    config: SimplexConfig,
    /// pivots performed so far in both phases
    pivots: usize,
}

impl Solver {
    /// parse the objective and every constraint; nothing is built when any line is malformed
    pub fn new<S: AsRef<str>>(objective: &str, constraints: &[S]) -> SimplexResult<Self> {
        let objective = parse_objective(objective)?;
        let constraints = parse_constraints(constraints)?;
        Ok(Self::from_equations(objective, constraints))
    }

    pub fn from_equations(objective: Objective, constraints: Vec<Equation>) -> Self {
        let tableau = Tableau::build(&objective, &canonical_constraints(&constraints));
        Self {
            objective,
            constraints,
            tableau,
            config: SimplexConfig::new(),
            pivots: 0,
        }
    }

    pub fn with_config(mut self, config: SimplexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn pivots(&self) -> usize {
        self.pivots
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn constraints(&self) -> &[Equation] {
        &self.constraints
    }

    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    fn pivot(
        &mut self,
        phase: Phase,
        row: RowIndex,
        column: ColumnIndex,
        tracer: &mut dyn PivotTracer,
    ) -> SimplexResult<()> {
        if let Some(max_pivots) = self.config.max_pivots {
            if self.pivots >= max_pivots {
                return Err(SimplexError::PivotLimit(max_pivots));
            }
        }
        let event = PivotEvent {
            phase,
            row,
            column,
            pivot_value: self.tableau.get(row, column),
        };
        debug!(
            "{phase} pivot #{} at row {row}, column {} on {}",
            self.pivots,
            self.tableau.column_title(column),
            event.pivot_value
        );
        self.tableau.pivot(row, column)?;
        self.pivots += 1;
        tracer.after_pivot(&event, &self.tableau);
        Ok(())
    }

    /// the first constraint row with a negative right hand side
    fn infeasible_row(&self) -> Option<RowIndex> {
        (1..self.tableau.height()).find(|&row| self.tableau.rhs(row) < 0.)
    }

    /// Pivot until no constraint row has a negative right hand side.
    ///
    /// The entering column is the first decision variable with a negative entry in the
    /// first infeasible row; when that row has none the problem is reported infeasible.
    /// Slack columns are never considered, so some feasible problems whose first infeasible
    /// row only has negative slack entries are reported as [`SimplexError::Infeasible`] too.
    pub fn run_phase1(&mut self, tracer: &mut dyn PivotTracer) -> SimplexResult<()> {
        while let Some(row) = self.infeasible_row() {
            let column = (0..self.tableau.variable_num())
                .find(|&column| self.tableau.get(row, column) < 0.)
                .ok_or(SimplexError::Infeasible)?;
            self.pivot(Phase::Feasibility, row, column, tracer)?;
        }
        Ok(())
    }

    /// the most negative objective row entry, the leftmost one on ties
    fn entering_column(&self) -> Option<ColumnIndex> {
        let mut entering: Option<(ColumnIndex, Coefficient)> = None;
        for column in 0..self.tableau.rhs_column() {
            let value = self.tableau.get(0, column);
            if value < 0. && entering.map_or(true, |(_, best)| value < best) {
                entering = Some((column, value));
            }
        }
        entering.map(|(column, _)| column)
    }

    /// minimum ratio test over rows with a positive entry, the topmost one on ties
    fn leaving_row(&self, column: ColumnIndex) -> Option<RowIndex> {
        let mut leaving: Option<(RowIndex, Coefficient)> = None;
        for row in 1..self.tableau.height() {
            let coefficient = self.tableau.get(row, column);
            if coefficient <= 0. {
                continue;
            }
            let ratio = self.tableau.rhs(row) / coefficient;
            if ratio >= 0. && leaving.map_or(true, |(_, best)| ratio < best) {
                leaving = Some((row, ratio));
            }
        }
        leaving.map(|(row, _)| row)
    }

    /// Pivot until the objective row has no negative entry.
    pub fn run_phase2(&mut self, tracer: &mut dyn PivotTracer) -> SimplexResult<()> {
        while let Some(column) = self.entering_column() {
            let row = self.leaving_row(column).ok_or(SimplexError::Unbounded)?;
            self.pivot(Phase::Optimality, row, column, tracer)?;
        }
        Ok(())
    }

    /// Read the current basis: a basic variable takes the right hand side of its row, the others are zero.
    pub fn extract_solution(&self) -> Solution {
        let tableau = &self.tableau;
        let values = (0..tableau.variable_num())
            .map(|column| match tableau.basic_row(column) {
                Some(row) => {
                    debug_assert_eq!(tableau.unit_row(column), Some(row), "basic column must be a unit vector");
                    tableau.rhs(row) + 0.
                }
                None => 0.,
            })
            .collect();
        Solution {
            variables: tableau.variables().names().to_vec(),
            values,
            objective: tableau.objective_value() + 0.,
        }
    }

    pub fn solve(&mut self) -> SimplexResult<Solution> {
        self.solve_traced(&mut NoTrace)
    }

    /// run both phases, reporting the initial tableau and every pivot to `tracer`
    pub fn solve_traced(&mut self, tracer: &mut dyn PivotTracer) -> SimplexResult<Solution> {
        tracer.initial(&self.tableau);
        let result = self
            .run_phase1(tracer)
            .and_then(|_| self.run_phase2(tracer))
            .map(|_| self.extract_solution());
        match &result {
            Ok(solution) => info!("optimal value {} after {} pivots", solution.objective, self.pivots),
            Err(error) => info!("no optimum after {} pivots: {error}", self.pivots),
        }
        result
    }
}

/// Maximize `objective` subject to every line of `constraints`, all variables being non-negative.
///
/// ```
/// use eqsimplex::simplex::maximize;
/// let solution = maximize("a + 2b", &["a + b <= 300", "b = 2c", "c <= 50"]).unwrap();
/// assert!((solution.objective() - 400.).abs() < 1e-6);
/// assert!((solution.get("c").unwrap() - 50.).abs() < 1e-6);
/// ```
pub fn maximize<S: AsRef<str>>(objective: &str, constraints: &[S]) -> SimplexResult<Solution> {
    Solver::new(objective, constraints)?.solve()
}
