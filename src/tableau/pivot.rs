//! Pivot Engine
//!
//! The single row reduction both phases are built on.
//!

use super::Tableau;
use crate::error::*;
use crate::util::*;

impl Tableau {
    /// Make the entry at `(row, column)` exactly 1 and every other entry of `column` exactly 0,
    /// so that `column` becomes the basic column of `row`.
    ///
    /// Dividing the pivot row by its own pivot yields an exact 1, and subtracting `ratio * 1`
    /// from `ratio` yields an exact 0, which is what lets callers recognize basic columns by
    /// comparing with `1.` and `0.` directly.
    ///
    /// Only constraint rows and variable or slack columns can be pivoted on; anything else is
    /// [`SimplexError::InvalidPivot`] and leaves the tableau untouched.
    pub fn pivot(&mut self, row: RowIndex, column: ColumnIndex) -> SimplexResult<()> {
        if row == 0 || row >= self.height() || column >= self.rhs_column() {
            return Err(SimplexError::InvalidPivot { row, column });
        }
        let pivot = self.rows[row][column];
        if pivot == 0. {
            return Err(SimplexError::DegeneratePivot { row, column });
        }
        let mut pivot_row = std::mem::take(&mut self.rows[row]);
        for value in pivot_row.iter_mut() {
            *value /= pivot;
        }
        for (index, target) in self.rows.iter_mut().enumerate() {
            if index == row {
                continue;
            }
            let ratio = target[column];
            if ratio == 0. {
                continue;
            }
            for (value, source) in target.iter_mut().zip(pivot_row.iter()) {
                *value -= ratio * source;
            }
        }
        self.rows[row] = pivot_row;
        self.basis[row - 1] = column;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::super::tests::build_tableau;
    use super::*;

    #[test]
    fn pivot_makes_unit_column() {
        // cargo test pivot_makes_unit_column -- --nocapture
        let mut tableau = build_tableau("3x + y", &["2x + y <= 8", "2x + 3y <= 12"]);
        tableau.pivot(1, 0).unwrap();
        assert_eq!(tableau.row(1), &[1., 0.5, 0.5, 0., 4.]);
        assert_eq!(tableau.row(2), &[0., 2., -1., 1., 4.]);
        assert_eq!(tableau.row(0), &[0., 0.5, 1.5, 0., 12.]);
        assert_eq!(tableau.unit_row(0), Some(1));
        assert_eq!(tableau.basic_column(1), Some(0));
        assert_eq!(tableau.basic_row(2), None);
        assert_eq!(tableau.objective_value(), 12.);
    }

    #[test]
    fn pivot_keeps_other_basic_columns() {
        // cargo test pivot_keeps_other_basic_columns -- --nocapture
        let mut tableau = build_tableau("x + 2y - z", &["2x + y + z <= 14", "4x + 2y + 3z <= 28", "2x + 5y + 5z <= 30"]);
        tableau.pivot(3, 1).unwrap();
        tableau.pivot(1, 0).unwrap();
        assert_eq!(tableau.unit_row(1), Some(3));
        assert_eq!(tableau.unit_row(0), Some(1));
        assert_eq!(tableau.unit_row(tableau.slack_column(2)), Some(2));
        assert_eq!(tableau.basic_column(3), Some(1));
    }

    #[test]
    fn pivot_on_zero_fails() {
        // cargo test pivot_on_zero_fails -- --nocapture
        let mut tableau = build_tableau("x + y", &["x <= 1", "y <= 2"]);
        let before = tableau.clone();
        assert_eq!(tableau.pivot(1, 1), Err(SimplexError::DegeneratePivot { row: 1, column: 1 }));
        assert_eq!(tableau, before);
    }

    #[test]
    fn pivot_outside_constraint_rows_fails() {
        // cargo test pivot_outside_constraint_rows_fails -- --nocapture
        let mut tableau = build_tableau("x + y", &["x <= 1", "y <= 2"]);
        let before = tableau.clone();
        for (row, column) in [(0, 0), (3, 0), (1, 4), (1, 9)] {
            assert_eq!(tableau.pivot(row, column), Err(SimplexError::InvalidPivot { row, column }));
        }
        assert_eq!(tableau, before);
    }
}
