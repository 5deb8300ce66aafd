//! Errors raised while parsing and solving a linear program.

use crate::util::*;
use thiserror::Error;

pub type SimplexResult<T> = std::result::Result<T, SimplexError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplexError {
    /// a constraint line without any of `>=`, `<=` or `=`
    #[error("malformed constraint `{0}`: expected one of `>=`, `<=`, `=`")]
    MalformedConstraint(String),

    /// a piece of an expression that is neither a number nor an optionally scaled variable
    #[error("malformed term `{term}` in `{text}`")]
    MalformedTerm { text: String, term: String },

    /// the name is used as the key of the objective value in a solution
    #[error("variable name `{0}` is reserved for the objective value")]
    ReservedVariable(String),

    #[error("no assignment satisfies every constraint")]
    Infeasible,

    #[error("the objective can be increased without bound")]
    Unbounded,

    /// the drivers never select a zero pivot; seeing this means an invariant is broken
    #[error("pivot on a zero entry at row {row}, column {column}")]
    DegeneratePivot { row: RowIndex, column: ColumnIndex },

    /// the objective row, the right hand side or a position outside the tableau
    #[error("cannot pivot at row {row}, column {column}")]
    InvalidPivot { row: RowIndex, column: ColumnIndex },

    #[error("no terminal state reached within {0} pivots")]
    PivotLimit(usize),

    #[error("invalid solver config: {0}")]
    InvalidConfig(String),
}

impl SimplexError {
    /// whether the input was understood but has no optimal assignment
    pub fn is_no_solution(&self) -> bool {
        matches!(self, Self::Infeasible | Self::Unbounded)
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedConstraint(_) | Self::MalformedTerm { .. } | Self::ReservedVariable(_)
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        // cargo test error_messages -- --nocapture
        let error = SimplexError::MalformedTerm {
            text: "2*x<=4".to_string(),
            term: "2*x".to_string(),
        };
        assert_eq!(error.to_string(), "malformed term `2*x` in `2*x<=4`");
        assert_eq!(
            SimplexError::DegeneratePivot { row: 1, column: 3 }.to_string(),
            "pivot on a zero entry at row 1, column 3"
        );
        assert!(error.is_parse_error());
        assert!(!error.is_no_solution());
        assert!(SimplexError::Infeasible.is_no_solution());
        assert!(SimplexError::Unbounded.is_no_solution());
        assert!(!SimplexError::PivotLimit(10).is_no_solution());
        assert_eq!(
            SimplexError::InvalidPivot { row: 0, column: 2 }.to_string(),
            "cannot pivot at row 0, column 2"
        );
    }
}
