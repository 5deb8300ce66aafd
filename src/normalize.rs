//! Equation Normalizer
//!
//! Every constraint ends up as `variables <= constant` before it reaches the tableau:
//! `>=` is turned around, `=` becomes a `<=` and a `>=` half, and then variable terms are
//! gathered on the left and the constants summed on the right.
//!

use crate::expression::*;
use crate::util::*;

impl Equation {
    /// swap the sides so that `a >= b` reads `b <= a`; equations keep their operator
    pub fn flipped(&self) -> Self {
        let operator = match self.operator {
            Operator::LessEqual => Operator::GreaterEqual,
            Operator::GreaterEqual => Operator::LessEqual,
            Operator::Equal => Operator::Equal,
        };
        Self::new(self.rhs.clone(), operator, self.lhs.clone())
    }

    /// equivalent `<=` constraints; an equation yields the `<=` half followed by the `>=` half
    pub fn to_maximizations(&self) -> Vec<Self> {
        match self.operator {
            Operator::LessEqual => vec![self.clone()],
            Operator::GreaterEqual => vec![self.flipped()],
            Operator::Equal => {
                let less_than = Self::new(self.lhs.clone(), Operator::LessEqual, self.rhs.clone());
                let greater_than = Self::new(self.lhs.clone(), Operator::GreaterEqual, self.rhs.clone());
                vec![less_than, greater_than.flipped()]
            }
        }
    }

    /// variables on the left in order of appearance (left side first), a single constant on the right
    pub fn normalized(&self) -> Self {
        let lhs: Vec<Term> = self
            .lhs
            .iter()
            .filter(|term| term.is_variable())
            .cloned()
            .chain(self.rhs.iter().filter(|term| term.is_variable()).map(Term::negated))
            .collect();
        let constant: Coefficient = self
            .rhs
            .iter()
            .filter(|term| !term.is_variable())
            .map(Term::coefficient)
            .chain(
                self.lhs
                    .iter()
                    .filter(|term| !term.is_variable())
                    .map(|term| -term.coefficient()),
            )
            .sum();
        Self::new(lhs, self.operator, vec![Term::Constant(constant)])
    }

    /// the summed constant of the right side, zero when there is none
    pub fn rhs_constant(&self) -> Coefficient {
        self.rhs.iter().filter(|term| !term.is_variable()).map(Term::coefficient).sum()
    }
}

/// expand operators and normalize, in input order
pub fn canonical_constraints(constraints: &[Equation]) -> Vec<Equation> {
    constraints
        .iter()
        .flat_map(Equation::to_maximizations)
        .map(|equation| equation.normalized())
        .collect()
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::parser::*;

    fn var(coefficient: Coefficient, name: &str) -> Term {
        Term::variable(coefficient, name)
    }

    #[test]
    fn normalize_moves_terms() {
        // cargo test normalize_moves_terms -- --nocapture
        let equation = parse_constraint("bcp + 5489699 + bfo + 16838158 <= 474168386 - x").unwrap();
        let normalized = equation.normalized();
        assert_eq!(normalized.lhs, vec![var(1., "bcp"), var(1., "bfo"), var(1., "x")]);
        assert_eq!(normalized.operator, Operator::LessEqual);
        assert_eq!(normalized.rhs, vec![Term::Constant(474168386. - 5489699. - 16838158.)]);
    }

    #[test]
    fn normalize_without_constants() {
        // cargo test normalize_without_constants -- --nocapture
        let normalized = parse_constraint("b <= 2c").unwrap().normalized();
        assert_eq!(normalized.lhs, vec![var(1., "b"), var(-2., "c")]);
        assert_eq!(normalized.rhs, vec![Term::Constant(0.)]);
    }

    #[test]
    fn normalize_is_idempotent() {
        // cargo test normalize_is_idempotent -- --nocapture
        for text in ["3x + 4 - y >= 2z - 1", "a = 2b + 7", "x1 + x2 - x3 >= -3", "<= 5"] {
            let once = parse_constraint(text).unwrap().normalized();
            let twice = once.normalized();
            assert_eq!(once.lhs, twice.lhs, "{text}");
            assert_eq!(once.rhs_constant(), twice.rhs_constant(), "{text}");
        }
    }

    #[test]
    fn normalize_greater_equal_flips() {
        // cargo test normalize_greater_equal_flips -- --nocapture
        let expanded = parse_constraint("a >= 600").unwrap().to_maximizations();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].operator, Operator::LessEqual);
        let normalized = expanded[0].normalized();
        assert_eq!(normalized.lhs, vec![var(-1., "a")]);
        assert_eq!(normalized.rhs_constant(), -600.);
        // both sides hold variables
        let expanded = parse_constraint("a >= b").unwrap().to_maximizations();
        assert_eq!(expanded[0].normalized().lhs, vec![var(1., "b"), var(-1., "a")]);
    }

    #[test]
    fn normalize_equal_expands_to_two() {
        // cargo test normalize_equal_expands_to_two -- --nocapture
        let expanded = parse_constraint("b = 2c").unwrap().to_maximizations();
        assert_eq!(expanded.len(), 2);
        assert!(expanded.iter().all(|equation| equation.operator == Operator::LessEqual));
        assert_eq!(expanded[0].normalized().lhs, vec![var(1., "b"), var(-2., "c")]);
        assert_eq!(expanded[1].normalized().lhs, vec![var(2., "c"), var(-1., "b")]);
    }

    #[test]
    fn normalize_less_equal_unchanged() {
        // cargo test normalize_less_equal_unchanged -- --nocapture
        let equation = parse_constraint("3x + 2y <= 10").unwrap();
        assert_eq!(equation.to_maximizations(), vec![equation.clone()]);
        assert_eq!(equation.normalized(), equation);
    }

    #[test]
    fn normalize_canonical_constraints() {
        // cargo test normalize_canonical_constraints -- --nocapture
        let constraints = parse_constraints(&["a + b <= 300", "b = 2c", "c >= 50"]).unwrap();
        let canonical = canonical_constraints(&constraints);
        assert_eq!(canonical.len(), 4);
        let constants: Vec<Coefficient> = canonical.iter().map(Equation::rhs_constant).collect();
        assert_eq!(constants, vec![300., 0., 0., -50.]);
    }
}
