//! Expression Model
//!
//! Value objects for what a line of text describes: signed terms, the relational operator between
//! two sides of a constraint, and the objective. They carry no tableau information; the tableau is
//! built from them once and they are dropped afterwards.
//!

use crate::util::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// assignment lookup used when evaluating an expression; unknown names should evaluate to zero
pub type Assignment<'a> = &'a dyn Fn(&str) -> Coefficient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    /// a pure number
    Constant(Coefficient),
    /// coefficient times a named variable
    Variable(Coefficient, String),
}

impl Term {
    pub fn variable(coefficient: Coefficient, name: impl Into<String>) -> Self {
        Self::Variable(coefficient, name.into())
    }

    pub fn coefficient(&self) -> Coefficient {
        match self {
            Self::Constant(value) => *value,
            Self::Variable(coefficient, _) => *coefficient,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Constant(_) => None,
            Self::Variable(_, name) => Some(name.as_str()),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(..))
    }

    pub fn scaled(&self, factor: Coefficient) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(value * factor),
            Self::Variable(coefficient, name) => Self::Variable(coefficient * factor, name.clone()),
        }
    }

    pub fn negated(&self) -> Self {
        self.scaled(-1.)
    }

    pub fn evaluate(&self, assignment: Assignment) -> Coefficient {
        match self {
            Self::Constant(value) => *value,
            Self::Variable(coefficient, name) => coefficient * assignment(name),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Variable(coefficient, name) if *coefficient == 1. => write!(f, "{name}"),
            Self::Variable(coefficient, name) if *coefficient == -1. => write!(f, "-{name}"),
            Self::Variable(coefficient, name) => write!(f, "{coefficient}{name}"),
        }
    }
}

pub fn evaluate_terms(terms: &[Term], assignment: Assignment) -> Coefficient {
    terms.iter().map(|term| term.evaluate(assignment)).sum()
}

/// render a side as `3x + 2y - 4`; an empty side is `0`
pub fn format_terms(terms: &[Term]) -> String {
    let mut text = String::new();
    for (index, term) in terms.iter().enumerate() {
        let rendered = term.to_string();
        match (index, rendered.strip_prefix('-')) {
            (0, _) => text.push_str(&rendered),
            (_, Some(positive)) => {
                text.push_str(" - ");
                text.push_str(positive);
            }
            (_, None) => {
                text.push_str(" + ");
                text.push_str(&rendered);
            }
        }
    }
    if text.is_empty() {
        text.push('0');
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "=")]
    Equal,
}

impl Operator {
    /// `=` is a substring of the other two, so it is searched for last
    pub const SEARCH_ORDER: [Operator; 3] = [Operator::GreaterEqual, Operator::LessEqual, Operator::Equal];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
        }
    }

    pub fn holds(&self, lhs: Coefficient, rhs: Coefficient, epsilon: Coefficient) -> bool {
        let scale = Coefficient::max(1., Coefficient::max(lhs.abs(), rhs.abs()));
        match self {
            Self::LessEqual => lhs <= rhs + epsilon * scale,
            Self::GreaterEqual => lhs + epsilon * scale >= rhs,
            Self::Equal => approx_eq(lhs, rhs, epsilon),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub lhs: Vec<Term>,
    pub operator: Operator,
    pub rhs: Vec<Term>,
}

impl Equation {
    pub fn new(lhs: Vec<Term>, operator: Operator, rhs: Vec<Term>) -> Self {
        Self { lhs, operator, rhs }
    }

    /// values of the left and right side under the assignment
    pub fn evaluate(&self, assignment: Assignment) -> (Coefficient, Coefficient) {
        (evaluate_terms(&self.lhs, assignment), evaluate_terms(&self.rhs, assignment))
    }

    pub fn is_satisfied(&self, assignment: Assignment, epsilon: Coefficient) -> bool {
        let (lhs, rhs) = self.evaluate(assignment);
        self.operator.holds(lhs, rhs, epsilon)
    }

    /// names of the variables on both sides, left side first, with repetitions
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.lhs.iter().chain(self.rhs.iter()).filter_map(Term::name)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", format_terms(&self.lhs), self.operator, format_terms(&self.rhs))
    }
}

/// the expression to maximize
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub terms: Vec<Term>,
}

impl Objective {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// sum of the constant terms, which offsets the optimum but never moves it
    pub fn constant(&self) -> Coefficient {
        self.terms.iter().filter(|term| !term.is_variable()).map(Term::coefficient).sum()
    }

    pub fn variable_terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter().filter(|term| term.is_variable())
    }

    pub fn evaluate(&self, assignment: Assignment) -> Coefficient {
        evaluate_terms(&self.terms, assignment)
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_terms(&self.terms))
    }
}
