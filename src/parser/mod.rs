//! Equation Parser
//!
//! Reads a single line such as `3x + 2y <= 10` into an [`Equation`], or an objective such as
//! `x + 2y - z` into an [`Objective`]. All whitespace is removed first, so `1 0x` reads as `10x`.
//! A term is either a number or an optional number followed by a variable name that starts with a
//! letter; terms are joined by signs, and every `-` flips the sign of the term that follows it.
//!

use crate::error::*;
use crate::expression::*;
use crate::util::*;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;

mod equation_parser {
    #[derive(Parser)]
    #[grammar = "parser/grammar.pest"]
    pub struct EquationParser;
}

use equation_parser::*;

/// Folding state over the tokens of one side: the sign waiting for the next term and the terms so far.
#[derive(Debug, Clone, PartialEq)]
struct SideAccumulator {
    sign: Coefficient,
    terms: Vec<Term>,
}

impl SideAccumulator {
    fn new() -> Self {
        Self { sign: 1., terms: vec![] }
    }

    /// `text` is the line being parsed, only used for error reporting
    fn absorb(self, pair: Pair<Rule>, text: &str) -> SimplexResult<Self> {
        let Self { sign, mut terms } = self;
        match pair.as_rule() {
            Rule::sign => {
                let sign = if pair.as_str() == "-" { -sign } else { sign };
                Ok(Self { sign, terms })
            }
            Rule::variable_term => {
                let mut coefficient = 1.;
                let mut name = "";
                for inner in pair.into_inner() {
                    match inner.as_rule() {
                        Rule::number => coefficient = parse_number(inner.as_str(), text)?,
                        Rule::identifier => name = inner.as_str(),
                        rule => unreachable!("unexpected rule {rule:?} in a variable term"),
                    }
                }
                if name == OBJECTIVE_KEY {
                    return Err(SimplexError::ReservedVariable(name.to_string()));
                }
                terms.push(Term::variable(sign * coefficient, name));
                Ok(Self { sign: 1., terms })
            }
            Rule::constant_term => {
                let value = parse_number(pair.as_str(), text)?;
                terms.push(Term::Constant(sign * value));
                Ok(Self { sign: 1., terms })
            }
            Rule::EOI => Ok(Self { sign, terms }),
            rule => unreachable!("unexpected rule {rule:?} in an expression"),
        }
    }
}

/// literals too large for a finite coefficient are malformed
fn parse_number(number: &str, text: &str) -> SimplexResult<Coefficient> {
    let malformed = || SimplexError::MalformedTerm {
        text: text.to_string(),
        term: number.to_string(),
    };
    let value: Coefficient = number.parse().map_err(|_| malformed())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(malformed())
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// the sign-delimited piece of `side` around the position where parsing failed
fn offending_term(side: &str, error: &pest::error::Error<Rule>) -> String {
    let position = match error.location {
        InputLocation::Pos(position) => position,
        InputLocation::Span((start, _)) => start,
    }
    .min(side.len());
    let is_sign = |c: char| c == '+' || c == '-';
    let start = side[..position].rfind(is_sign).map(|index| index + 1).unwrap_or(0);
    let end = side[position..].find(is_sign).map(|index| position + index).unwrap_or(side.len());
    if start < end {
        side[start..end].to_string()
    } else {
        side.to_string()
    }
}

/// `side` has no whitespace; `text` is the original line for error messages
fn parse_side(side: &str, text: &str) -> SimplexResult<Vec<Term>> {
    let pairs = EquationParser::parse(Rule::side, side).map_err(|error| SimplexError::MalformedTerm {
        text: text.to_string(),
        term: offending_term(side, &error),
    })?;
    pairs
        .flat_map(|pair| pair.into_inner())
        .try_fold(SideAccumulator::new(), |accumulator, pair| accumulator.absorb(pair, text))
        .map(|accumulator| accumulator.terms)
}

/// terms of an expression without any relational operator
pub fn parse_expression(text: &str) -> SimplexResult<Vec<Term>> {
    parse_side(&strip_whitespace(text), text)
}

pub fn parse_objective(text: &str) -> SimplexResult<Objective> {
    Ok(Objective::new(parse_expression(text)?))
}

/// the first operator of [`Operator::SEARCH_ORDER`] present in `condensed`, with its byte offset
pub fn find_operator(condensed: &str) -> Option<(Operator, usize)> {
    Operator::SEARCH_ORDER
        .iter()
        .find_map(|operator| condensed.find(operator.symbol()).map(|index| (*operator, index)))
}

pub fn parse_constraint(text: &str) -> SimplexResult<Equation> {
    let condensed = strip_whitespace(text);
    let (operator, index) =
        find_operator(&condensed).ok_or_else(|| SimplexError::MalformedConstraint(text.to_string()))?;
    let lhs = parse_side(&condensed[..index], text)?;
    let rhs = parse_side(&condensed[index + operator.symbol().len()..], text)?;
    Ok(Equation::new(lhs, operator, rhs))
}

/// parse every line, stopping at the first malformed one
pub fn parse_constraints<S: AsRef<str>>(texts: &[S]) -> SimplexResult<Vec<Equation>> {
    texts.iter().map(|text| parse_constraint(text.as_ref())).collect()
}
