use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub type Coefficient = f64;
pub type RowIndex = usize;
pub type ColumnIndex = usize;
pub type VarIndex = usize;

/// tolerance for comparing solver output against substituted or expected values;
/// the pivoting itself compares signs exactly
pub const EPSILON: Coefficient = 1e-6;

/// key under which the optimal objective value is reported next to the variables
pub const OBJECTIVE_KEY: &str = "max";

/// absolute comparison below magnitude 1, relative above it
pub fn approx_eq(a: Coefficient, b: Coefficient, epsilon: Coefficient) -> bool {
    let scale = Coefficient::max(1., Coefficient::max(a.abs(), b.abs()));
    (a - b).abs() <= epsilon * scale
}

/// print a coefficient without the noise of the last few bits, and never as `-0`
pub fn pretty_coefficient(value: Coefficient) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0. {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// A randomly generated problem in text form.
///
/// Without lower bounds it is always feasible (the origin satisfies every `<=` row, all of which
/// have a positive right hand side) and bounded (the last row caps the sum of all variables).
/// Lower bounds add `>=` rows which require phase 1 and may make the problem infeasible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomProblem {
    pub objective: String,
    pub constraints: Vec<String>,
}

impl RandomProblem {
    pub fn generate<R: Rng>(rng: &mut R, variable_num: usize, constraint_num: usize, lower_bound_num: usize) -> Self {
        assert!(variable_num > 0, "at least one variable is required");
        let names: Vec<String> = (1..=variable_num).map(|index| format!("x{index}")).collect();
        let objective = names
            .iter()
            .map(|name| format!("{:.2}{name}", rng.gen_range(1.0..10.0)))
            .join(" + ");
        let mut constraints = Vec::with_capacity(constraint_num + lower_bound_num + 1);
        for _ in 0..constraint_num {
            let mut terms = vec![];
            for name in names.iter() {
                if rng.gen_bool(0.7) {
                    terms.push(format!("{:.2}{name}", rng.gen_range(0.5..10.0)));
                }
            }
            if terms.is_empty() {
                let name = &names[rng.gen_range(0..names.len())];
                terms.push(format!("{:.2}{name}", rng.gen_range(0.5..10.0)));
            }
            constraints.push(format!("{} <= {:.2}", terms.join(" + "), rng.gen_range(10.0..100.0)));
        }
        constraints.push(format!("{} <= 1000", names.join(" + ")));
        for _ in 0..lower_bound_num {
            let name = &names[rng.gen_range(0..names.len())];
            constraints.push(format!("{name} >= {:.2}", rng.gen_range(0.5..2.0)));
        }
        Self { objective, constraints }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn util_approx_eq() {
        // cargo test util_approx_eq -- --nocapture
        assert!(approx_eq(0.1 + 0.2, 0.3, EPSILON));
        assert!(!approx_eq(1., 1.001, EPSILON));
        assert!(approx_eq(1527659.5860410, 1527659.5860420, EPSILON));
        assert!(!approx_eq(1527659., 1527669., EPSILON));
    }

    #[test]
    fn util_pretty_coefficient() {
        // cargo test util_pretty_coefficient -- --nocapture
        assert_eq!(pretty_coefficient(-0.), "0");
        assert_eq!(pretty_coefficient(6.500000000000002), "6.5");
        assert_eq!(pretty_coefficient(-1e-12), "0");
        assert_eq!(pretty_coefficient(708.), "708");
    }

    #[test]
    fn util_random_problem_shape() {
        // cargo test util_random_problem_shape -- --nocapture
        let mut rng = SmallRng::seed_from_u64(7);
        let problem = RandomProblem::generate(&mut rng, 4, 3, 2);
        println!("{problem:?}");
        assert_eq!(problem.constraints.len(), 3 + 1 + 2);
        assert_eq!(problem.objective.matches('x').count(), 4);
        assert_eq!(problem.constraints[3], "x1 + x2 + x3 + x4 <= 1000");
        assert!(problem.constraints[4].contains(">="));
        // the same seed always produces the same problem
        let mut rng = SmallRng::seed_from_u64(7);
        let again = RandomProblem::generate(&mut rng, 4, 3, 2);
        assert_eq!(problem.objective, again.objective);
        assert_eq!(problem.constraints, again.constraints);
    }
}
