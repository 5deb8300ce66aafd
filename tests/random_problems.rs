use eqsimplex::error::*;
use eqsimplex::simplex::*;
use eqsimplex::util::*;
use more_asserts::assert_le;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use test_case::test_case;

const ROUNDS: usize = 200;

fn budget() -> SimplexConfig {
    SimplexConfig {
        max_pivots: Some(10000),
    }
}

/// origin-feasible and bounded problems always reach an optimum that satisfies the original text
#[test_case(2, 2, 1; "tiny")]
#[test_case(5, 5, 2; "small")]
#[test_case(10, 8, 3; "medium")]
#[test_case(20, 15, 4; "large")]
fn random_problems_upper_bounds(variable_num: usize, constraint_num: usize, seed: u64) {
    // cargo test random_problems_upper_bounds -- --nocapture
    let mut rng = SmallRng::seed_from_u64(seed);
    for round in 0..ROUNDS {
        let problem = RandomProblem::generate(&mut rng, variable_num, constraint_num, 0);
        let mut solver = Solver::new(&problem.objective, &problem.constraints)
            .unwrap()
            .with_config(budget());
        let solution = solver
            .solve()
            .unwrap_or_else(|error| panic!("round {round}: {error} on {problem:?}"));
        if let Err(message) = solution.verify(solver.objective(), solver.constraints(), EPSILON) {
            panic!("round {round}: {message} on {problem:?}");
        }
        // the budget row bounds the optimum from above
        let best_coefficient = 10.;
        assert_le!(solution.objective(), 1000. * best_coefficient + EPSILON);
        assert_eq!(solution.variables.len(), variable_num);
    }
}

/// lower bounds need phase 1; whatever is returned must still be consistent
#[test_case(3, 3, 2, 11; "small")]
#[test_case(8, 6, 4, 12; "medium")]
#[test_case(15, 10, 8, 13; "large")]
fn random_problems_lower_bounds(variable_num: usize, constraint_num: usize, lower_bound_num: usize, seed: u64) {
    // cargo test random_problems_lower_bounds -- --nocapture
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut optimal = 0;
    for round in 0..ROUNDS {
        let problem = RandomProblem::generate(&mut rng, variable_num, constraint_num, lower_bound_num);
        let mut solver = Solver::new(&problem.objective, &problem.constraints)
            .unwrap()
            .with_config(budget());
        match solver.solve() {
            Ok(solution) => {
                optimal += 1;
                if let Err(message) = solution.verify(solver.objective(), solver.constraints(), EPSILON) {
                    panic!("round {round}: {message} on {problem:?}");
                }
            }
            Err(SimplexError::Infeasible) | Err(SimplexError::PivotLimit(_)) => {}
            Err(error) => panic!("round {round}: unexpected {error} on {problem:?}"),
        }
    }
    println!("{optimal} of {ROUNDS} optimal");
}

#[test]
fn random_problems_repeatable() {
    // cargo test random_problems_repeatable -- --nocapture
    let mut rng = SmallRng::seed_from_u64(42);
    let problem = RandomProblem::generate(&mut rng, 6, 4, 2);
    let first = maximize(&problem.objective, &problem.constraints);
    let second = maximize(&problem.objective, &problem.constraints);
    assert_eq!(first, second);
}
