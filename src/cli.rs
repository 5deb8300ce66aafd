use crate::error::*;
use crate::simplex::*;
use crate::trace::*;
use crate::util::*;
use clap::builder::{StringValueParser, TypedValueParser, ValueParser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use pbr::ProgressBar;
use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};
use serde::Serialize;
use std::env;
use std::fmt::Display;
use std::time::{Duration, Instant};

const TEST_EACH_ROUNDS: usize = 100;

#[derive(Parser, Clone)]
#[clap(author = clap::crate_authors!(", "))]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Two-phase simplex solver for linear programs written as plain equations")]
#[clap(color = clap::ColorChoice::Auto)]
#[clap(propagate_version = true)]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
pub struct Cli {
    /// verbose logging (-v, -vv, -vvv)
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
#[allow(clippy::large_enum_variant)]
enum Commands {
    /// maximize an objective subject to constraints
    Solve(SolveParameters),
    /// benchmark the speed (and also correctness) on random problems
    Benchmark(BenchmarkParameters),
    /// built-in tests
    Test {
        #[clap(subcommand)]
        command: TestCommands,
    },
}

#[derive(Parser, Clone)]
pub struct SolveParameters {
    /// the objective to maximize, e.g. "3x + 2y"
    #[clap(allow_hyphen_values = true)]
    objective: String,
    /// a constraint such as "x + y <= 4", may be repeated
    #[clap(short = 'c', long = "constraint", allow_hyphen_values = true)]
    constraints: Vec<String>,
    /// read more constraints from a file, one per line, blank lines skipped
    #[clap(short = 'f', long)]
    file: Option<String>,
    /// print the tableau after every pivot
    #[clap(long, action)]
    trace: bool,
    /// output format of the result
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// the configuration of the solver, e.g. {"max_pivots":1000}
    #[clap(long, default_value_t = json!({}), value_parser = ValueParser::new(SerdeJsonParser))]
    config: serde_json::Value,
    /// expected result: a mapping like {"x":1,"max":2}, or "infeasible" or "unbounded"; exit with failure on mismatch
    #[clap(long, value_parser = ValueParser::new(SerdeJsonParser))]
    expect: Option<serde_json::Value>,
    /// tolerance when comparing with the expected values
    #[clap(long, default_value_t = EPSILON)]
    tolerance: f64,
}

#[derive(Parser, Clone)]
pub struct BenchmarkParameters {
    /// number of variables
    #[clap(value_parser)]
    variables: usize,
    /// number of random `<=` constraints, not counting the row bounding the sum of all variables
    #[clap(value_parser)]
    constraints: usize,
    /// number of random lower bounds `x >= c`, which need phase 1 and may render the problem infeasible
    #[clap(short = 'l', long, default_value_t = 0)]
    lower_bounds: usize,
    /// the number of iterations to run
    #[clap(short = 'r', long, default_value_t = 1000)]
    total_rounds: usize,
    /// seed of the problem generator, random if not given
    #[clap(long)]
    seed: Option<u64>,
    /// the configuration of the solver; the pivot budget stops degenerate cycles
    #[clap(long, default_value_t = json!({"max_pivots": 10000}), value_parser = ValueParser::new(SerdeJsonParser))]
    config: serde_json::Value,
    /// message on the progress bar
    #[clap(long, default_value_t = format!(""))]
    pb_message: String,
    /// print every generated problem
    #[clap(long, action)]
    print_problem: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum TestCommands {
    /// solve known problems and check the answers
    Common {
        /// print out the command to test
        #[clap(short = 'c', long, action)]
        print_command: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `OPTIMAL <value>` followed by one `name = value` line per variable
    Text,
    /// a single JSON mapping including the optimum under `max`, or `null`
    Json,
}

#[derive(Clone)]
struct SerdeJsonParser;
impl TypedValueParser for SerdeJsonParser {
    type Value = serde_json::Value;
    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let inner = StringValueParser::new();
        let val = inner.parse_ref(cmd, arg, value)?;
        match serde_json::from_str::<serde_json::Value>(&val) {
            Ok(vector) => Ok(vector),
            Err(error) => {
                let mut err = clap::Error::new(ErrorKind::ValueValidation).with_cmd(cmd);
                if let Some(arg) = arg {
                    err.insert(ContextKind::InvalidArg, ContextValue::String(arg.to_string()));
                }
                err.insert(
                    ContextKind::InvalidValue,
                    ContextValue::String(format!("should be like {{\"a\":1}}, parse error: {error}")),
                );
                Err(err)
            }
        }
    }
}

fn exit_with(message: impl Display, code: i32) -> ! {
    eprintln!("{message}");
    std::process::exit(code)
}

/// compare a result with `--expect`, see [`SolveParameters::expect`]
pub fn check_expectation(
    expected: &serde_json::Value,
    result: &SimplexResult<Solution>,
    tolerance: f64,
) -> Result<(), String> {
    match (expected, result) {
        (serde_json::Value::String(outcome), Err(SimplexError::Infeasible)) if outcome == "infeasible" => Ok(()),
        (serde_json::Value::String(outcome), Err(SimplexError::Unbounded)) if outcome == "unbounded" => Ok(()),
        (serde_json::Value::Object(mapping), Ok(solution)) => {
            for (name, value) in mapping.iter() {
                let value = value
                    .as_f64()
                    .ok_or_else(|| format!("expected value of `{name}` must be a number, found {value}"))?;
                let actual = if name == OBJECTIVE_KEY {
                    solution.objective()
                } else {
                    solution
                        .get(name)
                        .ok_or_else(|| format!("variable `{name}` is not in the solution"))?
                };
                if !approx_eq(actual, value, tolerance) {
                    return Err(format!("`{name}` should be {value}, found {actual}"));
                }
            }
            Ok(())
        }
        (expected, Ok(solution)) => Err(format!(
            "expected {expected}, found {}",
            serde_json::Value::from(solution)
        )),
        (expected, Err(error)) => Err(format!("expected {expected}, found error: {error}")),
    }
}

/// outcome counts of a benchmark
#[derive(Debug, Clone, Default)]
pub struct BenchmarkStatistics {
    pub optimal: usize,
    pub infeasible: usize,
    pub unbounded: usize,
    pub pivot_limit: usize,
    pub total_pivots: usize,
    pub total_time: Duration,
    pub rounds: usize,
}

impl BenchmarkStatistics {
    pub fn record(&mut self, result: &SimplexResult<Solution>, pivots: usize, time: Duration) {
        match result {
            Ok(_) => self.optimal += 1,
            Err(SimplexError::Infeasible) => self.infeasible += 1,
            Err(SimplexError::Unbounded) => self.unbounded += 1,
            Err(SimplexError::PivotLimit(_)) => self.pivot_limit += 1,
            Err(error) => panic!("unexpected error on a generated problem: {error}"),
        }
        self.total_pivots += pivots;
        self.total_time += time;
        self.rounds += 1;
    }

    pub fn brief(&self) -> String {
        let rounds = self.rounds.max(1);
        format!(
            "optimal: {}, infeasible: {}, unbounded: {}, pivot limit: {}, average pivots: {:.2}, average time: {:.3e}s",
            self.optimal,
            self.infeasible,
            self.unbounded,
            self.pivot_limit,
            self.total_pivots as f64 / rounds as f64,
            self.total_time.as_secs_f64() / rounds as f64,
        )
    }
}

impl Cli {
    /// install the logger at the level chosen by `-v`; `RUST_LOG` still refines it
    pub fn init_logger(&self) {
        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        // a second initialization (nested commands) keeps the first logger
        let _ = env_logger::Builder::from_default_env()
            .filter_level(level)
            .format_timestamp(None)
            .try_init();
    }

    pub fn run(self) {
        match self.command {
            Commands::Solve(parameters) => parameters.run(),
            Commands::Benchmark(parameters) => parameters.run(),
            Commands::Test { command } => match command {
                TestCommands::Common { print_command } => {
                    println!("[Common Test] known problems");
                    for (objective, constraints, expect, tolerance) in common_cases() {
                        let mut command = vec!["".to_string(), "solve".to_string(), objective.to_string()];
                        for constraint in constraints.iter() {
                            command.push("-c".to_string());
                            command.push(constraint.to_string());
                        }
                        command.append(&mut vec![
                            "--expect".to_string(),
                            expect.to_string(),
                            "--tolerance".to_string(),
                            format!("{tolerance}"),
                        ]);
                        execute_in_cli(command.iter(), print_command);
                    }
                    println!("[Common Test] random problems");
                    for (variables, constraints, lower_bounds) in [(2, 2, 0), (5, 5, 0), (10, 8, 0), (5, 5, 2), (10, 8, 4)] {
                        let command = vec![
                            format!(""),
                            format!("benchmark"),
                            format!("{variables}"),
                            format!("{constraints}"),
                            format!("--lower-bounds"),
                            format!("{lower_bounds}"),
                            format!("--total-rounds"),
                            format!("{TEST_EACH_ROUNDS}"),
                            format!("--seed"),
                            format!("{}", variables * 100 + constraints * 10 + lower_bounds),
                            format!("--pb-message"),
                            format!("random {variables} {constraints} {lower_bounds}"),
                        ];
                        execute_in_cli(command.iter(), print_command);
                    }
                }
            },
        }
    }
}

type CommonCase = (&'static str, Vec<&'static str>, serde_json::Value, f64);

/// objective, constraints, expected answer and tolerance
fn common_cases() -> Vec<CommonCase> {
    vec![
        (
            "2x + 3y + 4z",
            vec!["3x + 2y + z <= 10", "2x + 5y + 3z <= 15"],
            json!({"x": 0, "y": 0, "z": 5, "max": 20}),
            EPSILON,
        ),
        (
            "x + 2y - z",
            vec!["2x + y + z <= 14", "4x + 2y + 3z <= 28", "2x + 5y + 5z <= 30"],
            json!({"x": 5, "y": 4, "z": 0, "max": 13}),
            EPSILON,
        ),
        (
            "6x + 5y + 4z",
            vec!["2x + y + z <= 180", "x + 3y + 2z <= 300", "2x + y + 2z <= 240"],
            json!({"x": 48, "y": 84, "z": 0, "max": 708}),
            EPSILON,
        ),
        (
            "6x1 - 8x2 + x3",
            vec!["3x1 + x2 <= 10", "4x1 - x2 <= 5", "x1 + x2 - x3 >= -3"],
            json!({"x1": 1.25, "x2": 0, "x3": 4.25, "max": 11.75}),
            EPSILON,
        ),
        (
            "a + 4b",
            vec!["a + b <= 1000", "a >= b"],
            json!({"a": 500, "b": 500, "max": 2500}),
            EPSILON,
        ),
        (
            "a + 2b",
            vec!["a + b <= 300", "b = 2c", "c <= 50"],
            json!({"a": 200, "b": 100, "c": 50, "max": 400}),
            EPSILON,
        ),
        (
            "3x1 + 4x2",
            vec!["x1 + x2 <= 12", "5x1 + 2x2 >= 36", "7x1 + 4x2 >= 14"],
            json!({"x1": 4, "x2": 8, "max": 44}),
            EPSILON,
        ),
        (
            "4a + b",
            vec!["a + b <= 1000", "a >= 600", "b >= 500"],
            json!("infeasible"),
            EPSILON,
        ),
        ("x + y", vec!["x - y <= 1"], json!("unbounded"), EPSILON),
        (
            "cp + fo",
            vec![
                "bcp + 5489699 + bfo + 16838158 <= 474168386",
                "bcp = 293.04cp",
                "bfo = 1654.42fo",
                "bfo >= 5073877",
            ],
            json!({"cp": 1524593, "fo": 3067, "max": 1527660}),
            1e-3,
        ),
    ]
}

impl SolveParameters {
    fn run(self) {
        let SolveParameters {
            objective,
            mut constraints,
            file,
            trace,
            format,
            config,
            expect,
            tolerance,
        } = self;
        if let Some(file) = file {
            let content = std::fs::read_to_string(&file)
                .unwrap_or_else(|error| exit_with(format!("cannot read {file}: {error}"), 2));
            constraints.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }
        let config = SimplexConfig::from_json(config).unwrap_or_else(|error| exit_with(error, 2));
        let mut solver = match Solver::new(&objective, &constraints) {
            Ok(solver) => solver.with_config(config),
            Err(error) => exit_with(format!("error: {error}"), 2),
        };
        let result = if trace {
            solver.solve_traced(&mut PrintTracer)
        } else {
            solver.solve()
        };
        match format {
            OutputFormat::Text => match &result {
                Ok(solution) => {
                    println!("OPTIMAL {}", pretty_coefficient(solution.objective()));
                    for (name, value) in solution.iter() {
                        println!("{name} = {}", pretty_coefficient(value));
                    }
                }
                Err(SimplexError::Infeasible) => println!("INFEASIBLE"),
                Err(SimplexError::Unbounded) => println!("UNBOUNDED"),
                Err(error) => eprintln!("error: {error}"),
            },
            OutputFormat::Json => match &result {
                Ok(solution) => println!("{}", serde_json::Value::from(solution)),
                Err(error) if error.is_no_solution() => println!("null"),
                Err(error) => eprintln!("error: {error}"),
            },
        }
        if let Some(expected) = expect {
            if let Err(message) = check_expectation(&expected, &result, tolerance) {
                exit_with(format!("[failed] {objective}: {message}"), 1);
            }
        } else if matches!(&result, Err(error) if !error.is_no_solution()) {
            std::process::exit(1);
        }
    }
}

impl BenchmarkParameters {
    fn run(self) {
        let BenchmarkParameters {
            variables,
            constraints,
            lower_bounds,
            total_rounds,
            seed,
            config,
            pb_message,
            print_problem,
        } = self;
        // whether to disable progress bar, useful when running jobs in background
        let disable_progress_bar = env::var("DISABLE_PROGRESS_BAR").is_ok();
        if variables == 0 {
            exit_with("at least one variable is required", 2);
        }
        let config = SimplexConfig::from_json(config).unwrap_or_else(|error| exit_with(error, 2));
        let seed = seed.unwrap_or_else(|| thread_rng().gen::<u64>());
        let mut rng = SmallRng::seed_from_u64(seed);
        // prepare progress bar display
        let mut pb = if !disable_progress_bar {
            let mut pb = ProgressBar::on(std::io::stderr(), total_rounds as u64);
            pb.message(format!("{pb_message} ").as_str());
            Some(pb)
        } else {
            if !pb_message.is_empty() {
                print!("{pb_message} ");
            }
            None
        };
        let mut statistics = BenchmarkStatistics::default();
        for round in 0..(total_rounds as u64) {
            if let Some(pb) = pb.as_mut() {
                pb.set(round);
            }
            let problem = RandomProblem::generate(&mut rng, variables, constraints, lower_bounds);
            if print_problem {
                println!("{}", json!(problem));
            }
            let begin = Instant::now();
            let mut solver = match Solver::new(&problem.objective, &problem.constraints) {
                Ok(solver) => solver.with_config(config.clone()),
                Err(error) => panic!("generated problem does not parse: {error}, seed {seed}, round {round}"),
            };
            let result = solver.solve();
            let elapsed = begin.elapsed();
            if let Ok(solution) = &result {
                if let Err(message) = solution.verify(solver.objective(), solver.constraints(), EPSILON) {
                    panic!("{message}, seed {seed}, round {round}, problem {}", json!(problem));
                }
            }
            statistics.record(&result, solver.pivots(), elapsed);
            if let Some(pb) = pb.as_mut() {
                if pb_message.is_empty() {
                    pb.message(format!("{} ", statistics.brief()).as_str());
                }
            }
        }
        if disable_progress_bar {
            // always print out brief
            println!("{}", statistics.brief());
        } else {
            if let Some(pb) = pb.as_mut() {
                pb.finish()
            }
            println!();
            println!("{}", statistics.brief());
        }
        eprintln!("seed {seed}, total solve time {:?}", statistics.total_time);
    }
}

pub fn execute_in_cli<'a>(iter: impl Iterator<Item = &'a String> + Clone, print_command: bool) {
    if print_command {
        print!("[command]");
        for word in iter.clone() {
            if word.contains(char::is_whitespace) {
                print!("'{word}' ")
            } else {
                print!("{word} ")
            }
        }
        println!();
    }
    Cli::parse_from(iter).run();
}
