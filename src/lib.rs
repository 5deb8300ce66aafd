extern crate serde;
#[macro_use]
extern crate serde_json;
#[cfg(feature = "cli")]
extern crate clap;
extern crate derivative;
#[cfg(feature = "cli")]
extern crate env_logger;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate more_asserts;
#[cfg(feature = "cli")]
extern crate pbr;
extern crate pest;
#[macro_use]
extern crate pest_derive;
extern crate prettytable;
extern crate rand;
extern crate thiserror;

#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod expression;
pub mod normalize;
pub mod parser;
pub mod simplex;
pub mod tableau;
pub mod trace;
pub mod util;

pub use error::{SimplexError, SimplexResult};
pub use simplex::{maximize, SimplexConfig, Solution, Solver};
