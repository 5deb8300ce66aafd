extern crate clap;

use crate::clap::Parser;
use eqsimplex::cli::*;

pub fn main() {
    let cli = Cli::parse();
    cli.init_logger();
    cli.run();
}
