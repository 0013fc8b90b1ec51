use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use mimalloc::MiMalloc;
use tracing::debug;

use courier_optimizer::{
    parsers::{load_list::LoadListParser, parser::LoadsParser},
    solver::{solver::Solver, solver_params::SolverParams},
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Assigns pickup/dropoff loads to drivers and prints one route per line.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The load list to solve
    input: Option<PathBuf>,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the routes; everything else goes to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let Some(input) = cli.input else {
        let program = std::env::args()
            .next()
            .unwrap_or_else(|| String::from("courier_cli"));
        println!("Usage: {program} input_file");
        return ExitCode::from(1);
    };

    match run(&input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(input: &Path) -> anyhow::Result<()> {
    let loads = LoadListParser.parse(input)?;
    debug!(loads = loads.len(), "input parsed");

    let solver = Solver::new(loads, SolverParams::default());
    let assignment = solver.solve();

    for route in assignment.routes() {
        println!("{}", format_route(route));
    }

    Ok(())
}

fn format_route(route: &[usize]) -> String {
    let indices = route
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>();
    format!("[{}]", indices.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_route() {
        assert_eq!(format_route(&[3, 7, 2]), "[3,7,2]");
        assert_eq!(format_route(&[1]), "[1]");
        assert_eq!(format_route(&[]), "[]");
    }
}
