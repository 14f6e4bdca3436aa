use clap::{Parser, Subcommand};
use log::error;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use timetable_solver::data::TimetableInput;
use timetable_solver::error::ConfigError;
use timetable_solver::render::{TimetableTable, teacher_initials};
use timetable_solver::search::{BacktrackPolicy, SearchStatus, SolverConfig};
use timetable_solver::{server, solver};

#[derive(Debug, Parser)]
#[command(author, version, about, arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve the timetable described by a JSON or YAML file and print it.
    Solve {
        /// File with `intervals`, `days`, `courses`, `teachers` and `rooms`. Files ending in
        /// `.yaml` or `.yml` are read as YAML, anything else as JSON.
        path: PathBuf,

        /// Highest number of violated constraints accepted in the result.
        #[arg(long, default_value_t = 0)]
        acceptable_cost: u32,

        /// Sessions a teacher may give per week.
        #[arg(long, default_value_t = 7)]
        teacher_session_limit: u32,

        /// Take back register increments and domain pruning of abandoned values.
        #[arg(long)]
        restore_on_backtrack: bool,

        /// Print the full report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Serve the solver over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read timetable: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write report: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match Args::parse().command {
        Command::Solve {
            path,
            acceptable_cost,
            teacher_session_limit,
            restore_on_backtrack,
            json,
        } => {
            let config = SolverConfig {
                acceptable_cost,
                teacher_session_limit,
                backtrack: if restore_on_backtrack {
                    BacktrackPolicy::Restore
                } else {
                    BacktrackPolicy::Persistent
                },
            };
            solve_file(&path, &config, json)
        }
        Command::Serve { addr } => server::run_server(addr).await.map_err(CliError::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn solve_file(path: &Path, config: &SolverConfig, json: bool) -> Result<(), CliError> {
    let reader = BufReader::new(File::open(path)?);
    let input = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => TimetableInput::from_yaml_reader(reader)?,
        _ => TimetableInput::from_reader(reader)?,
    };
    let report = solver::solve(&input, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.status {
        SearchStatus::Acceptable => println!(
            "Best found in {} iterations: cost {}",
            report.iterations, report.cost
        ),
        SearchStatus::Exhausted => println!(
            "Acceptable solution not found in {} iterations; best cost {}",
            report.iterations, report.cost
        ),
    }
    let initials = teacher_initials(input.teachers.keys().map(String::as_str));
    print!("{}", TimetableTable::new(&report.assignments, &initials));
    Ok(())
}
