#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::fs::File;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Instant;

use row_life::rowlife::{RowLifeConfig, load_board, run, save_board};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: row-life <gens_max> <input|-> <output|-> [--threads N] [--max-threads N]";

struct MainArgs {
    gens_max: u64,
    input: String,
    output: String,
    config: RowLifeConfig,
}

fn parse_args() -> Result<MainArgs, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RowLifeConfig::from_env();
    let mut positional = Vec::new();
    let next_arg = |i: usize, flag: &str| -> Result<usize, String> {
        args.get(i)
            .ok_or_else(|| format!("{flag} requires a value"))?
            .parse::<usize>()
            .map_err(|_| format!("{flag} requires a positive integer"))
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--threads" => {
                i += 1;
                config = config.thread_count(next_arg(i, "--threads")?);
            }
            "--max-threads" => {
                i += 1;
                config = config.max_threads(next_arg(i, "--max-threads")?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => {
                return Err(format!("unknown argument: {other}\n{USAGE}"));
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let [gens, input, output]: [String; 3] = positional
        .try_into()
        .map_err(|_| USAGE.to_string())?;
    let gens_max = gens
        .parse::<u64>()
        .map_err(|_| format!("gens_max must be a nonnegative integer, got {gens:?}"))?;
    Ok(MainArgs {
        gens_max,
        input,
        output,
        config,
    })
}

fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn open_output(path: &str) -> io::Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(File::create(path)?))
    }
}

fn execute(args: MainArgs) -> row_life::rowlife::Result<()> {
    let board = load_board(open_input(&args.input)?)?;
    let population = board.population();

    let start = Instant::now();
    let result = run(board, args.gens_max, args.config)?;
    let elapsed = start.elapsed();

    info!(
        gens_max = args.gens_max,
        initial_population = population,
        final_population = result.population(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "simulation finished"
    );
    save_board(open_output(&args.output)?, &result)?;
    eprintln!("Game of Life took {:.3} seconds", elapsed.as_secs_f64());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "run failed");
            eprintln!("*** {err} ***");
            ExitCode::FAILURE
        }
    }
}
