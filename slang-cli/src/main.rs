//! S-language CLI: verify, run, list, expand and print derivations.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/usage/assembly error
//! - 2: Verification failure
//! - 3: Runtime or expansion error
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`
//! (default `warn`).

mod commands;

use std::process;

use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "verify" => commands::verify(&args[2..]),
        "run" => commands::run(&args[2..]),
        "list" => commands::list(&args[2..]),
        "expand" => commands::expand(&args[2..]),
        "lineage" => commands::lineage(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: slang <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  verify <file.sl>                                  Check a program and its functions");
    eprintln!("  run <file.sl> [inputs...] [--degree N] [--trace] [--max-steps N]");
    eprintln!("                                                    Execute with the given inputs");
    eprintln!("  list <file.sl> [--degree N]                       Print the instruction table");
    eprintln!("  expand <file.sl> --degree N [-o out.sl]           Emit the expanded program");
    eprintln!("  lineage <file.sl> <position> [--degree N]         Print an instruction's derivation");
    eprintln!();
    eprintln!("N is a number of expansion rounds, or 'max' for full expansion.");
    eprintln!("--max-steps counts main-program steps only. A QUOTE or JUMP_EQUAL_FUNCTION");
    eprintln!("runs its function to completion as one step; use --degree max to bound it.");
}
