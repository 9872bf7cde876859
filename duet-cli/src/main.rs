//! Duet CLI — load a program and run it solo or as a duet.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input, assembly or usage error
//! - 3: Runtime error

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use duet_common::{Opcode, Register};
use duet_vm::pipe::DEFAULT_CAPACITY;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duet", version, about = "Run duet register programs")]
struct Cli {
    /// Log more (-v for debug, -vv for trace). DUET_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one instance until a rcv recovers a value
    Solo {
        /// Program text file
        file: PathBuf,
    },
    /// Run two communicating instances and report what instance 1 sent
    Duet {
        /// Program text file
        file: PathBuf,
        /// Capacity of each pipe
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
        /// Register seeded with the instance id
        #[arg(long, default_value = "p")]
        id_register: Register,
        /// Print a line per instance instead of the single count
        #[arg(long)]
        all: bool,
    },
    /// Run one instance and count executed opcodes
    Profile {
        /// Program text file
        file: PathBuf,
        /// Print only the count for this opcode
        #[arg(long)]
        opcode: Option<Opcode>,
    },
    /// Load a program and report its size
    Check {
        /// Program text file
        file: PathBuf,
    },
    /// Print a program in canonical form
    Disassemble {
        /// Program text file
        file: PathBuf,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Solo { file } => commands::solo(&file),
        Command::Duet {
            file,
            capacity,
            id_register,
            all,
        } => commands::duet(&file, capacity, id_register, all),
        Command::Profile { file, opcode } => commands::profile(&file, opcode),
        Command::Check { file } => commands::check(&file),
        Command::Disassemble { file } => commands::disassemble(&file),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("DUET_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
