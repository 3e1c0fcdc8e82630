use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use coroc::config::Config;
use coroc::driver::{self, DriveOptions, GenOptions};
use coroc::interp::Output;

#[derive(Parser)]
#[command(name = "coroc", about = "Lower coro coroutines into resumable state machines", version)]
struct Cli {
    /// Print debug logging (overridden by COROC_LOG)
    #[arg(long, global = true)]
    verbose: bool,
    /// Colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,
    /// Configuration file (defaults to ./coroc.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Write `<stem>.<suffix>.coro` next to each source
    Gen {
        /// Source files, or directories to scan for .coro files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write generated files here instead of beside their sources
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Lower and report errors without writing anything
        #[arg(long, conflicts_with = "stdout")]
        check: bool,
        /// Print generated code to stdout
        #[arg(long)]
        stdout: bool,
        /// Output file suffix (overrides config and COROC_SUFFIX)
        #[arg(long)]
        suffix: Option<String>,
    },

    /// Run a module's entry function, lowering it first if needed
    Run {
        file: PathBuf,
        #[arg(long, default_value = "main")]
        entry: String,
    },

    /// Tick one coroutine until it finishes, printing each tick
    Drive {
        file: PathBuf,
        coroutine: String,
        /// Integer placed in the coroutine's input register
        #[arg(long)]
        input: Option<i64>,
        /// Give up after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,
    },
}

fn apply_color(choice: ColorChoice) {
    let enable = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal(),
    };
    colored::control::set_override(enable);
}

fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.cmd {
        Commands::Gen {
            paths,
            out_dir,
            check,
            stdout,
            suffix,
        } => {
            if let Some(suffix) = suffix {
                config.suffix = suffix;
                config.validate()?;
            }
            let summary = driver::generate(
                &config,
                &GenOptions {
                    paths,
                    out_dir,
                    check,
                    stdout,
                },
            )?;
            if check {
                eprintln!(
                    "{} {} file(s), {} coroutine(s) lower cleanly",
                    "checked".green().bold(),
                    summary.unwritten,
                    summary.coroutines
                );
            } else {
                for path in &summary.written {
                    eprintln!("{} {}", "wrote".green().bold(), path.display());
                }
            }
            Ok(())
        }
        Commands::Run { file, entry } => driver::run(&config, &file, &entry, Output::Stdout),
        Commands::Drive {
            file,
            coroutine,
            input,
            max_ticks,
        } => {
            let options = DriveOptions {
                coroutine,
                input,
                max_ticks,
            };
            let mut stdout = std::io::stdout().lock();
            driver::drive(&config, &file, &options, Output::Stdout, &mut stdout)?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    apply_color(cli.color);
    coroc::logging::init(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
