//! minic: single-pass interpreter for a small C-like teaching language

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use crossterm::style::{style, Stylize};
use crossterm::tty::IsTty;

use minic::lexer::TokenStream;
use minic::{CompileError, Config, Interpreter};

#[derive(Parser)]
#[command(
    name = "minic",
    version,
    about = "Type-check and interpret programs in a small C-like language"
)]
struct Cli {
    /// Log interpreter activity (-v for calls, -vv for scopes and loops).
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program and print the final value of every global variable.
    ///
    /// Errors are reported on stderr as `<file>: <category>` followed by
    /// `(row, col): <message>`.
    Run {
        /// Source file to run
        file: PathBuf,

        /// Also print the scope tree left after the run
        #[arg(long)]
        tree: bool,
    },
    /// Type check a program without executing it
    Check {
        /// Source file to check
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

impl Command {
    fn file(&self) -> &Path {
        match self {
            Command::Run { file, .. } | Command::Check { file } | Command::Tokens { file } => {
                file
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Run { file, tree } => run_file(file, *tree),
        Command::Check { file } => check_file(file),
        Command::Tokens { file } => tokenize_file(file),
    };

    if let Err(e) = result {
        match e.downcast_ref::<CompileError>() {
            Some(err) => report(cli.command.file(), err),
            None => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Print a diagnostic: a `file: category` header, then the error itself as
/// `(row, col): message` on a line of its own. Colored when stderr is a
/// terminal.
fn report(path: &Path, err: &CompileError) {
    eprintln!("{}", render(path, err, io::stderr().is_tty()));
}

fn render(path: &Path, err: &CompileError, color: bool) -> String {
    let category = err.category().to_string();
    if color {
        format!(
            "{}: {}\n{}",
            style(path.display()).bold(),
            style(category).red().bold(),
            err
        )
    } else {
        format!("{}: {}\n{}", path.display(), category, err)
    }
}

fn run_file(path: &Path, print_tree: bool) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(path)?;
    let mut interpreter = Interpreter::new(&source);
    interpreter.run()?;

    for var in interpreter.scope_tree().globals() {
        if var.initialized {
            println!("{}: {} = {}", var.name, var.data_type, var.value);
        } else {
            println!("{}: {} (uninitialized)", var.name, var.data_type);
        }
    }

    if print_tree {
        println!();
        print!("{}", interpreter.scope_tree());
    }
    Ok(())
}

fn check_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(path)?;
    Interpreter::with_config(&source, Config::check_only()).run()?;

    println!("✓ {} type checks successfully", path.display());
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(path)?;

    for token in TokenStream::new(&source).tokens() {
        println!(
            "{:>4}:{:<4} {:<20} {}",
            token.location.line,
            token.location.column,
            token.kind.to_string(),
            token.text
        );
    }
    Ok(())
}
