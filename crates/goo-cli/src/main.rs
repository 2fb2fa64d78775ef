mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Once;

use clap::Parser as ClapParser;
use owo_colors::OwoColorize;
use goo_interpreter::{ExitStatus, InterpreterConfig, SilentOutput, StdoutOutput};
use goo_lexer::Lexer;
use goo_parser::Parser;
use goo_syntax::error::Error;

/// Exit code for unreadable files and lex or parse errors.
const EXIT_SOURCE_ERROR: i32 = 1;

#[derive(ClapParser, Debug)]
#[command(name = "goo", version, about = "Run a Goo program")]
struct Cli {
    /// Goo source file to run
    file: PathBuf,

    /// Maximum call depth before a stack overflow is reported (overrides GOO_MAX_CALL_DEPTH)
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    /// Discard everything the program prints
    #[arg(short, long)]
    quiet: bool,
}

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber when `RUST_LOG` is set; otherwise tracing stays off.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    });
}

fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let gutter = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", gutter.bright_black(), src_line);
            let marker = format!("{}{}^", " ".repeat(gutter.len()), " ".repeat(col.saturating_sub(1)));
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
}

fn read_source(path: &Path) -> String {
    if !path.exists() {
        eprintln!(
            "{}: {}",
            "error".red().bold(),
            format!("File not found: {}", path.display()).red()
        );
        process::exit(EXIT_SOURCE_ERROR);
    }
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", path.display(), e).red()
            );
            process::exit(EXIT_SOURCE_ERROR);
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut config = InterpreterConfig::from_env();
    if let Some(depth) = cli.max_depth {
        config = config.with_max_call_depth(depth);
    }
    tracing::debug!(file = %cli.file.display(), max_call_depth = config.max_call_depth, "starting");

    let src = read_source(&cli.file);

    let tokens = match Lexer::new(&src).tokenize() {
        Ok(t) => t,
        Err(e) => {
            render_error("Lex error", &src, &e);
            common::provide_error_suggestions(&e.msg);
            process::exit(EXIT_SOURCE_ERROR);
        }
    };

    let program = match Parser::new(tokens).parse_program() {
        Ok(p) => p,
        Err(e) => {
            render_error("Parse error", &src, &e);
            common::provide_error_suggestions(&e.msg);
            process::exit(EXIT_SOURCE_ERROR);
        }
    };

    let status = if cli.quiet {
        goo_interpreter::run(&program, config, Box::new(SilentOutput))
    } else {
        goo_interpreter::run(&program, config, Box::new(StdoutOutput))
    };
    if let ExitStatus::Failure(err) = &status {
        render_error("Runtime error", &src, &err.clone().into());
        common::provide_runtime_suggestions(&err.kind);
    }
    process::exit(status.code());
}
