//! egram command-line driver

use clap::{Args, Parser, Subcommand};
use egram_ast::dump::dump;
use egram_cli::{render_parse_error, EgramConfig};
use egram_lexer::Lexer;
use egram_parser::{ParseError, ParserConfig};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "egram")]
#[command(version)]
#[command(about = "Parse egram configuration sources and dump their call structure", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex source file and display tokens
    Lex {
        /// Source file to lex
        file: PathBuf,
    },
    /// Parse source file and print the AST dump
    Parse {
        /// Source file to parse
        file: PathBuf,
        /// Print the full AST structure instead of the dump
        #[arg(short, long)]
        verbose: bool,
        #[command(flatten)]
        options: ParseOptions,
    },
    /// Check source file for syntax errors
    Check {
        /// Source file to check
        file: PathBuf,
        #[command(flatten)]
        options: ParseOptions,
    },
}

#[derive(Args)]
struct ParseOptions {
    /// Config file (defaults to ./egram.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Allow NAME to take an unparenthesized argument list (repeatable)
    #[arg(long = "statement-call", value_name = "NAME")]
    statement_calls: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Lex { file } => lex_file(&file),
        Commands::Parse {
            file,
            verbose,
            options,
        } => parse_file(&file, verbose, &options),
        Commands::Check { file, options } => check_file(&file, &options),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            None
        }
    }
}

fn load_parser_config(options: &ParseOptions) -> Option<ParserConfig> {
    match EgramConfig::discover(options.config.as_deref(), Path::new(".")) {
        Ok(config) => {
            let parser = config.parser_config(&options.statement_calls);
            debug!(statement_calls = ?parser.statement_calls(), "parser configuration");
            Some(parser)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

fn report_parse_error(filename: &str, source: &str, error: &ParseError) {
    let color = std::io::stderr().is_terminal();
    match render_parse_error(filename, source, error, color) {
        Ok(report) => eprint!("{}", report),
        // fall back to the plain message
        Err(_) => eprintln!("{}: {}", filename, error),
    }
}

/// Lex a source file and display tokens
fn lex_file(path: &Path) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };

    let (tokens, lex_errors) = Lexer::new(&source).tokenize();

    println!("Tokens ({}):", tokens.len());
    for token in &tokens {
        println!("  {:?} @ {:?}", token.kind, token.span);
    }

    if lex_errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        println!("\nLexer errors ({}):", lex_errors.len());
        for error in &lex_errors {
            println!("  {}", error);
        }
        ExitCode::FAILURE
    }
}

/// Parse a source file and print its dump
fn parse_file(path: &Path, verbose: bool, options: &ParseOptions) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let Some(config) = load_parser_config(options) else {
        return ExitCode::FAILURE;
    };

    let filename = path.display().to_string();
    match egram_parser::parse_with_config(&source, config) {
        Ok(program) => {
            if verbose {
                println!("{:#?}", program);
            } else {
                println!("{}", dump(&program));
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            report_parse_error(&filename, &source, &error);
            ExitCode::FAILURE
        }
    }
}

/// Check a source file for syntax errors
fn check_file(path: &Path, options: &ParseOptions) -> ExitCode {
    let Some(source) = read_source(path) else {
        return ExitCode::FAILURE;
    };
    let Some(config) = load_parser_config(options) else {
        return ExitCode::FAILURE;
    };

    let filename = path.display().to_string();
    match egram_parser::parse_with_config(&source, config) {
        Ok(program) => {
            println!(
                "Check passed: {} ({} statements)",
                path.display(),
                program.body.stmts.len()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            report_parse_error(&filename, &source, &error);
            ExitCode::FAILURE
        }
    }
}
