//! tinyc - scanner and parser front end for a small C-like language
//!
//! Reads one source file and prints the requested views of it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tinyc_analyzer::feedback::Report;
use tinyc_analyzer::formatter::{Formatter, FormatterConfig};
use tinyc_analyzer::frontend::parser::ParserConfig;
use tinyc_analyzer::{analyze_with_config, Analysis};

/// tinyc analyzer
#[derive(Parser, Debug)]
#[command(name = "tinyc")]
#[command(author = "Z1529")]
#[command(version = "0.1.0")]
#[command(about = "Lexical and syntax analysis for a small C-like language")]
struct Cli {
    /// Input source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the token list
    #[arg(short, long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(short, long)]
    syntax: bool,

    /// Print every view, including the formatted code
    #[arg(short, long)]
    verbose: bool,

    /// Print the source reformatted from its tokens
    #[arg(short, long)]
    format: bool,

    /// Write the formatted code to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the diagnostics report as JSON
    #[arg(long)]
    json: bool,

    /// Print JSON on a single line
    #[arg(long, requires = "json")]
    compact: bool,

    /// Deepest statement/expression nesting the parser accepts
    #[arg(long, default_value_t = 100)]
    max_depth: usize,

    /// Spaces per indentation level for the formatter
    #[arg(long, default_value_t = 4)]
    indent: usize,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Returns whether the input was free of diagnostics
fn run(cli: &Cli) -> Result<bool> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let analysis = analyze_with_config(&source, ParserConfig { max_depth: cli.max_depth });
    info!(
        "{}: {} tokens, {} statements, {} diagnostics",
        cli.input.display(),
        analysis.tokens.len(),
        analysis.program.statements.len(),
        analysis.error_count()
    );

    let report = Report::from_diagnostics(cli.input.display().to_string(), analysis.diagnostics());

    if cli.json {
        let json = if cli.compact { report.to_json_compact() } else { report.to_json() };
        println!("{}", json);
    } else {
        print_views(cli, &analysis);
        print!("{}", report.render(&source));
    }

    if cli.format || cli.verbose || cli.output.is_some() {
        let formatted = Formatter::new(FormatterConfig { indent_size: cli.indent }).format(&analysis.tokens);
        match &cli.output {
            Some(path) => write_output(path, &formatted)?,
            None if !cli.json => {
                println!("\n=== Formatted Code ===");
                print!("{}", formatted);
            }
            None => {}
        }
    }

    Ok(report.success)
}

fn print_views(cli: &Cli, analysis: &Analysis) {
    println!("tinyc analyzer v0.1.0");
    println!("Analyzing: {}", cli.input.display());

    if cli.tokens || cli.verbose {
        println!("\n=== Tokens ===");
        for token in &analysis.tokens {
            println!("{}", token);
        }
    }

    if cli.syntax || cli.verbose {
        println!("\n=== Syntax Tree ===");
        print!("{}", analysis.program.to_tree_string());
    }
    println!();
}

fn write_output(path: &Path, formatted: &str) -> Result<()> {
    fs::write(path, formatted).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Formatted code written to {}", path.display());
    Ok(())
}
