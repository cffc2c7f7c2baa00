//! Tabula CLI - in-memory sheet scratchpad

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tabula::prelude::*;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about = "In-memory cell store with formula evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cell script and print the requested cells
    ///
    /// Script lines: `set KEY RAW`, `get KEY`, `sort COL [desc]`;
    /// blank lines and lines starting with '#' are skipped.
    Run {
        /// Script file ("-" reads stdin)
        script: PathBuf,
    },

    /// Evaluate a single formula against ad-hoc cell bindings
    Eval {
        /// Formula text, e.g. "=A1+2*A2"
        formula: String,

        /// Cell binding of the form KEY=RAW (repeatable)
        #[arg(short, long = "cell", value_name = "KEY=RAW")]
        cell: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { script } => run_script(&script),
        Commands::Eval { formula, cell } => eval_formula(&formula, &cell),
    }
}

fn run_script(script: &PathBuf) -> Result<()> {
    let source = if script.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read script from stdin")?;
        buffer
    } else {
        fs::read_to_string(script)
            .with_context(|| format!("failed to read script {}", script.display()))?
    };

    let mut sheet = Sheet::new();
    for (number, line) in source.lines().enumerate() {
        execute_line(&mut sheet, line)
            .with_context(|| format!("line {}: {}", number + 1, line.trim()))?;
    }
    Ok(())
}

fn execute_line(sheet: &mut Sheet, line: &str) -> Result<()> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "set" => {
            let (key, raw) = rest
                .split_once(char::is_whitespace)
                .context("usage: set KEY RAW")?;
            sheet.set_cell(key, raw)?;
        }
        "get" => {
            if rest.is_empty() {
                bail!("usage: get KEY");
            }
            let value = sheet.get_cell(rest)?;
            println!("{} = {}", rest, value);
        }
        "sort" => {
            let mut parts = rest.split_whitespace();
            let column = parts
                .next()
                .and_then(|s| {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c),
                        _ => None,
                    }
                })
                .context("usage: sort COL [desc]")?;
            let reverse = match parts.next() {
                None => false,
                Some("desc") => true,
                Some(other) => bail!("unknown sort direction '{}'", other),
            };
            sheet.sort_by_column(column, reverse)?;
        }
        other => bail!("unknown command '{}'", other),
    }
    Ok(())
}

fn eval_formula(formula: &str, bindings: &[String]) -> Result<()> {
    let mut sheet = Sheet::new();
    for binding in bindings {
        let (key, raw) = binding
            .split_once('=')
            .with_context(|| format!("binding '{}' is not KEY=RAW", binding))?;
        sheet.set_cell(key, raw)?;
    }

    let parsed = parse_formula(formula)?;
    let value = evaluate(&parsed, &sheet)?;
    println!("{}", value);
    Ok(())
}
