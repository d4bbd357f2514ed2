//! Command handlers
//!
//! Each handler reads one script, runs as much of the front end as it needs and prints to
//! stdout. Problems with the script itself are output, not errors; [`CliError`] is reserved
//! for things that stop a command from running at all.

use renpy_config::{ConfigError, RenpyConfig};
use renpy_parser::analyze;
use renpy_parser::renpy::diagnostics::DiagnosticSeverity;
use renpy_parser::renpy::formats::{to_token_listing, to_treeviz_str_with_params, TreevizParams};
use renpy_parser::renpy::lexing::tokenize;
use renpy_parser::renpy::parsing::parse_document;
use renpy_parser::renpy::scoping::Symbol;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

/// What a successful command found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// The script has error diagnostics.
    Problems,
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "read script");
    Ok(source)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn tokens(path: &Path, include_trivia: bool, json: bool) -> Result<Outcome, CliError> {
    let source = read_source(path)?;
    let stream = tokenize(&source);
    if json {
        print_json(stream.flatten())?;
    } else {
        print!("{}", to_token_listing(&stream, &source, include_trivia));
    }
    Ok(Outcome::Clean)
}

pub fn ast(path: &Path, config: &RenpyConfig, json: bool) -> Result<Outcome, CliError> {
    let source = read_source(path)?;
    let output = parse_document(&source);
    if json {
        print_json(&output.document)?;
    } else {
        let mut params = TreevizParams::new();
        params.insert(
            "show-linum".to_string(),
            config.inspect.show_line_numbers.to_string(),
        );
        print!("{}", to_treeviz_str_with_params(&output.document, &params));
    }
    for error in &output.errors {
        eprintln!("{}: {}", path.display(), error);
    }
    Ok(Outcome::Clean)
}

pub fn check(path: &Path, config: &RenpyConfig, json: bool) -> Result<Outcome, CliError> {
    let source = read_source(path)?;
    let analysis = analyze(&source, &config.analysis);
    let diagnostics = analysis.diagnostics();
    let outcome = if analysis.has_errors() {
        Outcome::Problems
    } else {
        Outcome::Clean
    };

    if json {
        print_json(&diagnostics)?;
        return Ok(outcome);
    }

    if diagnostics.is_empty() {
        println!("{}: no problems found", path.display());
        return Ok(outcome);
    }
    let shown = config.diagnostics.limit(diagnostics.len());
    for diagnostic in &diagnostics[..shown] {
        println!("{}: {}", path.display(), diagnostic);
    }
    if shown < diagnostics.len() {
        println!("... and {} more", diagnostics.len() - shown);
    }
    let count = |severity: DiagnosticSeverity| {
        diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    };
    println!(
        "{} error(s), {} warning(s)",
        count(DiagnosticSeverity::Error),
        count(DiagnosticSeverity::Warning)
    );
    Ok(outcome)
}

pub fn symbols(
    path: &Path,
    config: &RenpyConfig,
    include_builtins: bool,
    json: bool,
) -> Result<Outcome, CliError> {
    let source = read_source(path)?;
    let analysis = analyze(&source, &config.analysis);
    let listed: Vec<&Symbol> = analysis
        .symbols
        .symbols()
        .iter()
        .filter(|symbol| include_builtins || !symbol.is_builtin())
        .collect();

    if json {
        print_json(&listed)?;
        return Ok(Outcome::Clean);
    }
    for symbol in listed {
        let defined = symbol
            .definition
            .map(|range| range.start.to_display_string())
            .unwrap_or_else(|| "builtin".to_string());
        println!(
            "{:<10}{:<24}{:<8}{} reference(s)",
            symbol.kind.as_str(),
            symbol.name,
            defined,
            symbol.references.len()
        );
    }
    Ok(Outcome::Clean)
}
