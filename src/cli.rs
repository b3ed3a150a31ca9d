//! Command-line front end: evaluate a JSON-encoded expression against a
//! JSON-encoded row and print the value, its inferred type and the variables
//! left behind.

use crate::access::{Row, Value};
use crate::catalog::ColumnSchemas;
use crate::expression::{evaluate, get_column_schema, Expression, Scope};
use crate::session::{Session, SessionConfig};
use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// fakedb - evaluate SQL binary-operator expressions without a database
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding the expression tree
    #[arg(short, long)]
    pub expr: PathBuf,

    /// JSON object mapping column names to row values
    #[arg(short, long)]
    pub row: Option<PathBuf>,

    /// JSON object mapping column names to column types
    #[arg(short, long)]
    pub columns: Option<PathBuf>,

    /// JSON object of initial session variables
    #[arg(short, long)]
    pub variables: Option<PathBuf>,

    /// Compiled size limit for LIKE/RLIKE patterns, in bytes
    #[arg(long, default_value_t = SessionConfig::default().regex_size_limit)]
    pub regex_size_limit: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} file {}", what, path.display()))
}

/// Plain JSON scalars map onto values directly; arrays become grouped values.
pub fn json_to_value(json: serde_json::Value) -> Result<Value> {
    let value = match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => match n.as_f64() {
                Some(f) => Value::Float(f),
                None => bail!("Number {} is out of range", n),
            },
        },
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Array(items) => Value::Grouped(
            items
                .into_iter()
                .map(json_to_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_json::Value::Object(_) => bail!("Objects cannot be used as values"),
    };
    Ok(value)
}

fn read_values(path: &Path, what: &str) -> Result<HashMap<String, Value>> {
    let raw: HashMap<String, serde_json::Value> = read_json(path, what)?;
    raw.into_iter()
        .map(|(name, json)| -> Result<(String, Value)> {
            let value = json_to_value(json).with_context(|| format!("Bad value for '{}'", name))?;
            Ok((name, value))
        })
        .collect()
}

/// Evaluate the expression described by `args` and render the report.
pub fn run(args: &Args) -> Result<String> {
    let expr: Expression = read_json(&args.expr, "expression")?;
    let row: Row = match &args.row {
        Some(path) => read_values(path, "row")?,
        None => Row::new(),
    };
    let columns: ColumnSchemas = match &args.columns {
        Some(path) => read_json(path, "columns")?,
        None => ColumnSchemas::new(),
    };
    let mut scope = match &args.variables {
        Some(path) => Scope::with_variables(read_values(path, "variables")?),
        None => Scope::new(),
    };

    let session = Session::new(SessionConfig {
        regex_size_limit: args.regex_size_limit,
    });
    log::debug!(
        "session {}: evaluating expression from {}",
        session.session_id,
        args.expr.display()
    );

    // Inference sees the variables as they were before evaluation.
    let column_type = get_column_schema(&expr, &scope, &columns)
        .context("Failed to infer expression type")?;
    let value = evaluate(&session, &mut scope, &expr, &row, &columns)
        .context("Failed to evaluate expression")?;

    let mut report = String::new();
    writeln!(report, "value: {}", value)?;
    writeln!(report, "type: {}", column_type)?;

    let mut names: Vec<&String> = scope.variables.keys().collect();
    names.sort();
    for name in names {
        writeln!(report, "@{} = {}", name, scope.get(name))?;
    }
    Ok(report)
}
