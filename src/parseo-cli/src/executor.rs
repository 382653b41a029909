//! Formula execution for the parseo CLI
//!
//! Builds the engine from the configuration, loads context values from
//! files or inline JSON and renders results.

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context as _, Result};
use log::{debug, info};
use polars::prelude::*;
use parseo_engine::{Context, Engine, ExpressionCache};
use parseo_shared::Value;

use crate::cli::split_assignment;
use crate::config::Config;

/// Main executor for parseo operations
pub struct Executor {
    config: Config,
    cache: ExpressionCache,
}

impl Executor {
    /// Create an executor with the configured whitelist
    pub fn new(config: Config) -> Result<Self> {
        let engine = config.build_engine()?;
        let cache = ExpressionCache::new(engine, config.cache.size);
        Ok(Self { config, cache })
    }

    /// Engine compiled from the configuration
    pub fn engine(&self) -> &Engine {
        self.cache.engine()
    }

    /// Canonical rewritten text, or the rewritten tree as JSON
    pub fn test(&self, expression: &str, ast: bool) -> Result<String> {
        if ast {
            let compiled = self.engine().compile_expression(expression)?;
            Ok(serde_json::to_string_pretty(compiled.expr())?)
        } else {
            Ok(self.engine().test(expression)?)
        }
    }

    /// Build an evaluation context from `KEY=FILE` and `KEY=JSON` arguments
    pub fn build_context(&self, contexts: &[String], sets: &[String]) -> Result<Context> {
        let mut context = Context::new();

        for arg in contexts {
            let (key, path) = split_assignment(arg)
                .ok_or_else(|| anyhow!("Expected KEY=FILE, got '{}'", arg))?;
            let value = self.read_context_file(Path::new(path))?;
            info!("Loaded context '{}' from {}", key, path);
            context.insert(key, value);
        }

        for arg in sets {
            let (key, json) = split_assignment(arg)
                .ok_or_else(|| anyhow!("Expected KEY=JSON, got '{}'", arg))?;
            let parsed: serde_json::Value = serde_json::from_str(json)
                .with_context(|| format!("Invalid JSON for context '{}'", key))?;
            context.insert(key, Value::from_json(parsed));
        }

        Ok(context)
    }

    /// Read a `.csv` file as a data frame or a `.json` file as a value
    pub fn read_context_file(&self, path: &Path) -> Result<Value> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                let parse_options =
                    CsvParseOptions::default().with_separator(self.config.csv_separator()?);
                let read_options = CsvReadOptions::default()
                    .with_parse_options(parse_options)
                    .with_has_header(self.config.csv.has_header);
                let df = CsvReader::new(file)
                    .with_options(read_options)
                    .finish()
                    .with_context(|| format!("Failed to read CSV {}", path.display()))?;
                debug!("Read {} rows from {}", df.height(), path.display());
                Ok(Value::DataFrame(df))
            }
            "json" => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let parsed: serde_json::Value = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid JSON in {}", path.display()))?;
                Ok(Value::from_json(parsed))
            }
            other => Err(anyhow!(
                "Unsupported context file format '{}' for {}",
                other,
                path.display()
            )),
        }
    }

    /// Compile (through the cache) and evaluate
    pub fn evaluate(&mut self, expression: &str, context: &Context) -> Result<Value> {
        let evaluator = self.cache.get_or_compile(expression)?;
        Ok(evaluator.call(context)?)
    }

    /// Evaluate and render the result
    pub fn eval(
        &mut self,
        expression: &str,
        contexts: &[String],
        sets: &[String],
        json: bool,
    ) -> Result<String> {
        let context = self.build_context(contexts, sets)?;
        let result = self.evaluate(expression, &context)?;
        render(&result, json)
    }
}

/// Render a value as text or pretty JSON
pub fn render(value: &Value, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(&value.to_json()?)?)
    } else {
        Ok(value.to_string())
    }
}
