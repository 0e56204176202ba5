//! Split command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use sp_patch::ApplyOptions;
use sp_sql::{split_statements, SplitOptions, Statement};
use std::path::Path;

use crate::cli::{GlobalArgs, SplitArgs, SplitOutput};
use crate::context::load_config;

/// Split result for JSON output
#[derive(Debug, Serialize)]
struct SplitReport<'a> {
    file: &'a Path,
    statements: Vec<Statement>,
    remainder: Option<String>,
}

/// Execute the split command
pub async fn execute(args: &SplitArgs, global: &GlobalArgs) -> Result<()> {
    let script = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    // Placeholders come from the project when there is one
    let options = match load_config(global) {
        Ok(config) => {
            let apply = ApplyOptions::from_config(&config, &global.project_dir);
            SplitOptions {
                delimiter: apply.delimiter,
                placeholders: apply.placeholders,
            }
        }
        Err(e) => {
            log::debug!("No project configuration, splitting without placeholders: {e:#}");
            SplitOptions::default()
        }
    };

    let mut iter = split_statements(&script, &options);
    let statements: Vec<Statement> = iter.by_ref().collect();
    let report = SplitReport {
        file: &args.file,
        statements,
        remainder: iter.remainder(),
    };

    match args.output {
        SplitOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        SplitOutput::Text => print!("{}", render_text(&report)),
    }
    Ok(())
}

fn render_text(report: &SplitReport<'_>) -> String {
    let mut out = String::new();
    for (i, statement) in report.statements.iter().enumerate() {
        out.push_str(&format!(
            "-- statement {} (line {})\n{};\n\n",
            i + 1,
            statement.source_line,
            statement.text
        ));
    }
    if let Some(rest) = &report.remainder {
        out.push_str("-- not executed: unterminated trailing content\n");
        for line in rest.lines() {
            out.push_str(&format!("-- {line}\n"));
        }
    }
    out
}

#[cfg(test)]
#[path = "split_test.rs"]
mod tests;
