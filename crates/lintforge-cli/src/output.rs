//! Output formatting and reporting

use colored::*;
use lintforge_core::{GenerationReport, Options};
use std::path::Path;
use std::time::Duration;

use crate::OutputFormat;

/// Print the outcome of a generation run
pub fn print_report(
    report: &GenerationReport,
    output_dir: &Path,
    elapsed: Duration,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => print_report_human(report, output_dir, elapsed),
        OutputFormat::Json => print_report_json(report, output_dir, elapsed),
    }
}

fn print_report_human(
    report: &GenerationReport,
    output_dir: &Path,
    elapsed: Duration,
) -> anyhow::Result<()> {
    let configurations: usize = report.artifacts.iter().map(|a| a.configurations).sum();

    println!(
        "{} Wrote {} artifacts ({} configurations) to {} in {:.2?}",
        "✓".green(),
        report.artifacts.len().to_string().bold(),
        configurations,
        output_dir.display(),
        elapsed
    );

    if !report.failures.is_empty() {
        println!("\n{}", "Skipped:".bold());
        for failure in &report.failures {
            println!(
                "  {} {} (vector {}): {}",
                "✗".red(),
                failure.identifier,
                failure.vector,
                failure.message
            );
        }
        println!(
            "\n  {} of {} permutations failed",
            report.failures.len().to_string().red(),
            report.failures.len() + report.artifacts.len()
        );
    }
    Ok(())
}

fn print_report_json(
    report: &GenerationReport,
    output_dir: &Path,
    elapsed: Duration,
) -> anyhow::Result<()> {
    let artifacts: Vec<serde_json::Value> = report
        .artifacts
        .iter()
        .map(|a| {
            serde_json::json!({
                "vector": a.vector,
                "identifier": a.identifier,
                "configurations": a.configurations,
            })
        })
        .collect();
    let failures: Vec<serde_json::Value> = report
        .failures
        .iter()
        .map(|f| {
            serde_json::json!({
                "vector": f.vector,
                "identifier": f.identifier,
                "message": f.message,
            })
        })
        .collect();

    let result = serde_json::json!({
        "outputDir": output_dir.display().to_string(),
        "elapsedMs": elapsed.as_millis() as u64,
        "artifacts": artifacts,
        "failures": failures,
    });
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Print the address of one flag combination
pub fn print_address(options: &Options, format: OutputFormat) -> anyhow::Result<()> {
    let enabled = options.enabled();
    match format {
        OutputFormat::Human => {
            println!("{}", options.identifier().bold());
            println!("  Vector: {}", options.vector());
            println!(
                "  Flags:  {}",
                if enabled.is_empty() {
                    "(none)".dimmed().to_string()
                } else {
                    enabled.join(", ")
                }
            );
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "identifier": options.identifier(),
                "vector": options.vector(),
                "flags": enabled,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
