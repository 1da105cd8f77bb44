//! tmesh validate command - check boundary chains and open edges.

use anyhow::Result;
use colored::Colorize;
use mesh_tstruct::IssueSeverity;
use mesh_tstruct::tracing_ext::log_validation_result;
use serde::Serialize;

use super::build_mesh;
use crate::{Cli, OutputFormat, ParamArgs, output};

#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    points: usize,
    faces: usize,
    open_edges: usize,
    junction_edges: usize,
    boundaries: Vec<BoundaryCheck>,
    issues: Vec<IssueInfo>,
}

#[derive(Serialize)]
struct BoundaryCheck {
    name: String,
    segments: usize,
    simple_path: bool,
    oriented: bool,
}

#[derive(Serialize)]
struct IssueInfo {
    message: String,
    severity: String,
}

pub fn run(args: &ParamArgs, cli: &Cli) -> Result<()> {
    let (_, mesh) = build_mesh(args)?;

    let report = mesh.validate();
    log_validation_result(&report);

    let issues = report
        .issues
        .iter()
        .map(|issue| IssueInfo {
            message: issue.to_string(),
            severity: match issue.severity() {
                IssueSeverity::Error => "error",
                IssueSeverity::Warning => "warning",
                IssueSeverity::Info => "info",
            }
            .to_string(),
        })
        .collect();

    let result = ValidationResult {
        valid: report.is_valid(),
        points: report.point_count,
        faces: report.face_count,
        open_edges: report.open_edge_count,
        junction_edges: report.junction_edge_count,
        boundaries: report
            .boundaries
            .iter()
            .map(|b| BoundaryCheck {
                name: b.name.clone(),
                segments: b.segment_count,
                simple_path: b.is_simple_path,
                oriented: b.is_oriented,
            })
            .collect(),
        issues,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Validation Report".bold().underline());

                if result.valid {
                    println!("  {}: {}", "Status".cyan(), "Valid".green().bold());
                } else {
                    println!("  {}: {}", "Status".cyan(), "Issues found".red().bold());
                }
                println!(
                    "  {}: {} open, {} junction",
                    "Edges".cyan(),
                    result.open_edges,
                    result.junction_edges
                );

                println!("\n{}", "Boundaries:".bold());
                for b in &result.boundaries {
                    let ok = b.simple_path && b.oriented;
                    let icon = if ok { "✓".green() } else { "✗".red() };
                    println!("  {} {:<12} {} segments", icon, b.name, b.segments);
                }

                if !result.issues.is_empty() {
                    println!("\n{}", "Issues:".bold());
                    for issue in &result.issues {
                        let icon = match issue.severity.as_str() {
                            "error" => "✗".red(),
                            "warning" => "⚠".yellow(),
                            _ => "ℹ".blue(),
                        };
                        println!("  {} {}", icon, issue.message);
                    }
                }
            }
        }
    }

    if !result.valid {
        std::process::exit(1);
    }

    Ok(())
}
