//! tmesh generate command - build the mesh and export it.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_tstruct::{MeshError, MeshFormat};
use serde::Serialize;

use super::build_mesh;
use crate::{Cli, OutputFormat, ParamArgs, output};

#[derive(Serialize)]
struct GenerateResult {
    output: String,
    format: String,
    quads: bool,
    points: usize,
    faces: usize,
    segments: usize,
}

pub fn run(args: &ParamArgs, output_path: &Path, cli: &Cli) -> Result<()> {
    // Fail on the extension before building anything
    let format = MeshFormat::from_path(output_path).ok_or_else(|| {
        MeshError::unsupported_format(
            output_path
                .extension()
                .and_then(|e| e.to_str())
                .map(String::from),
        )
    })?;

    let (params, mesh) = build_mesh(args)?;

    output::info(
        &format!(
            "Writing {} {} to {}",
            mesh.face_count(),
            if params.quads { "quads" } else { "triangles" },
            output_path.display()
        ),
        cli.format,
        cli.quiet,
    );

    mesh_tstruct::save_mesh_as(&mesh, output_path, format)
        .with_context(|| format!("Failed to save mesh to {:?}", output_path))?;

    let result = GenerateResult {
        output: output_path.display().to_string(),
        format: format.name().to_string(),
        quads: params.quads,
        points: mesh.point_count(),
        faces: mesh.face_count(),
        segments: mesh.segment_count(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Generated {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!("  {}: {}", "Format".cyan(), result.format.to_uppercase());
                println!(
                    "  {}: {} points, {} faces, {} boundary segments",
                    "Size".cyan(),
                    result.points,
                    result.faces,
                    result.segments
                );
            }
        }
    }

    Ok(())
}
