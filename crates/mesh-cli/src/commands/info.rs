//! tmesh info command - display mesh statistics.

use anyhow::Result;
use colored::Colorize;
use mesh_tstruct::TStructureParams;
use serde::Serialize;

use super::build_mesh;
use crate::{Cli, OutputFormat, ParamArgs, output};

#[derive(Serialize)]
struct MeshInfo {
    params: TStructureParams,
    points: usize,
    faces: usize,
    segments: usize,
    seam_row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    surface_area: f64,
    boundaries: Vec<BoundaryInfo>,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
}

#[derive(Serialize)]
struct BoundaryInfo {
    index: u32,
    name: String,
    segments: usize,
}

pub fn run(args: &ParamArgs, cli: &Cli) -> Result<()> {
    let (params, mesh) = build_mesh(args)?;

    let boundaries = mesh
        .boundary_names()
        .map(|(index, name)| BoundaryInfo {
            index,
            name: name.to_string(),
            segments: mesh.segments.iter().filter(|s| s.index == index).count(),
        })
        .collect();

    let info = MeshInfo {
        seam_row: params.seam_row(),
        points: mesh.point_count(),
        faces: mesh.face_count(),
        segments: mesh.segment_count(),
        bounds: mesh.bounds().map(|(min, max)| BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
        }),
        surface_area: mesh.surface_area(),
        boundaries,
        params,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                let p = &info.params;
                println!("{}", "T-Structure Mesh".bold().underline());
                println!(
                    "  {}: {} ({}x{} upper, {}x{} lower, ratio {})",
                    "Params".cyan(),
                    if p.quads { "quads" } else { "triangles" },
                    p.nx1,
                    p.ny1,
                    p.nx2,
                    p.ny2,
                    p.ratio
                );
                println!("  {}: {}", "Points".cyan(), info.points);
                println!("  {}: {}", "Faces".cyan(), info.faces);
                println!("  {}: {}", "Segments".cyan(), info.segments);
                println!("  {}: {}", "Seam row".cyan(), info.seam_row);

                if let Some(ref b) = info.bounds {
                    println!(
                        "  {}: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
                        "Bounds".cyan(),
                        b.min[0],
                        b.min[1],
                        b.min[2],
                        b.max[0],
                        b.max[1],
                        b.max[2]
                    );
                }
                println!("  {}: {:.4}", "Surface area".cyan(), info.surface_area);

                println!("\n{}", "Boundaries:".bold());
                for b in &info.boundaries {
                    println!("  {:>2} {:<12} {} segments", b.index, b.name, b.segments);
                }
            }
        }
    }

    Ok(())
}
