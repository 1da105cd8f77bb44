//! Mesh export.
//!
//! Writes a [`ShellMesh`] in formats finite-element tools and viewers read:
//!
//! - **MSH** (Gmsh 2.2 ASCII): physical names for the surface and every named
//!   boundary, so solvers can pick boundaries up by name
//! - **VTK** (legacy ASCII unstructured grid): faces and segments with a
//!   per-cell `tag` scalar
//! - **OBJ**: faces plus `l` line records grouped by boundary name

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::ShellMesh;
use crate::error::{MeshError, MeshResult};
use crate::tracing_ext::log_io_operation;
use crate::types::Polygon;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Msh,
    Vtk,
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "msh" => Some(MeshFormat::Msh),
                "vtk" => Some(MeshFormat::Vtk),
                "obj" => Some(MeshFormat::Obj),
                _ => None,
            })
    }

    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Msh => "msh",
            MeshFormat::Vtk => "vtk",
            MeshFormat::Obj => "obj",
        }
    }
}

/// Save mesh to file, auto-detecting format from extension.
pub fn save_mesh(mesh: &ShellMesh, path: &Path) -> MeshResult<()> {
    let format = MeshFormat::from_path(path).ok_or_else(|| {
        MeshError::unsupported_format(
            path.extension()
                .and_then(|e| e.to_str())
                .map(String::from),
        )
    })?;
    save_mesh_as(mesh, path, format)
}

/// Save mesh to file in an explicit format.
pub fn save_mesh_as(mesh: &ShellMesh, path: &Path, format: MeshFormat) -> MeshResult<()> {
    info!("Saving mesh to {:?} ({} format)", path, format.name());

    let result = File::create(path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        match format {
            MeshFormat::Msh => write_msh(mesh, &mut writer)?,
            MeshFormat::Vtk => write_vtk(mesh, &mut writer)?,
            MeshFormat::Obj => write_obj(mesh, &mut writer)?,
        }
        writer.flush()
    });

    log_io_operation(path, format.name(), result.is_ok());
    result.map_err(|e| MeshError::io_write(path, e))
}

/// Physical name of a face descriptor's boundary condition.
fn surface_name(bc: usize) -> String {
    if bc == 1 {
        "surface".to_string()
    } else {
        format!("surface{}", bc)
    }
}

/// Write Gmsh MSH 2.2 ASCII.
///
/// Faces carry their descriptor's `bc` as physical tag and `surfnr` as
/// elementary tag; segments carry their boundary index as both.
pub fn write_msh<W: Write>(mesh: &ShellMesh, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "$MeshFormat")?;
    writeln!(w, "2.2 0 8")?;
    writeln!(w, "$EndMeshFormat")?;

    let mut bcs: Vec<usize> = mesh.face_descriptors.iter().map(|fd| fd.bc).collect();
    bcs.sort_unstable();
    bcs.dedup();
    let boundaries: Vec<(u32, &str)> = mesh.boundary_names().collect();

    writeln!(w, "$PhysicalNames")?;
    writeln!(w, "{}", bcs.len() + boundaries.len())?;
    for (index, name) in &boundaries {
        writeln!(w, "1 {} \"{}\"", index, name)?;
    }
    for bc in &bcs {
        writeln!(w, "2 {} \"{}\"", bc, surface_name(*bc))?;
    }
    writeln!(w, "$EndPhysicalNames")?;

    writeln!(w, "$Nodes")?;
    writeln!(w, "{}", mesh.point_count())?;
    for (i, p) in mesh.points.iter().enumerate() {
        writeln!(w, "{} {} {} {}", i + 1, p.x, p.y, p.z)?;
    }
    writeln!(w, "$EndNodes")?;

    writeln!(w, "$Elements")?;
    writeln!(w, "{}", mesh.segment_count() + mesh.face_count())?;
    let mut id = 0usize;
    for seg in &mesh.segments {
        id += 1;
        writeln!(
            w,
            "{} 1 2 {} {} {} {}",
            id,
            seg.index,
            seg.index,
            seg.points[0] + 1,
            seg.points[1] + 1
        )?;
    }
    for face in &mesh.faces {
        id += 1;
        let fd = face
            .face_index
            .checked_sub(1)
            .and_then(|i| mesh.face_descriptors.get(i))
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "face uses face descriptor {}, but only {} are registered",
                        face.face_index,
                        mesh.face_descriptors.len()
                    ),
                )
            })?;
        let elem_type = match face.polygon {
            Polygon::Triangle(_) => 2,
            Polygon::Quad(_) => 3,
        };
        write!(w, "{} {} 2 {} {}", id, elem_type, fd.bc, fd.surfnr)?;
        for c in face.polygon.corners() {
            write!(w, " {}", c + 1)?;
        }
        writeln!(w)?;
    }
    writeln!(w, "$EndElements")?;
    Ok(())
}

/// Write a legacy VTK ASCII unstructured grid.
///
/// The `tag` cell scalar is 0 for faces and the boundary index for segments.
pub fn write_vtk<W: Write>(mesh: &ShellMesh, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "# vtk DataFile Version 3.0")?;
    writeln!(w, "T-structure shell mesh")?;
    writeln!(w, "ASCII")?;
    writeln!(w, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(w, "POINTS {} double", mesh.point_count())?;
    for p in &mesh.points {
        writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
    }

    let cell_count = mesh.face_count() + mesh.segment_count();
    let list_size: usize = mesh
        .faces
        .iter()
        .map(|f| f.polygon.len() + 1)
        .sum::<usize>()
        + mesh.segment_count() * 3;

    writeln!(w, "CELLS {} {}", cell_count, list_size)?;
    for face in &mesh.faces {
        let corners = face.polygon.corners();
        write!(w, "{}", corners.len())?;
        for c in corners {
            write!(w, " {}", c)?;
        }
        writeln!(w)?;
    }
    for seg in &mesh.segments {
        writeln!(w, "2 {} {}", seg.points[0], seg.points[1])?;
    }

    writeln!(w, "CELL_TYPES {}", cell_count)?;
    for face in &mesh.faces {
        let vtk_type = match face.polygon {
            Polygon::Triangle(_) => 5,
            Polygon::Quad(_) => 9,
        };
        writeln!(w, "{}", vtk_type)?;
    }
    for _ in &mesh.segments {
        writeln!(w, "3")?;
    }

    writeln!(w, "CELL_DATA {}", cell_count)?;
    writeln!(w, "SCALARS tag int 1")?;
    writeln!(w, "LOOKUP_TABLE default")?;
    for _ in &mesh.faces {
        writeln!(w, "0")?;
    }
    for seg in &mesh.segments {
        writeln!(w, "{}", seg.index)?;
    }
    Ok(())
}

/// Write Wavefront OBJ with boundary polylines.
pub fn write_obj<W: Write>(mesh: &ShellMesh, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "# T-structure shell mesh")?;
    writeln!(w, "# Points: {}", mesh.point_count())?;
    writeln!(w, "# Faces: {}", mesh.face_count())?;
    writeln!(w, "# Segments: {}", mesh.segment_count())?;
    writeln!(w)?;

    for p in &mesh.points {
        writeln!(w, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }

    writeln!(w)?;
    writeln!(w, "g surface")?;
    for face in &mesh.faces {
        // OBJ uses 1-based indexing
        write!(w, "f")?;
        for c in face.polygon.corners() {
            write!(w, " {}", c + 1)?;
        }
        writeln!(w)?;
    }

    for (index, name) in mesh.boundary_names() {
        writeln!(w)?;
        writeln!(w, "g {}", name)?;
        for seg in mesh.segments.iter().filter(|s| s.index == index) {
            writeln!(w, "l {} {}", seg.points[0] + 1, seg.points[1] + 1)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::{TStructureParams, make_t_structure_mesh};

    fn small_mesh() -> ShellMesh {
        make_t_structure_mesh(&TStructureParams::uniform(2)).unwrap()
    }

    fn render<F>(mesh: &ShellMesh, f: F) -> String
    where
        F: Fn(&ShellMesh, &mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        f(mesh, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            MeshFormat::from_path(Path::new("a.msh")),
            Some(MeshFormat::Msh)
        );
        assert_eq!(
            MeshFormat::from_path(Path::new("a.VTK")),
            Some(MeshFormat::Vtk)
        );
        assert_eq!(
            MeshFormat::from_path(Path::new("a.obj")),
            Some(MeshFormat::Obj)
        );
        assert_eq!(MeshFormat::from_path(Path::new("a.stl")), None);
        assert_eq!(MeshFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_msh_sections() {
        let text = render(&small_mesh(), |m, w| write_msh(m, w));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(&lines[0..3], &["$MeshFormat", "2.2 0 8", "$EndMeshFormat"]);
        assert_eq!(lines[3], "$PhysicalNames");
        assert_eq!(lines[4], "9");
        assert_eq!(lines[5], "1 1 \"upbottom\"");
        assert_eq!(lines[12], "1 8 \"downleft\"");
        assert_eq!(lines[13], "2 1 \"surface\"");

        let nodes = lines.iter().position(|l| *l == "$Nodes").unwrap();
        assert_eq!(lines[nodes + 1], "15");
        assert_eq!(lines[nodes + 2], "1 0 0 0");

        let elements = lines.iter().position(|l| *l == "$Elements").unwrap();
        assert_eq!(lines[elements + 1], "24");
        // First segment: upbottom from point 1 to 2
        assert_eq!(lines[elements + 2], "1 1 2 1 1 1 2");
        // First face follows the 16 segments
        assert_eq!(lines[elements + 18], "17 3 2 1 1 1 2 5 4");
        assert_eq!(*lines.last().unwrap(), "$EndElements");
    }

    #[test]
    fn test_msh_triangles() {
        let mesh = make_t_structure_mesh(&TStructureParams::uniform(2).triangles()).unwrap();
        let text = render(&mesh, |m, w| write_msh(m, w));
        let elements: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "$Elements")
            .skip(2)
            .take_while(|l| *l != "$EndElements")
            .collect();
        let count_type = |t: &str| {
            elements
                .iter()
                .filter(|l| l.split_whitespace().nth(1) == Some(t))
                .count()
        };

        assert_eq!(elements.len(), 16 + 16);
        assert_eq!(count_type("2"), 16);
        assert_eq!(count_type("1"), 16);
    }

    #[test]
    fn test_msh_rejects_unknown_face_descriptor() {
        let mut mesh = small_mesh();
        mesh.faces[3].face_index = 0;
        let mut buf = Vec::new();
        let err = write_msh(&mesh, &mut buf).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

        mesh.faces[3].face_index = 2;
        assert!(write_msh(&mesh, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_vtk_counts() {
        let text = render(&small_mesh(), |m, w| write_vtk(m, w));
        assert!(text.contains("POINTS 15 double"));
        // 8 quads (5 entries) + 16 lines (3 entries)
        assert!(text.contains("CELLS 24 88"));
        assert!(text.contains("CELL_TYPES 24"));
        assert!(text.contains("CELL_DATA 24"));
        assert_eq!(text.lines().filter(|l| *l == "9").count(), 8);
    }

    #[test]
    fn test_obj_groups() {
        let text = render(&small_mesh(), |m, w| write_obj(m, w));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 15);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 8);
        assert_eq!(text.lines().filter(|l| l.starts_with("l ")).count(), 16);
        assert!(text.contains("g interface\nl 4 5\nl 5 6\n"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = small_mesh();
        for ext in ["msh", "vtk", "obj"] {
            let path = dir.path().join(format!("tstruct.{}", ext));
            save_mesh(&mesh, &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_save_errors() {
        let mesh = small_mesh();
        let err = save_mesh(&mesh, Path::new("mesh.stl")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);

        let err = save_mesh(&mesh, Path::new("/nonexistent/dir/mesh.msh")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IoWrite);
    }
}
