//! T-structure mesh construction.

use tracing::{info, instrument};

use crate::builder::MeshBuilder;
use crate::error::{MeshError, MeshResult};
use crate::layout::{Boundary, TStructureLayout};
use crate::params::TStructureParams;
use crate::tracing_ext::{OperationTimer, log_mesh_stats};
use crate::types::{Element1D, Element2D, FaceDescriptor, PointId, ShellMesh};

/// Build a T-shaped shell mesh.
///
/// The upper plate spans the unit square at `z = 0`; the lower plate hangs
/// from seam row `ny1 / 2` to `z = -1`. All faces share face descriptor 1 and
/// the boundary segments carry the tags of [`Boundary`].
///
/// Fails with [`MeshError::InvalidParams`](crate::MeshError::InvalidParams)
/// before anything is built when the parameters break the fixed topology.
///
/// # Example
///
/// ```
/// use mesh_tstruct::{TStructureParams, make_t_structure_mesh};
///
/// let params = TStructureParams::uniform(2);
/// let mesh = make_t_structure_mesh(&params).unwrap();
///
/// assert_eq!(mesh.point_count(), 15);
/// assert_eq!(mesh.face_count(), 8);
/// assert_eq!(mesh.boundary_names().count(), 8);
/// ```
#[instrument(skip_all, fields(quads = params.quads, nx1 = params.nx1, ny1 = params.ny1, nx2 = params.nx2, ny2 = params.ny2))]
pub fn make_t_structure_mesh(params: &TStructureParams) -> MeshResult<ShellMesh> {
    let _timer = OperationTimer::new("make_t_structure_mesh");
    let layout = TStructureLayout::generate(params)?;
    let mesh = build_layout(&layout)?;

    info!(
        points = mesh.point_count(),
        faces = mesh.face_count(),
        segments = mesh.segment_count(),
        "Built T-structure mesh"
    );
    log_mesh_stats(&mesh, "t_structure");
    Ok(mesh)
}

/// Feed a layout through a [`MeshBuilder`] and compress the result.
pub fn build_layout(layout: &TStructureLayout) -> MeshResult<ShellMesh> {
    let mut builder = MeshBuilder::with_capacity(
        layout.points.len(),
        layout.faces.len(),
        layout.segments.len(),
    );

    let pids: Vec<PointId> = layout
        .points
        .iter()
        .map(|&p| builder.add_point(p))
        .collect();

    let fd = builder.add_face_descriptor(FaceDescriptor::new(1, 1, 1));

    for (element_index, face) in layout.faces.iter().enumerate() {
        check_indices("face", element_index, face.corners(), pids.len())?;
        builder.add_element_2d(Element2D::new(fd, face.map(|i| pids[i])))?;
    }

    for (element_index, seg) in layout.segments.iter().enumerate() {
        check_indices("segment", element_index, &seg.points, pids.len())?;
        let [a, b] = seg.points;
        builder.add_element_1d(Element1D::new([pids[a], pids[b]], seg.boundary.index()))?;
    }

    for boundary in Boundary::ALL {
        builder.set_cd2_name(boundary.index(), boundary.name())?;
    }

    builder.compress()
}

/// Layout indices must address a registered point.
fn check_indices(
    kind: &'static str,
    element_index: usize,
    indices: &[usize],
    point_count: usize,
) -> MeshResult<()> {
    match indices.iter().find(|&&i| i >= point_count) {
        Some(&i) => Err(MeshError::InvalidPointHandle {
            kind,
            element_index,
            handle: u32::try_from(i).unwrap_or(u32::MAX),
            point_count,
        }),
        None => Ok(()),
    }
}

impl ShellMesh {
    /// Build a T-shaped shell mesh, see [`make_t_structure_mesh`].
    pub fn t_structure(params: &TStructureParams) -> MeshResult<Self> {
        make_t_structure_mesh(params)
    }
}
