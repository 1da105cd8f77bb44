//! Structured T-junction shell meshes for finite-element analysis.
//!
//! This crate builds a T-shaped surface mesh from two rectangular grid
//! patches: an upper plate covering the unit square at `z = 0`, and a lower
//! plate hanging from the upper plate's middle row down to `z = -1`. The
//! perimeter and the seam carry eight named boundaries so a solver can apply
//! conditions by name.
//!
//! # Features
//!
//! - **Pure layout generation**: points, cells and boundary chains as plain
//!   indices ([`TStructureLayout`]), independent of any mesh backend
//! - **Mesh builder**: handle-based point registration, face descriptors,
//!   face/segment elements, boundary names and compression ([`MeshBuilder`])
//! - **Validation**: boundary chain and open-edge checks ([`validate_shell_mesh`])
//! - **Export**: Gmsh MSH 2.2, legacy VTK and OBJ
//!
//! # Geometry
//!
//! ```text
//!        y
//!        ^      upper plate, z = 0
//!    1 --+-------------------+  uptop
//!        |                   |
//! upleft |=== interface =====|  upright      seam row ny1/2
//!        |                   |
//!    0 --+-------------------+--> x  upbottom
//!
//!   lower plate at y = ratio, from z = 0 down to z = -1:
//!   downright (x = 0), downbottom (z = -1), downleft (x = 1)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh_tstruct::{ShellMesh, TStructureParams};
//!
//! let params = TStructureParams::default().with_upper(8, 8).with_lower(8, 6);
//! let mesh = ShellMesh::t_structure(&params).unwrap();
//!
//! let report = mesh.validate();
//! assert!(report.is_valid());
//!
//! mesh.save("tstruct.msh").unwrap();
//! ```
//!
//! # Logging
//!
//! Operations emit `tracing` events; see [`tracing_ext`] for targets.

mod builder;
mod error;
pub mod io;
mod layout;
mod params;
pub mod tracing_ext;
mod tstructure;
mod types;
mod validate;

pub use builder::MeshBuilder;
pub use error::{ErrorCode, MeshError, MeshLocation, MeshResult, RecoverySuggestion};
pub use io::{MeshFormat, save_mesh, save_mesh_as, write_msh, write_obj, write_vtk};
pub use layout::{Boundary, BoundarySegment, TStructureLayout};
pub use params::TStructureParams;
pub use tstructure::{build_layout, make_t_structure_mesh};
pub use types::{
    Element1D, Element2D, FaceDescriptor, PointId, Polygon, SegmentElement, ShellMesh,
    SurfaceElement,
};
pub use validate::{
    BoundaryReport, IssueSeverity, ShellIssue, ShellMeshReport, validate_shell_mesh,
};

impl ShellMesh {
    /// Save the mesh to a file, auto-detecting format from extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        io::save_mesh(self, path.as_ref())
    }

    /// Validate the mesh and return a report.
    pub fn validate(&self) -> ShellMeshReport {
        validate::validate_shell_mesh(self)
    }
}
