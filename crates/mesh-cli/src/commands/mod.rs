//! Subcommand implementations.

pub mod generate;
pub mod info;
pub mod validate;

use anyhow::{Context, Result};
use mesh_tstruct::{ShellMesh, TStructureParams};

use crate::ParamArgs;

impl ParamArgs {
    /// Resolve parameters: defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<TStructureParams> {
        let mut params = match &self.config {
            Some(path) => TStructureParams::load(path)
                .with_context(|| format!("Failed to load parameters from {:?}", path))?,
            None => TStructureParams::default(),
        };

        if self.triangles {
            params.quads = false;
        }
        if self.quads {
            params.quads = true;
        }
        if let Some(nx1) = self.nx1 {
            params.nx1 = nx1;
        }
        if let Some(ny1) = self.ny1 {
            params.ny1 = ny1;
        }
        if let Some(nx2) = self.nx2 {
            params.nx2 = nx2;
        }
        if let Some(ny2) = self.ny2 {
            params.ny2 = ny2;
        }
        if let Some(ratio) = self.ratio {
            params.ratio = ratio;
        }

        Ok(params)
    }
}

/// Resolve parameters and build the mesh.
pub fn build_mesh(args: &ParamArgs) -> Result<(TStructureParams, ShellMesh)> {
    let params = args.resolve()?;
    let mesh = ShellMesh::t_structure(&params)?;
    Ok((params, mesh))
}
