//! Generation parameters for the T-structure mesh.

use tracing::debug;

use crate::error::{MeshError, MeshResult};

/// Shape and resolution of a T-structure shell mesh.
///
/// The upper plate covers the unit square `[0,1] x [0,1]` at `z = 0` with
/// `nx1 x ny1` cells. The lower plate hangs from the upper plate's seam row
/// (`ny1 / 2`) down to `z = -1` with `nx2 x ny2` cells, its points sitting at
/// `y = ratio`.
///
/// # Example
///
/// ```
/// use mesh_tstruct::TStructureParams;
///
/// let params = TStructureParams::default()
///     .triangles()
///     .with_upper(8, 6)
///     .with_lower(8, 3);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.seam_row(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "params-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TStructureParams {
    /// Emit quadrilaterals (true) or pairs of triangles (false).
    pub quads: bool,
    /// Upper plate subdivisions along x.
    pub nx1: usize,
    /// Upper plate subdivisions along y.
    pub ny1: usize,
    /// Lower plate subdivisions along x.
    pub nx2: usize,
    /// Lower plate subdivisions along -z.
    pub ny2: usize,
    /// y coordinate of the lower plate.
    pub ratio: f64,
}

impl Default for TStructureParams {
    fn default() -> Self {
        Self {
            quads: true,
            nx1: 4,
            ny1: 4,
            nx2: 4,
            ny2: 4,
            ratio: 0.5,
        }
    }
}

impl TStructureParams {
    /// Uniform resolution: every subdivision count set to `n`.
    pub fn uniform(n: usize) -> Self {
        Self {
            nx1: n,
            ny1: n,
            nx2: n,
            ny2: n,
            ..Self::default()
        }
    }

    /// Emit quadrilateral faces.
    pub fn quads(mut self) -> Self {
        self.quads = true;
        self
    }

    /// Emit triangle pairs instead of quads.
    pub fn triangles(mut self) -> Self {
        self.quads = false;
        self
    }

    /// Set upper plate subdivisions.
    pub fn with_upper(mut self, nx1: usize, ny1: usize) -> Self {
        self.nx1 = nx1;
        self.ny1 = ny1;
        self
    }

    /// Set lower plate subdivisions.
    pub fn with_lower(mut self, nx2: usize, ny2: usize) -> Self {
        self.nx2 = nx2;
        self.ny2 = ny2;
        self
    }

    /// Set the attachment ratio.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Check the fixed-topology preconditions.
    ///
    /// Rejects zero subdivisions, an odd `ny1` (the seam must land on a grid
    /// row), `nx1 != nx2` (the seam row and the lower plate's top row must
    /// line up) and a `ratio` outside `[0, 1]`.
    pub fn validate(&self) -> MeshResult<()> {
        for (name, value) in [
            ("nx1", self.nx1),
            ("ny1", self.ny1),
            ("nx2", self.nx2),
            ("ny2", self.ny2),
        ] {
            if value == 0 {
                return Err(MeshError::invalid_param(
                    name,
                    value.to_string(),
                    format!("{} must be at least 1", name),
                ));
            }
        }

        if self.ny1 % 2 != 0 {
            return Err(MeshError::invalid_param(
                "ny1",
                self.ny1.to_string(),
                "ny1 must be even so the seam lands on grid row ny1/2",
            ));
        }

        if self.nx1 != self.nx2 {
            return Err(MeshError::invalid_param(
                "nx2",
                self.nx2.to_string(),
                format!(
                    "nx2 must equal nx1 ({}) for the seam row to align with the lower plate",
                    self.nx1
                ),
            ));
        }

        if !self.ratio.is_finite() || !(0.0..=1.0).contains(&self.ratio) {
            return Err(MeshError::invalid_param(
                "ratio",
                self.ratio.to_string(),
                "ratio must lie in [0, 1]",
            ));
        }

        debug!(params = ?self, "Parameters validated");
        Ok(())
    }

    /// Upper grid row the lower plate attaches to.
    #[inline]
    pub fn seam_row(&self) -> usize {
        self.ny1 / 2
    }

    /// Points in the upper plate.
    #[inline]
    pub fn upper_point_count(&self) -> usize {
        (self.ny1 + 1) * (self.nx1 + 1)
    }

    /// Points in the lower plate (its top row is shared through the connector).
    #[inline]
    pub fn lower_point_count(&self) -> usize {
        self.ny2 * (self.nx2 + 1)
    }

    /// Total points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.upper_point_count() + self.lower_point_count()
    }

    /// Cells (quads before any triangle split).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.nx1 * self.ny1 + self.nx1 + self.nx2 * self.ny2.saturating_sub(1)
    }

    /// Face elements actually emitted.
    #[inline]
    pub fn face_count(&self) -> usize {
        if self.quads {
            self.cell_count()
        } else {
            2 * self.cell_count()
        }
    }

    /// Boundary segments across all eight tags.
    #[inline]
    pub fn boundary_count(&self) -> usize {
        2 * self.nx1 + 2 * self.ny1 + 2 * self.nx2 + 2 * self.ny2
    }
}

#[cfg(feature = "params-config")]
impl TStructureParams {
    /// Parse parameters from a TOML string. Missing fields keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Parse parameters from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Load parameters from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<std::path::Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MeshError::config_error(path, e.to_string()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let params = if is_json {
            Self::from_json(&contents).map_err(|e| MeshError::config_error(path, e.to_string()))?
        } else {
            Self::from_toml(&contents).map_err(|e| MeshError::config_error(path, e.to_string()))?
        };

        debug!(path = %path.display(), ?params, "Loaded parameters");
        Ok(params)
    }

    /// Save parameters as TOML.
    pub fn save_toml(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        let path = path.as_ref();
        let toml_str = self
            .to_toml()
            .map_err(|e| MeshError::config_error(path, e.to_string()))?;
        std::fs::write(path, toml_str).map_err(|e| MeshError::io_write(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_defaults_match_reference_signature() {
        let p = TStructureParams::default();
        assert!(p.quads);
        assert_eq!((p.nx1, p.ny1, p.nx2, p.ny2), (4, 4, 4, 4));
        assert_eq!(p.ratio, 0.5);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_closed_form_counts() {
        let p = TStructureParams::uniform(2);
        assert_eq!(p.upper_point_count(), 9);
        assert_eq!(p.lower_point_count(), 6);
        assert_eq!(p.point_count(), 15);
        assert_eq!(p.cell_count(), 2 * 2 + 2 + 2);
        assert_eq!(p.face_count(), 8);
        assert_eq!(p.clone().triangles().face_count(), 16);
        assert_eq!(p.boundary_count(), 16);
        assert_eq!(p.seam_row(), 1);
    }

    #[test]
    fn test_rejects_odd_ny1() {
        let err = TStructureParams::default()
            .with_upper(4, 3)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParams);
        assert!(err.to_string().contains("even"));
    }

    #[test]
    fn test_rejects_zero_subdivisions() {
        let err = TStructureParams::default()
            .with_lower(4, 0)
            .validate()
            .unwrap_err();
        match err {
            MeshError::InvalidParams { param_name, .. } => {
                assert_eq!(param_name.as_deref(), Some("ny2"))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_rejects_misaligned_seam() {
        let p = TStructureParams::default().with_lower(3, 4);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_ratio_range() {
        let base = TStructureParams::default();
        assert!(base.clone().with_ratio(0.0).validate().is_ok());
        assert!(base.clone().with_ratio(1.0).validate().is_ok());
        assert!(base.clone().with_ratio(-0.01).validate().is_err());
        assert!(base.clone().with_ratio(1.5).validate().is_err());
        assert!(base.with_ratio(f64::NAN).validate().is_err());
    }

    #[cfg(feature = "params-config")]
    #[test]
    fn test_toml_partial_fields_keep_defaults() {
        let p = TStructureParams::from_toml("quads = false\nnx1 = 6\nnx2 = 6\n").unwrap();
        assert!(!p.quads);
        assert_eq!(p.nx1, 6);
        assert_eq!(p.ny1, 4);
        assert_eq!(p.ratio, 0.5);
    }

    #[cfg(feature = "params-config")]
    #[test]
    fn test_json_and_file_roundtrip() {
        let p = TStructureParams::from_json(r#"{"ny2": 7, "ratio": 0.25}"#).unwrap();
        assert_eq!(p.ny2, 7);
        assert_eq!(p.ratio, 0.25);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.toml");
        p.save_toml(&path).unwrap();
        assert_eq!(TStructureParams::load(&path).unwrap(), p);
    }

    #[cfg(feature = "params-config")]
    #[test]
    fn test_load_missing_file() {
        let err = TStructureParams::load("/nonexistent/params.toml").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }
}
