//! Error types for mesh construction with rich diagnostics.
//!
//! This module provides error handling with:
//! - Machine-readable error codes for programmatic handling
//! - Location context (which element, which point handle, which file)
//! - Recovery suggestions for common issues
//! - Terminal display via miette
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `TMESH-XXXX`:
//! - `TMESH-1xxx`: Parameter and configuration errors
//! - `TMESH-2xxx`: Builder and topology errors
//! - `TMESH-3xxx`: Export errors
//!
//! # Example
//!
//! ```
//! use mesh_tstruct::{ErrorCode, MeshError};
//!
//! let err = MeshError::invalid_param("ny1", "3", "must be even");
//! assert_eq!(err.code(), ErrorCode::InvalidParams);
//! assert_eq!(err.code().as_str(), "TMESH-1001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes.
///
/// Codes follow the pattern `TMESH-XXXX` where:
/// - 1xxx = Parameter errors
/// - 2xxx = Builder/topology errors
/// - 3xxx = Export errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// TMESH-1001: Invalid generation parameters
    InvalidParams = 1001,
    /// TMESH-1002: Parameter file could not be read or parsed
    ConfigError = 1002,

    /// TMESH-2001: Element references a point handle the builder never issued
    InvalidPointHandle = 2001,
    /// TMESH-2002: Face element references an unregistered face descriptor
    UnknownFaceDescriptor = 2002,
    /// TMESH-2003: Element repeats one of its points
    DegenerateElement = 2003,
    /// TMESH-2004: Mesh has no face elements
    EmptyMesh = 2004,
    /// TMESH-2005: Boundary element carries a tag with no name
    UnnamedBoundary = 2005,
    /// TMESH-2006: Boundary tag index is zero
    InvalidBoundaryIndex = 2006,

    /// TMESH-3001: Failed to write file
    IoWrite = 3001,
    /// TMESH-3002: Unsupported output format
    UnsupportedFormat = 3002,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `TMESH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParams => "TMESH-1001",
            ErrorCode::ConfigError => "TMESH-1002",
            ErrorCode::InvalidPointHandle => "TMESH-2001",
            ErrorCode::UnknownFaceDescriptor => "TMESH-2002",
            ErrorCode::DegenerateElement => "TMESH-2003",
            ErrorCode::EmptyMesh => "TMESH-2004",
            ErrorCode::UnnamedBoundary => "TMESH-2005",
            ErrorCode::InvalidBoundaryIndex => "TMESH-2006",
            ErrorCode::IoWrite => "TMESH-3001",
            ErrorCode::UnsupportedFormat => "TMESH-3002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for mesh errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Adjust parameters for the operation.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// Register the missing entity before referencing it.
    RegisterFirst { entity: String },
    /// Use a different file format.
    UseDifferentFormat { suggested: Vec<String> },
    /// Check the environment (paths, permissions).
    CheckEnvironment { checks: Vec<String> },
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
            RecoverySuggestion::RegisterFirst { entity } => {
                write!(f, "Register the {} before adding elements that use it", entity)
            }
            RecoverySuggestion::UseDifferentFormat { suggested } => {
                write!(f, "Try using a different format: {}", suggested.join(", "))
            }
            RecoverySuggestion::CheckEnvironment { checks } => {
                write!(f, "Check: {}", checks.join(", "))
            }
            RecoverySuggestion::None => {
                write!(f, "No automatic recovery available")
            }
        }
    }
}

/// Location information for mesh errors.
#[derive(Debug, Clone)]
pub enum MeshLocation {
    /// Error at a face element.
    Face { index: usize },
    /// Error at a boundary (segment) element.
    Segment { index: usize },
    /// Error at a named or numbered boundary tag.
    Boundary { index: u32 },
    /// Error in a file.
    File { path: PathBuf },
    /// Error in a generation parameter.
    Parameter { name: String },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::Face { index } => write!(f, "face element {}", index),
            MeshLocation::Segment { index } => write!(f, "segment element {}", index),
            MeshLocation::Boundary { index } => write!(f, "boundary tag {}", index),
            MeshLocation::File { path } => write!(f, "{}", path.display()),
            MeshLocation::Parameter { name } => write!(f, "parameter `{}`", name),
        }
    }
}

/// Renders ` (nx1 = 0)` for parameter errors that name a value.
fn param_suffix(name: &Option<String>, value: &Option<String>) -> String {
    match (name, value) {
        (Some(name), Some(value)) => format!(" ({} = {})", name, value),
        (None, Some(value)) => format!(" (got {})", value),
        _ => String::new(),
    }
}

/// Errors that can occur while building or exporting a mesh.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Invalid generation parameters.
    #[error("invalid mesh parameters: {details}{}", param_suffix(.param_name, .param_value))]
    #[diagnostic(
        code(tmesh::params::invalid),
        help("Subdivisions must be >= 1, ny1 must be even, nx1 must equal nx2 and ratio must lie in [0, 1].")
    )]
    InvalidParams {
        details: String,
        param_name: Option<String>,
        param_value: Option<String>,
    },

    /// Parameter file could not be read or parsed.
    #[error("failed to load parameters from {path}: {details}")]
    #[diagnostic(
        code(tmesh::params::config),
        help("Parameter files are TOML (or JSON) tables with the fields quads, nx1, ny1, nx2, ny2 and ratio.")
    )]
    ConfigError { path: PathBuf, details: String },

    /// Element references a point handle that was never issued.
    #[error(
        "invalid point handle: {kind} element {element_index} references point {handle}, but only {point_count} points are registered"
    )]
    #[diagnostic(
        code(tmesh::builder::point_handle),
        help("Points must be added to the builder before any element references them.")
    )]
    InvalidPointHandle {
        kind: &'static str,
        element_index: usize,
        handle: u32,
        point_count: usize,
    },

    /// Face element references an unregistered face descriptor.
    #[error(
        "face element {element_index} uses face descriptor {index}, but only {descriptor_count} are registered"
    )]
    #[diagnostic(
        code(tmesh::builder::face_descriptor),
        help("Add a FaceDescriptor before adding face elements that use it.")
    )]
    UnknownFaceDescriptor {
        element_index: usize,
        index: usize,
        descriptor_count: usize,
    },

    /// Element uses the same point more than once.
    #[error("degenerate {kind} element {element_index}: point {handle} appears more than once")]
    #[diagnostic(
        code(tmesh::builder::degenerate),
        help("Every corner of an element must be a distinct point.")
    )]
    DegenerateElement {
        kind: &'static str,
        element_index: usize,
        handle: u32,
    },

    /// Mesh has no face elements.
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(tmesh::builder::empty),
        help("A shell mesh needs at least one face element before it can be compressed.")
    )]
    EmptyMesh { details: String },

    /// Boundary element uses a tag with no registered name.
    #[error("boundary tag {index} is used by {element_count} segment(s) but has no name")]
    #[diagnostic(
        code(tmesh::builder::unnamed_boundary),
        help("Call set_cd2_name for every boundary index used by segment elements.")
    )]
    UnnamedBoundary { index: u32, element_count: usize },

    /// Boundary tag index is zero.
    #[error("boundary tag indices are 1-based, got {index}")]
    #[diagnostic(code(tmesh::builder::boundary_index))]
    InvalidBoundaryIndex { index: u32 },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(tmesh::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unsupported output format.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(
        code(tmesh::format::unsupported),
        help("Supported formats: MSH (Gmsh 2.2), VTK (legacy ASCII), OBJ")
    )]
    UnsupportedFormat { extension: Option<String> },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::InvalidParams { .. } => ErrorCode::InvalidParams,
            MeshError::ConfigError { .. } => ErrorCode::ConfigError,
            MeshError::InvalidPointHandle { .. } => ErrorCode::InvalidPointHandle,
            MeshError::UnknownFaceDescriptor { .. } => ErrorCode::UnknownFaceDescriptor,
            MeshError::DegenerateElement { .. } => ErrorCode::DegenerateElement,
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::UnnamedBoundary { .. } => ErrorCode::UnnamedBoundary,
            MeshError::InvalidBoundaryIndex { .. } => ErrorCode::InvalidBoundaryIndex,
            MeshError::IoWrite { .. } => ErrorCode::IoWrite,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            MeshError::InvalidParams {
                param_name,
                details,
                ..
            } => RecoverySuggestion::AdjustParameters {
                parameters: vec![(
                    param_name.clone().unwrap_or_else(|| "parameters".into()),
                    details.clone(),
                )],
            },
            MeshError::ConfigError { .. } => RecoverySuggestion::CheckEnvironment {
                checks: vec!["file exists".into(), "field names and types".into()],
            },
            MeshError::InvalidPointHandle { .. } => RecoverySuggestion::RegisterFirst {
                entity: "point".into(),
            },
            MeshError::UnknownFaceDescriptor { .. } => RecoverySuggestion::RegisterFirst {
                entity: "face descriptor".into(),
            },
            MeshError::UnnamedBoundary { index, .. } => RecoverySuggestion::RegisterFirst {
                entity: format!("name of boundary {}", index),
            },
            MeshError::DegenerateElement { .. }
            | MeshError::EmptyMesh { .. }
            | MeshError::InvalidBoundaryIndex { .. } => RecoverySuggestion::None,
            MeshError::IoWrite { .. } => RecoverySuggestion::CheckEnvironment {
                checks: vec!["directory exists".into(), "write permissions".into()],
            },
            MeshError::UnsupportedFormat { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["MSH".into(), "VTK".into(), "OBJ".into()],
            },
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::InvalidParams {
                param_name: Some(name),
                ..
            } => Some(MeshLocation::Parameter { name: name.clone() }),
            MeshError::InvalidPointHandle {
                kind, element_index, ..
            }
            | MeshError::DegenerateElement {
                kind, element_index, ..
            } => Some(if *kind == "face" {
                MeshLocation::Face {
                    index: *element_index,
                }
            } else {
                MeshLocation::Segment {
                    index: *element_index,
                }
            }),
            MeshError::UnknownFaceDescriptor { element_index, .. } => Some(MeshLocation::Face {
                index: *element_index,
            }),
            MeshError::UnnamedBoundary { index, .. }
            | MeshError::InvalidBoundaryIndex { index } => {
                Some(MeshLocation::Boundary { index: *index })
            }
            MeshError::ConfigError { path, .. } | MeshError::IoWrite { path, .. } => {
                Some(MeshLocation::File { path: path.clone() })
            }
            _ => None,
        }
    }

    // Constructor helpers

    /// Create an invalid params error with param info.
    pub fn invalid_param(
        param_name: impl Into<String>,
        param_value: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        MeshError::InvalidParams {
            details: details.into(),
            param_name: Some(param_name.into()),
            param_value: Some(param_value.into()),
        }
    }

    /// Create a config error.
    pub fn config_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        MeshError::ConfigError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: Option<String>) -> Self {
        MeshError::UnsupportedFormat { extension }
    }
}
