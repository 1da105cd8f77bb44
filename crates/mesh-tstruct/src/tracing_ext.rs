//! Tracing extensions for mesh operations.
//!
//! Structured logging and timing for mesh construction, built on the
//! `tracing` ecosystem. Nothing is emitted unless the application installs a
//! subscriber:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=mesh_tstruct=debug for per-stage counts,
//! // RUST_LOG=mesh_tstruct::timing=info for durations.
//! ```
//!
//! # Log Levels
//!
//! - **WARN**: Validation found issues
//! - **INFO**: Operation summaries, timing
//! - **DEBUG**: Layout and mesh counts
//! - **TRACE**: Detailed state dumps

use std::time::Instant;
use tracing::{Span, debug, info, trace, warn};

use crate::ShellMesh;
use crate::validate::ShellMeshReport;

/// A performance timer that logs duration on drop.
///
/// ```rust,ignore
/// fn build() {
///     let _timer = OperationTimer::new("build");
///     // ...
/// } // logs elapsed time here
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("mesh_operation", operation = name);
        debug!(target: "mesh_tstruct::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        let _entered = self.span.enter();
        info!(
            target: "mesh_tstruct::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log mesh statistics at debug level, with bounds at trace level.
pub fn log_mesh_stats(mesh: &ShellMesh, context: &str) {
    debug!(
        target: "mesh_tstruct::mesh_state",
        context = context,
        points = mesh.point_count(),
        faces = mesh.face_count(),
        segments = mesh.segment_count(),
        boundaries = mesh.boundary_names().count(),
        "Mesh state"
    );

    if let Some((min, max)) = mesh.bounds() {
        trace!(
            target: "mesh_tstruct::mesh_state",
            context = context,
            min = format!("({:.4}, {:.4}, {:.4})", min.x, min.y, min.z),
            max = format!("({:.4}, {:.4}, {:.4})", max.x, max.y, max.z),
            "Mesh bounds"
        );
    }
}

/// Log a validation result.
pub fn log_validation_result(report: &ShellMeshReport) {
    if report.is_valid() {
        info!(
            target: "mesh_tstruct::validation",
            points = report.point_count,
            faces = report.face_count,
            segments = report.segment_count,
            "Mesh validation passed"
        );
    } else {
        warn!(
            target: "mesh_tstruct::validation",
            issues = report.issues.len(),
            "Mesh validation found issues"
        );
    }
}

/// Log a file export.
pub fn log_io_operation(path: &std::path::Path, format: &str, success: bool) {
    if success {
        info!(
            target: "mesh_tstruct::io",
            path = path.display().to_string(),
            format = format,
            "Mesh written"
        );
    } else {
        warn!(
            target: "mesh_tstruct::io",
            path = path.display().to_string(),
            format = format,
            "Mesh write failed"
        );
    }
}
