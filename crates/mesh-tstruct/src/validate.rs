//! Shell mesh validation and reporting.
//!
//! Checks the properties a solver relies on: every named boundary is a
//! single, consistently oriented chain without repeated points, every open
//! edge of the surface carries a boundary tag, and no face has zero area.

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::ShellMesh;

const DEGENERATE_AREA: f64 = 1e-12;

/// Severity levels for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// Informational, no action needed.
    Info,
    /// Warning, mesh may have issues.
    Warning,
    /// Error, mesh is invalid.
    Error,
}

/// A problem found while validating a shell mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellIssue {
    /// A named boundary has no segments.
    EmptyBoundary { name: String },
    /// A boundary's segments form more than one piece.
    DisconnectedBoundary { name: String, pieces: usize },
    /// A boundary visits a point more than once (branch or closed loop).
    RepeatedPoint { name: String, point: u32 },
    /// Two segments of a boundary leave, or enter, the same point.
    InconsistentOrientation { name: String },
    /// An element references a point index past the end of the point list.
    InvalidPointIndex {
        kind: &'static str,
        element_index: usize,
        point: u32,
        point_count: usize,
    },
    /// A face references a face descriptor that does not exist.
    UnknownFaceDescriptor { face_index: usize, descriptor: usize },
    /// A segment uses a tag without a name.
    UnnamedTag { index: u32 },
    /// A surface edge with a single adjacent face that no segment covers.
    UntaggedOpenEdge { vertex_a: u32, vertex_b: u32 },
    /// A face with (near) zero area.
    DegenerateFace { face_index: usize, area: f64 },
}

impl ShellIssue {
    /// Returns a severity level for the issue.
    pub fn severity(&self) -> IssueSeverity {
        match self {
            ShellIssue::EmptyBoundary { .. } => IssueSeverity::Warning,
            ShellIssue::DisconnectedBoundary { .. } => IssueSeverity::Error,
            ShellIssue::RepeatedPoint { .. } => IssueSeverity::Error,
            ShellIssue::InconsistentOrientation { .. } => IssueSeverity::Warning,
            ShellIssue::InvalidPointIndex { .. } => IssueSeverity::Error,
            ShellIssue::UnknownFaceDescriptor { .. } => IssueSeverity::Error,
            ShellIssue::UnnamedTag { .. } => IssueSeverity::Error,
            ShellIssue::UntaggedOpenEdge { .. } => IssueSeverity::Warning,
            ShellIssue::DegenerateFace { .. } => IssueSeverity::Error,
        }
    }
}

impl std::fmt::Display for ShellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellIssue::EmptyBoundary { name } => write!(f, "boundary '{}' has no segments", name),
            ShellIssue::DisconnectedBoundary { name, pieces } => {
                write!(f, "boundary '{}' is split into {} pieces", name, pieces)
            }
            ShellIssue::RepeatedPoint { name, point } => {
                write!(f, "boundary '{}' visits point {} more than once", name, point)
            }
            ShellIssue::InconsistentOrientation { name } => {
                write!(f, "boundary '{}' has inconsistently oriented segments", name)
            }
            ShellIssue::InvalidPointIndex {
                kind,
                element_index,
                point,
                point_count,
            } => write!(
                f,
                "{} {} references point {}, but the mesh has {} points",
                kind, element_index, point, point_count
            ),
            ShellIssue::UnknownFaceDescriptor {
                face_index,
                descriptor,
            } => write!(
                f,
                "face {} uses face descriptor {} which does not exist",
                face_index, descriptor
            ),
            ShellIssue::UnnamedTag { index } => {
                write!(f, "segments use boundary tag {} which has no name", index)
            }
            ShellIssue::UntaggedOpenEdge { vertex_a, vertex_b } => {
                write!(
                    f,
                    "open edge ({}, {}) is not covered by any boundary",
                    vertex_a, vertex_b
                )
            }
            ShellIssue::DegenerateFace { face_index, area } => {
                write!(f, "face {} is degenerate (area: {:.2e})", face_index, area)
            }
        }
    }
}

/// Per-boundary summary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryReport {
    pub index: u32,
    pub name: String,
    pub segment_count: usize,
    /// Connected, no repeated points.
    pub is_simple_path: bool,
    /// No point is the start, or the end, of more than one segment.
    pub is_oriented: bool,
    /// First and last point of an oriented simple path.
    pub endpoints: Option<[u32; 2]>,
}

/// Validation report for a shell mesh.
#[derive(Debug, Clone)]
pub struct ShellMeshReport {
    pub point_count: usize,
    pub face_count: usize,
    pub quad_count: usize,
    pub triangle_count: usize,
    pub segment_count: usize,
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
    pub surface_area: f64,
    /// Surface edges with exactly one adjacent face.
    pub open_edge_count: usize,
    /// Surface edges shared by more than two faces (the T-junction seam).
    pub junction_edge_count: usize,
    pub boundaries: Vec<BoundaryReport>,
    pub issues: Vec<ShellIssue>,
}

impl ShellMeshReport {
    /// No error-level issues.
    pub fn is_valid(&self) -> bool {
        self.face_count > 0
            && self
                .issues
                .iter()
                .all(|i| i.severity() < IssueSeverity::Error)
    }

    /// Report for one boundary by name.
    pub fn boundary(&self, name: &str) -> Option<&BoundaryReport> {
        self.boundaries.iter().find(|b| b.name == name)
    }
}

impl std::fmt::Display for ShellMeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Shell Mesh Report:")?;
        writeln!(f, "  Points: {}", self.point_count)?;
        writeln!(
            f,
            "  Faces: {} ({} quads, {} triangles)",
            self.face_count, self.quad_count, self.triangle_count
        )?;
        writeln!(f, "  Segments: {}", self.segment_count)?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        writeln!(f, "  Surface Area: {:.4}", self.surface_area)?;
        writeln!(
            f,
            "  Edges: {} open, {} junction",
            self.open_edge_count, self.junction_edge_count
        )?;

        writeln!(f, "  Boundaries:")?;
        for b in &self.boundaries {
            writeln!(
                f,
                "    {} {:<12} {:>4} segments{}",
                b.index,
                b.name,
                b.segment_count,
                if b.is_simple_path { "" } else { " (broken)" }
            )?;
        }

        if self.issues.is_empty() {
            writeln!(f, "  Issues: none")?;
        } else {
            writeln!(f, "  Issues:")?;
            for issue in &self.issues {
                writeln!(f, "    [{:?}] {}", issue.severity(), issue)?;
            }
        }
        Ok(())
    }
}

/// Validate a shell mesh.
pub fn validate_shell_mesh(mesh: &ShellMesh) -> ShellMeshReport {
    let mut issues = Vec::new();

    let quad_count = mesh.faces.iter().filter(|f| f.polygon.len() == 4).count();
    let triangle_count = mesh.face_count() - quad_count;

    let point_count = mesh.point_count();
    let mut surface_area = 0.0;
    for (face_index, face) in mesh.faces.iter().enumerate() {
        if face.face_index == 0 || face.face_index > mesh.face_descriptors.len() {
            issues.push(ShellIssue::UnknownFaceDescriptor {
                face_index,
                descriptor: face.face_index,
            });
        }

        // Area needs every corner in range
        let corners = face.polygon.corners();
        if let Some(&point) = corners.iter().find(|&&p| p as usize >= point_count) {
            issues.push(ShellIssue::InvalidPointIndex {
                kind: "face",
                element_index: face_index,
                point,
                point_count,
            });
            continue;
        }

        let area = polygon_area(&mesh.points, face.polygon.triangles());
        surface_area += area;
        if area < DEGENERATE_AREA {
            issues.push(ShellIssue::DegenerateFace { face_index, area });
        }
    }

    for (element_index, seg) in mesh.segments.iter().enumerate() {
        if let Some(&point) = seg.points.iter().find(|&&p| p as usize >= point_count) {
            issues.push(ShellIssue::InvalidPointIndex {
                kind: "segment",
                element_index,
                point,
                point_count,
            });
        }
    }

    // Surface edge usage
    let mut edge_faces: HashMap<(u32, u32), usize> = HashMap::new();
    for face in &mesh.faces {
        let c = face.polygon.corners();
        for k in 0..c.len() {
            *edge_faces
                .entry(edge_key(c[k], c[(k + 1) % c.len()]))
                .or_default() += 1;
        }
    }
    let tagged: HashSet<(u32, u32)> = mesh
        .segments
        .iter()
        .map(|s| edge_key(s.points[0], s.points[1]))
        .collect();

    let mut open_edges: Vec<(u32, u32)> = edge_faces
        .iter()
        .filter(|&(_, &n)| n == 1)
        .map(|(&e, _)| e)
        .collect();
    open_edges.sort_unstable();
    let junction_edge_count = edge_faces.values().filter(|&&n| n > 2).count();

    for &(a, b) in &open_edges {
        if !tagged.contains(&(a, b)) {
            issues.push(ShellIssue::UntaggedOpenEdge {
                vertex_a: a,
                vertex_b: b,
            });
        }
    }

    let mut used_tags: Vec<u32> = mesh.segments.iter().map(|s| s.index).collect();
    used_tags.sort_unstable();
    used_tags.dedup();
    for index in used_tags {
        if mesh.cd2_name(index).is_none() {
            issues.push(ShellIssue::UnnamedTag { index });
        }
    }

    let boundaries: Vec<BoundaryReport> = mesh
        .boundary_names()
        .map(|(index, name)| {
            let chain: Vec<[u32; 2]> = mesh
                .segments
                .iter()
                .filter(|s| s.index == index)
                .map(|s| s.points)
                .collect();
            analyze_chain(index, name, &chain, &mut issues)
        })
        .collect();

    let report = ShellMeshReport {
        point_count: mesh.point_count(),
        face_count: mesh.face_count(),
        quad_count,
        triangle_count,
        segment_count: mesh.segment_count(),
        bounds: mesh.bounds(),
        surface_area,
        open_edge_count: open_edges.len(),
        junction_edge_count,
        boundaries,
        issues,
    };

    debug!(
        issues = report.issues.len(),
        open_edges = report.open_edge_count,
        junction_edges = report.junction_edge_count,
        "Validated shell mesh"
    );
    report
}

/// Classify one boundary chain.
///
/// The chain is a simple path when its points form a single connected
/// component with one more point than segments and no point of degree > 2.
fn analyze_chain(
    index: u32,
    name: &str,
    chain: &[[u32; 2]],
    issues: &mut Vec<ShellIssue>,
) -> BoundaryReport {
    if chain.is_empty() {
        issues.push(ShellIssue::EmptyBoundary {
            name: name.to_string(),
        });
        return BoundaryReport {
            index,
            name: name.to_string(),
            segment_count: 0,
            is_simple_path: false,
            is_oriented: false,
            endpoints: None,
        };
    }

    let mut adjacency: HashMap<u32, Vec<u32>> = HashMap::new();
    for &[a, b] in chain {
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let mut repeated: Vec<u32> = adjacency
        .iter()
        .filter(|(_, n)| n.len() > 2)
        .map(|(&p, _)| p)
        .collect();
    repeated.sort_unstable();

    let pieces = count_components(&adjacency);
    // A closed loop has as many points as segments
    let closed = pieces == 1 && adjacency.len() == chain.len();

    if pieces > 1 {
        issues.push(ShellIssue::DisconnectedBoundary {
            name: name.to_string(),
            pieces,
        });
    }
    if closed && repeated.is_empty() {
        repeated.push(chain[0][0]);
    }
    for &point in &repeated {
        issues.push(ShellIssue::RepeatedPoint {
            name: name.to_string(),
            point,
        });
    }

    let is_simple_path = pieces == 1 && repeated.is_empty();

    // Segment order is irrelevant; only direction counts
    let mut out_degree: HashMap<u32, usize> = HashMap::new();
    let mut in_degree: HashMap<u32, usize> = HashMap::new();
    for &[a, b] in chain {
        *out_degree.entry(a).or_default() += 1;
        *in_degree.entry(b).or_default() += 1;
    }
    let is_oriented =
        out_degree.values().all(|&n| n <= 1) && in_degree.values().all(|&n| n <= 1);
    if is_simple_path && !is_oriented {
        issues.push(ShellIssue::InconsistentOrientation {
            name: name.to_string(),
        });
    }

    let endpoints = if is_simple_path && is_oriented {
        let start = out_degree.keys().find(|p| !in_degree.contains_key(*p));
        let end = in_degree.keys().find(|p| !out_degree.contains_key(*p));
        match (start, end) {
            (Some(&start), Some(&end)) => Some([start, end]),
            _ => None,
        }
    } else {
        None
    };

    BoundaryReport {
        index,
        name: name.to_string(),
        segment_count: chain.len(),
        is_simple_path,
        is_oriented,
        endpoints,
    }
}

fn count_components(adjacency: &HashMap<u32, Vec<u32>>) -> usize {
    let mut seen: HashSet<u32> = HashSet::with_capacity(adjacency.len());
    let mut pieces = 0;
    for &start in adjacency.keys() {
        if !seen.insert(start) {
            continue;
        }
        pieces += 1;
        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            for &q in &adjacency[&p] {
                if seen.insert(q) {
                    stack.push(q);
                }
            }
        }
    }
    pieces
}

fn polygon_area(points: &[Point3<f64>], triangles: Vec<[u32; 3]>) -> f64 {
    triangles
        .into_iter()
        .map(|[a, b, c]| {
            let pa = points[a as usize];
            let ab: Vector3<f64> = points[b as usize] - pa;
            let ac: Vector3<f64> = points[c as usize] - pa;
            ab.cross(&ac).norm() * 0.5
        })
        .sum()
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}
