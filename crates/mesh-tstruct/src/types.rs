//! Core mesh data types.

use nalgebra::{Point3, Vector3};

/// Opaque handle for a point registered with a [`MeshBuilder`](crate::MeshBuilder).
///
/// Handles are issued by the builder in insertion order. Callers keep them in
/// their own index-to-handle table and pass them back when adding elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub(crate) u32);

impl PointId {
    /// Raw handle value, stable for the lifetime of the builder that issued it.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Corner list of a surface element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polygon<T> {
    /// Three corners, counter-clockwise.
    Triangle([T; 3]),
    /// Four corners, counter-clockwise.
    Quad([T; 4]),
}

impl<T: Copy> Polygon<T> {
    /// Corners in order.
    #[inline]
    pub fn corners(&self) -> &[T] {
        match self {
            Polygon::Triangle(c) => c.as_slice(),
            Polygon::Quad(c) => c.as_slice(),
        }
    }

    /// Number of corners (3 or 4).
    #[inline]
    pub fn len(&self) -> usize {
        self.corners().len()
    }

    /// Always false; a polygon has at least three corners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Apply `f` to every corner.
    pub fn map<U, F: FnMut(T) -> U>(&self, mut f: F) -> Polygon<U> {
        match *self {
            Polygon::Triangle([a, b, c]) => Polygon::Triangle([f(a), f(b), f(c)]),
            Polygon::Quad([a, b, c, d]) => Polygon::Quad([f(a), f(b), f(c), f(d)]),
        }
    }

    /// Split into triangles.
    ///
    /// A quad `[a, b, c, d]` is cut along its `b`-`d` diagonal into
    /// `[a, b, d]` and `[b, c, d]`; a triangle is returned unchanged.
    pub fn triangles(&self) -> Vec<[T; 3]> {
        match *self {
            Polygon::Triangle(t) => vec![t],
            Polygon::Quad([a, b, c, d]) => vec![[a, b, d], [b, c, d]],
        }
    }
}

/// Surface/domain descriptor grouping face elements.
///
/// Indices are 1-based; `domout = 0` means the outside of a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceDescriptor {
    pub surfnr: usize,
    pub domin: usize,
    pub domout: usize,
    pub bc: usize,
}

impl FaceDescriptor {
    /// Descriptor for a one-sided shell surface.
    pub fn new(surfnr: usize, domin: usize, bc: usize) -> Self {
        Self {
            surfnr,
            domin,
            domout: 0,
            bc,
        }
    }
}

/// Face element as handed to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element2D {
    /// 1-based face descriptor index.
    pub face_index: usize,
    pub polygon: Polygon<PointId>,
}

impl Element2D {
    pub fn new(face_index: usize, polygon: Polygon<PointId>) -> Self {
        Self {
            face_index,
            polygon,
        }
    }
}

/// Segment (edge) element as handed to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element1D {
    pub points: [PointId; 2],
    /// 1-based boundary tag, resolved to a name through the CD2 name table.
    pub index: u32,
}

impl Element1D {
    pub fn new(points: [PointId; 2], index: u32) -> Self {
        Self { points, index }
    }
}

/// Face element of a finalized mesh, corners are point indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceElement {
    pub face_index: usize,
    pub polygon: Polygon<u32>,
}

/// Segment element of a finalized mesh, endpoints are point indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentElement {
    pub points: [u32; 2],
    pub index: u32,
}

/// A compressed shell mesh ready for finite-element use.
///
/// Produced by [`MeshBuilder::compress`](crate::MeshBuilder::compress). Point
/// indices are dense and follow the insertion order of the referenced points.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellMesh {
    /// Ambient dimension (always 3 for shells).
    pub dim: usize,
    pub points: Vec<Point3<f64>>,
    pub face_descriptors: Vec<FaceDescriptor>,
    pub faces: Vec<SurfaceElement>,
    pub segments: Vec<SegmentElement>,
    /// Boundary names, slot `i` holds the name of tag `i + 1`.
    pub cd2_names: Vec<Option<String>>,
}

impl ShellMesh {
    /// Number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of face elements.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of boundary segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// True when every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces
            .iter()
            .all(|f| matches!(f.polygon, Polygon::Quad(_)))
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.points.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Name of a boundary tag.
    pub fn cd2_name(&self, index: u32) -> Option<&str> {
        let slot = (index as usize).checked_sub(1)?;
        self.cd2_names.get(slot)?.as_deref()
    }

    /// Named boundary tags in index order.
    pub fn boundary_names(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.cd2_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.as_deref().map(|n| (i as u32 + 1, n)))
    }

    /// Tag index for a boundary name.
    pub fn boundary_index(&self, name: &str) -> Option<u32> {
        self.boundary_names()
            .find(|(_, n)| *n == name)
            .map(|(i, _)| i)
    }

    /// Segments of a named boundary, in insertion order.
    pub fn boundary_segments(&self, name: &str) -> Vec<[u32; 2]> {
        match self.boundary_index(name) {
            Some(index) => self
                .segments
                .iter()
                .filter(|s| s.index == index)
                .map(|s| s.points)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Segment count per named boundary, in index order.
    pub fn boundary_counts(&self) -> Vec<(String, usize)> {
        self.boundary_names()
            .map(|(index, name)| {
                let count = self.segments.iter().filter(|s| s.index == index).count();
                (name.to_string(), count)
            })
            .collect()
    }

    /// Faces as triangles, quads split along their second diagonal.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.faces.iter().flat_map(|f| f.polygon.triangles())
    }

    /// Total area of all face elements.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let pa = self.points[a as usize];
                let ab: Vector3<f64> = self.points[b as usize] - pa;
                let ac: Vector3<f64> = self.points[c as usize] - pa;
                ab.cross(&ac).norm() * 0.5
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> ShellMesh {
        ShellMesh {
            dim: 3,
            points: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            face_descriptors: vec![FaceDescriptor::new(1, 1, 1)],
            faces: vec![SurfaceElement {
                face_index: 1,
                polygon: Polygon::Quad([0, 1, 2, 3]),
            }],
            segments: vec![
                SegmentElement {
                    points: [0, 1],
                    index: 1,
                },
                SegmentElement {
                    points: [2, 3],
                    index: 3,
                },
            ],
            cd2_names: vec![Some("bottom".into()), None, Some("top".into())],
        }
    }

    #[test]
    fn test_quad_split_uses_second_diagonal() {
        let quad = Polygon::Quad([10, 11, 12, 13]);
        assert_eq!(quad.triangles(), vec![[10, 11, 13], [11, 12, 13]]);

        let tri = Polygon::Triangle([1, 2, 3]);
        assert_eq!(tri.triangles(), vec![[1, 2, 3]]);
        assert_eq!(tri.len(), 3);
    }

    #[test]
    fn test_polygon_map() {
        let quad = Polygon::Quad([0u32, 1, 2, 3]).map(|i| i as usize * 2);
        assert_eq!(quad, Polygon::Quad([0usize, 2, 4, 6]));
    }

    #[test]
    fn test_bounds_and_area() {
        let mesh = unit_square();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);
        assert!(mesh.is_quad_mesh());
    }

    #[test]
    fn test_boundary_lookup_skips_gaps() {
        let mesh = unit_square();
        let names: Vec<_> = mesh.boundary_names().collect();
        assert_eq!(names, vec![(1, "bottom"), (3, "top")]);
        assert_eq!(mesh.boundary_index("top"), Some(3));
        assert_eq!(mesh.cd2_name(2), None);
        assert_eq!(mesh.cd2_name(0), None);
        assert_eq!(mesh.boundary_segments("top"), vec![[2, 3]]);
        assert!(mesh.boundary_segments("left").is_empty());
        assert_eq!(
            mesh.boundary_counts(),
            vec![("bottom".to_string(), 1), ("top".to_string(), 1)]
        );
    }
}
