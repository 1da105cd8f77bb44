//! Incremental mesh builder.
//!
//! [`MeshBuilder`] collects points, face descriptors, face and segment
//! elements, and boundary names, then [`compress`](MeshBuilder::compress)es
//! them into a [`ShellMesh`]. Points are identified by opaque [`PointId`]
//! handles issued on insertion; callers keep their own index-to-handle table.
//!
//! # Example
//!
//! ```
//! use mesh_tstruct::{Element1D, Element2D, FaceDescriptor, MeshBuilder, Polygon};
//! use nalgebra::Point3;
//!
//! let mut builder = MeshBuilder::new();
//! let ids: Vec<_> = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
//!     .iter()
//!     .map(|&[x, y]| builder.add_point(Point3::new(x, y, 0.0)))
//!     .collect();
//!
//! let fd = builder.add_face_descriptor(FaceDescriptor::new(1, 1, 1));
//! builder
//!     .add_element_2d(Element2D::new(fd, Polygon::Quad([ids[0], ids[1], ids[2], ids[3]])))
//!     .unwrap();
//! builder.add_element_1d(Element1D::new([ids[0], ids[1]], 1)).unwrap();
//! builder.set_cd2_name(1, "bottom").unwrap();
//!
//! let mesh = builder.compress().unwrap();
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.boundary_segments("bottom"), vec![[0, 1]]);
//! ```

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::types::{
    Element1D, Element2D, FaceDescriptor, PointId, SegmentElement, ShellMesh, SurfaceElement,
};

/// Mutable registry of mesh entities.
///
/// Elements are checked as they are added: every point handle must have been
/// issued by this builder, face elements must reference a registered face
/// descriptor, and no element may repeat a point.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    points: Vec<Point3<f64>>,
    face_descriptors: Vec<FaceDescriptor>,
    elements_2d: Vec<Element2D>,
    elements_1d: Vec<Element1D>,
    cd2_names: Vec<Option<String>>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with pre-allocated capacity.
    pub fn with_capacity(points: usize, faces: usize, segments: usize) -> Self {
        Self {
            points: Vec::with_capacity(points),
            elements_2d: Vec::with_capacity(faces),
            elements_1d: Vec::with_capacity(segments),
            ..Self::default()
        }
    }

    /// Register a point and return its handle.
    pub fn add_point(&mut self, position: Point3<f64>) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points.push(position);
        id
    }

    /// Register a face descriptor, returning its 1-based index.
    pub fn add_face_descriptor(&mut self, descriptor: FaceDescriptor) -> usize {
        self.face_descriptors.push(descriptor);
        self.face_descriptors.len()
    }

    /// Add a face element.
    pub fn add_element_2d(&mut self, element: Element2D) -> MeshResult<()> {
        let element_index = self.elements_2d.len();

        if element.face_index == 0 || element.face_index > self.face_descriptors.len() {
            return Err(MeshError::UnknownFaceDescriptor {
                element_index,
                index: element.face_index,
                descriptor_count: self.face_descriptors.len(),
            });
        }
        self.check_points("face", element_index, element.polygon.corners())?;

        self.elements_2d.push(element);
        Ok(())
    }

    /// Add a segment element.
    pub fn add_element_1d(&mut self, element: Element1D) -> MeshResult<()> {
        let element_index = self.elements_1d.len();

        if element.index == 0 {
            return Err(MeshError::InvalidBoundaryIndex { index: 0 });
        }
        self.check_points("segment", element_index, &element.points)?;

        self.elements_1d.push(element);
        Ok(())
    }

    /// Name a boundary (co-dimension 2) tag. Renaming replaces the old name.
    pub fn set_cd2_name(&mut self, index: u32, name: impl Into<String>) -> MeshResult<()> {
        let slot = (index as usize)
            .checked_sub(1)
            .ok_or(MeshError::InvalidBoundaryIndex { index })?;
        if self.cd2_names.len() <= slot {
            self.cd2_names.resize(slot + 1, None);
        }
        self.cd2_names[slot] = Some(name.into());
        Ok(())
    }

    /// Number of registered points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of face elements added so far.
    pub fn face_count(&self) -> usize {
        self.elements_2d.len()
    }

    /// Number of segment elements added so far.
    pub fn segment_count(&self) -> usize {
        self.elements_1d.len()
    }

    /// Finalize into a [`ShellMesh`].
    ///
    /// Points no element references are dropped and the rest renumbered
    /// densely in insertion order. Fails when there are no face elements, or
    /// when a segment uses a boundary tag that was never named.
    pub fn compress(self) -> MeshResult<ShellMesh> {
        if self.elements_2d.is_empty() {
            return Err(MeshError::empty_mesh(format!(
                "{} points and {} segments but no face elements",
                self.points.len(),
                self.elements_1d.len()
            )));
        }

        let mut tag_usage: HashMap<u32, usize> = HashMap::new();
        for seg in &self.elements_1d {
            *tag_usage.entry(seg.index).or_default() += 1;
        }
        let mut used_tags: Vec<_> = tag_usage.into_iter().collect();
        used_tags.sort_unstable();
        for (index, element_count) in used_tags {
            let named = self
                .cd2_names
                .get(index as usize - 1)
                .is_some_and(|n| n.is_some());
            if !named {
                return Err(MeshError::UnnamedBoundary {
                    index,
                    element_count,
                });
            }
        }

        let mut used = vec![false; self.points.len()];
        for el in &self.elements_2d {
            for p in el.polygon.corners() {
                used[p.0 as usize] = true;
            }
        }
        for el in &self.elements_1d {
            for p in &el.points {
                used[p.0 as usize] = true;
            }
        }

        let mut renumber = vec![u32::MAX; self.points.len()];
        let mut points = Vec::with_capacity(self.points.len());
        for (old, position) in self.points.iter().enumerate() {
            if used[old] {
                renumber[old] = points.len() as u32;
                points.push(*position);
            }
        }
        let removed = self.points.len() - points.len();

        let faces: Vec<SurfaceElement> = self
            .elements_2d
            .iter()
            .map(|el| SurfaceElement {
                face_index: el.face_index,
                polygon: el.polygon.map(|p| renumber[p.0 as usize]),
            })
            .collect();

        let segments: Vec<SegmentElement> = self
            .elements_1d
            .iter()
            .map(|el| SegmentElement {
                points: [
                    renumber[el.points[0].0 as usize],
                    renumber[el.points[1].0 as usize],
                ],
                index: el.index,
            })
            .collect();

        if removed > 0 {
            debug!(removed, "Dropped unreferenced points");
        }
        info!(
            points = points.len(),
            faces = faces.len(),
            segments = segments.len(),
            "Mesh compressed"
        );

        Ok(ShellMesh {
            dim: 3,
            points,
            face_descriptors: self.face_descriptors,
            faces,
            segments,
            cd2_names: self.cd2_names,
        })
    }

    fn check_points(
        &self,
        kind: &'static str,
        element_index: usize,
        points: &[PointId],
    ) -> MeshResult<()> {
        for (i, p) in points.iter().enumerate() {
            if p.0 as usize >= self.points.len() {
                return Err(MeshError::InvalidPointHandle {
                    kind,
                    element_index,
                    handle: p.0,
                    point_count: self.points.len(),
                });
            }
            if points[..i].contains(p) {
                return Err(MeshError::DegenerateElement {
                    kind,
                    element_index,
                    handle: p.0,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::types::Polygon;

    fn square_builder() -> (MeshBuilder, Vec<PointId>, usize) {
        let mut builder = MeshBuilder::new();
        let ids: Vec<_> = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
            .iter()
            .map(|&[x, y]| builder.add_point(Point3::new(x, y, 0.0)))
            .collect();
        let fd = builder.add_face_descriptor(FaceDescriptor::new(1, 1, 1));
        (builder, ids, fd)
    }

    #[test]
    fn test_handles_issued_in_order() {
        let mut builder = MeshBuilder::new();
        let a = builder.add_point(Point3::origin());
        let b = builder.add_point(Point3::new(1.0, 0.0, 0.0));
        assert!(a < b);
        assert_eq!(builder.point_count(), 2);
        assert_eq!(builder.add_face_descriptor(FaceDescriptor::new(1, 1, 1)), 1);
        assert_eq!(builder.add_face_descriptor(FaceDescriptor::new(2, 1, 2)), 2);
    }

    #[test]
    fn test_rejects_foreign_handle() {
        let (mut builder, ids, fd) = square_builder();
        let mut other = MeshBuilder::new();
        for _ in 0..10 {
            other.add_point(Point3::origin());
        }
        let foreign = other.add_point(Point3::origin());

        let err = builder
            .add_element_2d(Element2D::new(
                fd,
                Polygon::Triangle([ids[0], ids[1], foreign]),
            ))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPointHandle);
        assert_eq!(builder.face_count(), 0);
    }

    #[test]
    fn test_rejects_unknown_descriptor() {
        let (mut builder, ids, _) = square_builder();
        let err = builder
            .add_element_2d(Element2D::new(
                2,
                Polygon::Triangle([ids[0], ids[1], ids[2]]),
            ))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownFaceDescriptor);
    }

    #[test]
    fn test_rejects_degenerate() {
        let (mut builder, ids, fd) = square_builder();
        let err = builder
            .add_element_2d(Element2D::new(
                fd,
                Polygon::Quad([ids[0], ids[1], ids[1], ids[3]]),
            ))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DegenerateElement);

        let err = builder
            .add_element_1d(Element1D::new([ids[2], ids[2]], 1))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DegenerateElement);
    }

    #[test]
    fn test_boundary_index_is_one_based() {
        let (mut builder, ids, _) = square_builder();
        assert!(builder.set_cd2_name(0, "nope").is_err());
        assert!(
            builder
                .add_element_1d(Element1D::new([ids[0], ids[1]], 0))
                .is_err()
        );
    }

    #[test]
    fn test_compress_requires_faces() {
        let (builder, _, _) = square_builder();
        let err = builder.compress().unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyMesh);
    }

    #[test]
    fn test_compress_requires_names() {
        let (mut builder, ids, fd) = square_builder();
        builder
            .add_element_2d(Element2D::new(
                fd,
                Polygon::Quad([ids[0], ids[1], ids[2], ids[3]]),
            ))
            .unwrap();
        builder
            .add_element_1d(Element1D::new([ids[0], ids[1]], 3))
            .unwrap();
        builder.set_cd2_name(1, "bottom").unwrap();

        match builder.compress().unwrap_err() {
            MeshError::UnnamedBoundary {
                index,
                element_count,
            } => {
                assert_eq!(index, 3);
                assert_eq!(element_count, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_compress_drops_unused_points() {
        let mut builder = MeshBuilder::new();
        let stray = builder.add_point(Point3::new(9.0, 9.0, 9.0));
        let a = builder.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = builder.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = builder.add_point(Point3::new(0.0, 1.0, 0.0));
        let fd = builder.add_face_descriptor(FaceDescriptor::new(1, 1, 1));
        builder
            .add_element_2d(Element2D::new(fd, Polygon::Triangle([a, b, c])))
            .unwrap();
        assert_eq!(stray.raw(), 0);

        let mesh = builder.compress().unwrap();
        assert_eq!(mesh.point_count(), 3);
        assert_eq!(mesh.points[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.faces[0].polygon, Polygon::Triangle([0, 1, 2]));
        assert_eq!(mesh.dim, 3);
    }

    #[test]
    fn test_rename_boundary() {
        let (mut builder, ids, fd) = square_builder();
        builder
            .add_element_2d(Element2D::new(
                fd,
                Polygon::Quad([ids[0], ids[1], ids[2], ids[3]]),
            ))
            .unwrap();
        builder
            .add_element_1d(Element1D::new([ids[3], ids[0]], 2))
            .unwrap();
        builder.set_cd2_name(2, "first").unwrap();
        builder.set_cd2_name(2, "left").unwrap();

        let mesh = builder.compress().unwrap();
        assert_eq!(mesh.cd2_names, vec![None, Some("left".to_string())]);
        assert_eq!(mesh.boundary_segments("left"), vec![[3, 0]]);
    }
}
