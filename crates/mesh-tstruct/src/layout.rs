//! Index arithmetic for the T-structure.
//!
//! [`TStructureLayout::generate`] turns parameters into plain data: point
//! coordinates, face cells and tagged boundary segments, all expressed as
//! indices into the point list. Nothing here touches a mesh builder, so the
//! layout can be fed to any backend.
//!
//! Point numbering: the upper plate comes first, row-major with rows along y,
//!
//! ```text
//!   y=1  [ny1*(nx1+1)] ... [ny1*(nx1+1)+nx1]
//!        ...
//!   seam [s] ............. [s+nx1]            s = (ny1/2)*(nx1+1)
//!        ...
//!   y=0  [0] ............. [nx1]
//! ```
//!
//! followed by the lower plate starting at `L = (ny1+1)*(nx1+1)`, one row of
//! `nx2+1` points per depth step `z = -i/ny2`, `i = 1..=ny2`. The lower
//! plate's top row at `z = 0` is the upper seam row itself, bridged by the
//! connector strip.

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::error::MeshResult;
use crate::params::TStructureParams;
use crate::types::Polygon;

/// The eight named boundary curves, numbered 1 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Boundary {
    UpBottom = 1,
    UpRight = 2,
    UpTop = 3,
    UpLeft = 4,
    Interface = 5,
    DownRight = 6,
    DownBottom = 7,
    DownLeft = 8,
}

impl Boundary {
    /// All boundaries in tag order.
    pub const ALL: [Boundary; 8] = [
        Boundary::UpBottom,
        Boundary::UpRight,
        Boundary::UpTop,
        Boundary::UpLeft,
        Boundary::Interface,
        Boundary::DownRight,
        Boundary::DownBottom,
        Boundary::DownLeft,
    ];

    /// 1-based tag index.
    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Symbolic name attached to the tag.
    pub fn name(self) -> &'static str {
        match self {
            Boundary::UpBottom => "upbottom",
            Boundary::UpRight => "upright",
            Boundary::UpTop => "uptop",
            Boundary::UpLeft => "upleft",
            Boundary::Interface => "interface",
            Boundary::DownRight => "downright",
            Boundary::DownBottom => "downbottom",
            Boundary::DownLeft => "downleft",
        }
    }

    /// Look a boundary up by tag index.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.index() == index)
    }
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A boundary segment between two point indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySegment {
    pub boundary: Boundary,
    pub points: [usize; 2],
}

/// Points, faces and boundary segments of a T-structure, as plain indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TStructureLayout {
    pub points: Vec<Point3<f64>>,
    pub faces: Vec<Polygon<usize>>,
    pub segments: Vec<BoundarySegment>,
    /// Upper grid row shared with the lower plate.
    pub seam_row: usize,
    /// Index of the first lower-plate point.
    pub lower_offset: usize,
}

impl TStructureLayout {
    /// Generate the layout for `params`.
    ///
    /// Fails with the error of [`TStructureParams::validate`] when the
    /// parameters break the fixed topology.
    pub fn generate(params: &TStructureParams) -> MeshResult<Self> {
        params.validate()?;

        let TStructureParams {
            quads,
            nx1,
            ny1,
            nx2,
            ny2,
            ratio,
        } = *params;

        let seam_row = params.seam_row();
        let lower_offset = params.upper_point_count();
        let seam = seam_row * (nx1 + 1);

        let mut points = Vec::with_capacity(params.point_count());
        for i in 0..=ny1 {
            for j in 0..=nx1 {
                points.push(Point3::new(
                    j as f64 / nx1 as f64,
                    i as f64 / ny1 as f64,
                    0.0,
                ));
            }
        }
        for i in 1..=ny2 {
            for j in 0..=nx2 {
                points.push(Point3::new(
                    j as f64 / nx2 as f64,
                    ratio,
                    -(i as f64) / ny2 as f64,
                ));
            }
        }

        let mut faces = Vec::with_capacity(params.face_count());
        let mut push_cell = |corners: [usize; 4]| {
            let quad = Polygon::Quad(corners);
            if quads {
                faces.push(quad);
            } else {
                faces.extend(quad.triangles().into_iter().map(Polygon::Triangle));
            }
        };

        // Upper plate
        for i in 0..ny1 {
            for j in 0..nx1 {
                let base = i * (nx1 + 1) + j;
                push_cell([base, base + 1, base + nx1 + 2, base + nx1 + 1]);
            }
        }

        // Connector strip from the seam row down to the first lower row
        for j in 0..nx1 {
            let base = seam + j;
            push_cell([base, base + 1, lower_offset + j + 1, lower_offset + j]);
        }

        // Remaining lower rows
        for i in 1..ny2 {
            for j in 0..nx2 {
                let base = lower_offset + (i - 1) * (nx2 + 1) + j;
                push_cell([base, base + 1, base + nx2 + 2, base + nx2 + 1]);
            }
        }

        let segments = boundary_segments(params, seam, lower_offset);

        debug!(
            points = points.len(),
            faces = faces.len(),
            segments = segments.len(),
            seam_row,
            "Generated T-structure layout"
        );

        Ok(Self {
            points,
            faces,
            segments,
            seam_row,
            lower_offset,
        })
    }

    /// Segments belonging to one boundary, in chain order.
    pub fn boundary(&self, boundary: Boundary) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.segments
            .iter()
            .filter(move |s| s.boundary == boundary)
            .map(|s| s.points)
    }
}

/// Trace the eight boundary chains.
///
/// The upper plate's outline runs counter-clockwise seen from `+z`. The
/// lower chains run down the `x = 0` side, along the bottom, and back up the
/// `x = 1` side to the seam.
fn boundary_segments(
    params: &TStructureParams,
    seam: usize,
    lower_offset: usize,
) -> Vec<BoundarySegment> {
    let TStructureParams {
        nx1, ny1, nx2, ny2, ..
    } = *params;
    let l = lower_offset;

    let mut segments = Vec::with_capacity(params.boundary_count());
    let mut push = |boundary: Boundary, a: usize, b: usize| {
        segments.push(BoundarySegment {
            boundary,
            points: [a, b],
        });
    };

    for i in 0..nx1 {
        push(Boundary::UpBottom, i, i + 1);
    }
    for i in 0..ny1 {
        push(
            Boundary::UpRight,
            i * (nx1 + 1) + nx1,
            (i + 1) * (nx1 + 1) + nx1,
        );
    }
    for i in 0..nx1 {
        push(
            Boundary::UpTop,
            ny1 * (nx1 + 1) + i + 1,
            ny1 * (nx1 + 1) + i,
        );
    }
    for i in 0..ny1 {
        push(Boundary::UpLeft, (i + 1) * (nx1 + 1), i * (nx1 + 1));
    }

    for i in 0..nx2 {
        push(Boundary::Interface, seam + i, seam + i + 1);
    }

    push(Boundary::DownRight, seam, l);
    for i in 0..ny2 - 1 {
        push(Boundary::DownRight, l + i * (nx2 + 1), l + (i + 1) * (nx2 + 1));
    }

    let last_row = l + (ny2 - 1) * (nx2 + 1);
    for i in 0..nx2 {
        push(Boundary::DownBottom, last_row + i, last_row + i + 1);
    }

    for i in 0..ny2 - 1 {
        push(
            Boundary::DownLeft,
            l + (i + 1) * (nx2 + 1) + nx2,
            l + i * (nx2 + 1) + nx2,
        );
    }
    push(Boundary::DownLeft, l + nx1, seam + nx1);

    trace!(count = segments.len(), "Traced boundary chains");
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn small() -> TStructureLayout {
        TStructureLayout::generate(&TStructureParams::uniform(2)).unwrap()
    }

    #[test]
    fn test_boundary_names_and_indices() {
        let names: Vec<_> = Boundary::ALL.iter().map(|b| b.name()).collect();
        assert_eq!(
            names,
            vec![
                "upbottom",
                "upright",
                "uptop",
                "upleft",
                "interface",
                "downright",
                "downbottom",
                "downleft"
            ]
        );
        for (i, b) in Boundary::ALL.iter().enumerate() {
            assert_eq!(b.index(), i as u32 + 1);
            assert_eq!(Boundary::from_index(b.index()), Some(*b));
        }
        assert_eq!(Boundary::from_index(0), None);
        assert_eq!(Boundary::from_index(9), None);
    }

    #[test]
    fn test_small_points() {
        let layout = small();
        assert_eq!(layout.points.len(), 15);
        assert_eq!(layout.lower_offset, 9);
        assert_eq!(layout.seam_row, 1);

        // Upper grid corner and seam row
        assert_eq!(layout.points[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(layout.points[8], Point3::new(1.0, 1.0, 0.0));
        for j in 0..3 {
            assert_eq!(layout.points[3 + j].y, 0.5);
        }

        // Lower rows at z = -0.5 and z = -1
        assert_eq!(layout.points[9], Point3::new(0.0, 0.5, -0.5));
        assert_eq!(layout.points[11], Point3::new(1.0, 0.5, -0.5));
        assert_eq!(layout.points[14], Point3::new(1.0, 0.5, -1.0));
    }

    #[test]
    fn test_small_faces() {
        let layout = small();
        assert_eq!(
            layout.faces,
            vec![
                Polygon::Quad([0, 1, 4, 3]),
                Polygon::Quad([1, 2, 5, 4]),
                Polygon::Quad([3, 4, 7, 6]),
                Polygon::Quad([4, 5, 8, 7]),
                // connector
                Polygon::Quad([3, 4, 10, 9]),
                Polygon::Quad([4, 5, 11, 10]),
                // lower
                Polygon::Quad([9, 10, 13, 12]),
                Polygon::Quad([10, 11, 14, 13]),
            ]
        );
    }

    #[test]
    fn test_triangle_split_covers_connector() {
        let layout = TStructureLayout::generate(&TStructureParams::uniform(2).triangles()).unwrap();
        assert_eq!(layout.faces.len(), 16);
        // First connector cell is the fifth cell, i.e. faces 8 and 9
        assert_eq!(layout.faces[8], Polygon::Triangle([3, 4, 9]));
        assert_eq!(layout.faces[9], Polygon::Triangle([4, 10, 9]));
    }

    #[test]
    fn test_small_boundaries() {
        let layout = small();
        let chain = |b| layout.boundary(b).collect::<Vec<_>>();

        assert_eq!(chain(Boundary::UpBottom), vec![[0, 1], [1, 2]]);
        assert_eq!(chain(Boundary::UpRight), vec![[2, 5], [5, 8]]);
        assert_eq!(chain(Boundary::UpTop), vec![[7, 6], [8, 7]]);
        assert_eq!(chain(Boundary::UpLeft), vec![[3, 0], [6, 3]]);
        assert_eq!(chain(Boundary::Interface), vec![[3, 4], [4, 5]]);
        assert_eq!(chain(Boundary::DownRight), vec![[3, 9], [9, 12]]);
        assert_eq!(chain(Boundary::DownBottom), vec![[12, 13], [13, 14]]);
        assert_eq!(chain(Boundary::DownLeft), vec![[14, 11], [11, 5]]);
        assert_eq!(layout.segments.len(), 16);
    }

    #[test]
    fn test_single_lower_row() {
        let params = TStructureParams::default().with_lower(4, 1);
        let layout = TStructureLayout::generate(&params).unwrap();
        assert_eq!(layout.points.len(), params.point_count());
        assert_eq!(layout.faces.len(), 4 * 4 + 4);
        assert_eq!(layout.boundary(Boundary::DownRight).count(), 1);
        assert_eq!(layout.boundary(Boundary::DownLeft).count(), 1);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        for params in [
            TStructureParams::default().with_lower(4, 0),
            TStructureParams::default().with_upper(0, 4),
            TStructureParams::default().with_upper(4, 3),
            TStructureParams::default().with_ratio(f64::NAN),
        ] {
            let err = TStructureLayout::generate(&params).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidParams);
        }
    }

    #[test]
    fn test_ratio_moves_lower_plate() {
        let layout = TStructureLayout::generate(&TStructureParams::uniform(2).with_ratio(0.0)).unwrap();
        assert!(layout.points[9..].iter().all(|p| p.y == 0.0));

        let layout = TStructureLayout::generate(&TStructureParams::uniform(2).with_ratio(1.0)).unwrap();
        assert!(layout.points[9..].iter().all(|p| p.y == 1.0));
    }
}
