use crate::StrError;
use gemlab::mesh::{Block, Cell, Mesh, Point, PointMarker};
use gemlab::shapes::GeoKind;

/// Marks the point at the left end (x = 0) of a bar
pub const BAR_LEFT_MARKER: PointMarker = -1;

/// Marks the point at the right end (x = length) of a bar
pub const BAR_RIGHT_MARKER: PointMarker = -2;

/// Generates the meshes of the phase-field benchmarks
pub struct SampleMeshes {}

impl SampleMeshes {
    /// Generates a bar with Lin2 cells along the x axis
    ///
    /// The points lie in the 2D space with y = 0 and are numbered from left to right. The end
    /// points are marked with [BAR_LEFT_MARKER] and [BAR_RIGHT_MARKER].
    ///
    /// ```text
    /// 0-----1-----2- ... -(ncell)  → x
    /// 0.0                 length
    /// ```
    pub fn bar(length: f64, ncell: usize) -> Result<Mesh, StrError> {
        if length <= 0.0 {
            return Err("the length of the bar must be > 0.0");
        }
        if ncell < 1 {
            return Err("the number of cells must be ≥ 1");
        }
        let dx = length / (ncell as f64);
        let points = (0..=ncell)
            .map(|i| Point {
                id: i,
                marker: if i == 0 {
                    BAR_LEFT_MARKER
                } else if i == ncell {
                    BAR_RIGHT_MARKER
                } else {
                    0
                },
                coords: vec![if i == ncell { length } else { (i as f64) * dx }, 0.0],
            })
            .collect();
        let cells = (0..ncell)
            .map(|e| Cell {
                id: e,
                attribute: 1,
                kind: GeoKind::Lin2,
                points: vec![e, e + 1],
            })
            .collect();
        Ok(Mesh { ndim: 2, points, cells })
    }

    /// Generates a structured mesh of Qua4 cells over [0, lx] × [0, ly]
    pub fn rectangle(lx: f64, ly: f64, nx: usize, ny: usize) -> Result<Mesh, StrError> {
        if lx <= 0.0 || ly <= 0.0 {
            return Err("the dimensions of the rectangle must be > 0.0");
        }
        if nx < 1 || ny < 1 {
            return Err("the numbers of divisions must be ≥ 1");
        }
        let mut block = Block::new(&[[0.0, 0.0], [lx, 0.0], [lx, ly], [0.0, ly]])?;
        block.set_ndiv(&[nx, ny])?;
        block.subdivide(GeoKind::Qua4)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{SampleMeshes, BAR_LEFT_MARKER, BAR_RIGHT_MARKER};
    use gemlab::mesh::{At, Features};
    use gemlab::shapes::GeoKind;
    use gemlab::util::any_x;

    #[test]
    fn bar_captures_errors() {
        assert_eq!(SampleMeshes::bar(0.0, 2).err(), Some("the length of the bar must be > 0.0"));
        assert_eq!(SampleMeshes::bar(1.0, 0).err(), Some("the number of cells must be ≥ 1"));
    }

    #[test]
    fn bar_works() {
        let mesh = SampleMeshes::bar(0.3, 3).unwrap();
        assert_eq!(mesh.ndim, 2);
        assert_eq!(mesh.points.len(), 4);
        assert_eq!(mesh.cells.len(), 3);
        assert_eq!(mesh.points[3].coords, &[0.3, 0.0]);
        assert_eq!(mesh.cells[2].kind, GeoKind::Lin2);
        assert_eq!(mesh.cells[2].points, &[2, 3]);
        assert_eq!(mesh.search_first_marked_point(BAR_LEFT_MARKER, any_x).unwrap(), 0);
        assert_eq!(mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x).unwrap(), 3);
    }

    #[test]
    fn rectangle_captures_errors() {
        assert_eq!(
            SampleMeshes::rectangle(1.0, 0.0, 1, 1).err(),
            Some("the dimensions of the rectangle must be > 0.0")
        );
        assert_eq!(
            SampleMeshes::rectangle(1.0, 1.0, 0, 1).err(),
            Some("the numbers of divisions must be ≥ 1")
        );
    }

    #[test]
    fn rectangle_works() {
        let mesh = SampleMeshes::rectangle(2.0, 1.0, 4, 2).unwrap();
        assert_eq!(mesh.ndim, 2);
        assert_eq!(mesh.points.len(), 15);
        assert_eq!(mesh.cells.len(), 8);
        assert!(mesh.cells.iter().all(|cell| cell.kind == GeoKind::Qua4));
        let features = Features::new(&mesh, false);
        assert_eq!(features.search_point_ids(At::X(0.0), any_x).unwrap().len(), 3);
        assert_eq!(features.search_point_ids(At::Y(1.0), any_x).unwrap().len(), 5);
        assert_eq!(features.search_edges(At::X(2.0), any_x).unwrap().len(), 2);
    }
}
