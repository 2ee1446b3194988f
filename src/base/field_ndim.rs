use crate::StrError;
use gemlab::mesh::Mesh;
use gemlab::shapes::GeoKind;

/// Returns the dimension of the displacement field of a mesh
///
/// * 1 -- bar: all cells are Lin2 and all points lie on the x axis (y = 0)
/// * 2 -- plane: all cells are triangles or quadrilaterals in the 2D space
pub fn field_ndim(mesh: &Mesh) -> Result<usize, StrError> {
    if mesh.ndim != 2 {
        return Err("the space dimension of the mesh must be 2");
    }
    if mesh.cells.is_empty() {
        return Err("the mesh must have at least one cell");
    }
    if mesh.cells.iter().all(|cell| cell.kind == GeoKind::Lin2) {
        if mesh.points.iter().any(|point| point.coords[1] != 0.0) {
            return Err("the points of a bar must lie on the x axis");
        }
        return Ok(1);
    }
    if mesh.cells.iter().all(|cell| cell.kind.ndim() == 2) {
        return Ok(2);
    }
    Err("cells must be all Lin2 (bar) or all triangles and quadrilaterals")
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
