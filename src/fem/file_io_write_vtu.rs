use super::{FemState, FileIo};
use crate::base::field_ndim;
use crate::StrError;
use gemlab::mesh::Mesh;
use std::fmt::Write;
use std::fs::File;
use std::io::Write as IoWrite;

impl FileIo {
    /// Writes a file associated with a single load step to perform visualization with ParaView
    ///
    /// The point data contains the "displacement" vector (padded to three components) and
    /// the "damage" scalar.
    pub fn write_vtu(&self, mesh: &Mesh, state: &FemState, index: usize) -> Result<(), StrError> {
        if !self.active {
            return Err("FileIo must be activated first");
        }

        let npoint = mesh.points.len();
        let ncell = mesh.cells.len();
        if ncell < 1 {
            return Err("there are no cells to write");
        }
        let ndim = field_ndim(mesh)?;
        if state.uu.len() != ndim * npoint || state.alpha.len() != npoint {
            return Err("the state is incompatible with the mesh");
        }

        // output buffer
        let mut buffer = String::new();

        // header
        write!(
            &mut buffer,
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <UnstructuredGrid>\n\
             <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n",
            npoint, ncell
        )
        .unwrap();

        // nodes: coordinates
        write!(
            &mut buffer,
            "<Points>\n\
             <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n",
        )
        .unwrap();
        for point in &mesh.points {
            for dim in 0..3 {
                let x = if dim < mesh.ndim { point.coords[dim] } else { 0.0 };
                write!(&mut buffer, "{:?} ", x).unwrap();
            }
        }
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             </Points>\n"
        )
        .unwrap();

        // elements: connectivity
        write!(
            &mut buffer,
            "<Cells>\n\
             <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n"
        )
        .unwrap();
        for cell in &mesh.cells {
            if cell.kind.vtk_type().is_none() {
                return Err("cannot generate VTU file because VTK cell type is not available");
            }
            for p in &cell.points {
                write!(&mut buffer, "{} ", p).unwrap();
            }
        }

        // elements: offsets
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n"
        )
        .unwrap();
        let mut offset = 0;
        for cell in &mesh.cells {
            offset += cell.points.len();
            write!(&mut buffer, "{} ", offset).unwrap();
        }

        // elements: types
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n"
        )
        .unwrap();
        for cell in &mesh.cells {
            if let Some(vtk) = cell.kind.vtk_type() {
                write!(&mut buffer, "{} ", vtk).unwrap();
            }
        }
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             </Cells>\n"
        )
        .unwrap();

        // data: points
        write!(&mut buffer, "<PointData Scalars=\"TheScalars\">\n").unwrap();
        write!(
            &mut buffer,
            "<DataArray type=\"Float64\" Name=\"displacement\" NumberOfComponents=\"3\" format=\"ascii\">\n"
        )
        .unwrap();
        for p in 0..npoint {
            for dim in 0..3 {
                // displacement equations are numbered point by point
                let u = if dim < ndim { state.uu[ndim * p + dim] } else { 0.0 };
                write!(&mut buffer, "{:?} ", u).unwrap();
            }
        }
        write!(&mut buffer, "\n</DataArray>\n").unwrap();
        write!(
            &mut buffer,
            "<DataArray type=\"Float64\" Name=\"damage\" NumberOfComponents=\"1\" format=\"ascii\">\n"
        )
        .unwrap();
        for p in 0..npoint {
            write!(&mut buffer, "{:?} ", state.alpha[p]).unwrap();
        }
        write!(&mut buffer, "\n</DataArray>\n").unwrap();
        write!(&mut buffer, "</PointData>\n").unwrap();

        // footer
        write!(
            &mut buffer,
            "</Piece>\n\
             </UnstructuredGrid>\n\
             </VTKFile>\n"
        )
        .unwrap();

        // write file
        let path = self.path_vtu(index);
        let mut file = File::create(&path).map_err(|_| "cannot create VTU file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write VTU file")?;
        Ok(())
    }

    /// Writes a summary file for all load steps to perform visualization with ParaView
    ///
    /// The imposed displacement is used as the "timestep".
    pub fn write_pvd(&self) -> Result<(), StrError> {
        if !self.active {
            return Err("FileIo must be activated first");
        }

        // header
        let mut buffer = String::new();
        write!(
            &mut buffer,
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <Collection>\n"
        )
        .unwrap();

        // add VTU entries to PVD file
        for (index, load) in self.indices.iter().zip(&self.loads) {
            let vtu_fn = self.path_vtu(*index);
            write!(&mut buffer, "<DataSet timestep=\"{:?}\" file=\"{}\" />\n", load, vtu_fn).unwrap();
        }

        // footer
        write!(&mut buffer, "</Collection>\n</VTKFile>\n").unwrap();

        // write file
        let path = self.path_pvd();
        let mut file = File::create(&path).map_err(|_| "cannot create PVD file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write PVD file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
