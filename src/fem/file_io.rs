use super::{FemState, ForceSeries};
use crate::base::DEFAULT_OUT_DIR;
use crate::StrError;
use gemlab::mesh::Mesh;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Assists in generating output files
///
/// After each completed load step, the following files are (over)written:
///
/// * `{stem}-{index:0>20}.json` -- the state (displacement, damage, and bounds)
/// * `{stem}-{index:0>20}.vtu` -- the fields for ParaView
/// * `{stem}-forces.txt` -- the (displacement, force) series so far
/// * `{stem}-summary.json` -- this struct (indices and loads of the written states)
///
/// At the end of the simulation, `{stem}.pvd` collects all VTU files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileIo {
    /// Holds a flag to enable/disable the file generation
    pub(crate) active: bool,

    /// Defines the output directory
    output_dir: String,

    /// Defines the filename stem
    filename_stem: String,

    /// Holds the count of files written
    output_count: usize,

    /// Holds the indices of the output files
    pub indices: Vec<usize>,

    /// Holds the load steps corresponding to each output file
    pub steps: Vec<usize>,

    /// Holds the imposed displacements corresponding to each output file
    pub loads: Vec<f64>,
}

impl FileIo {
    /// Allocates a new instance with deactivated generation of files
    pub fn new() -> Self {
        FileIo {
            active: false,
            output_dir: String::new(),
            filename_stem: String::new(),
            output_count: 0,
            indices: Vec::new(),
            steps: Vec::new(),
            loads: Vec::new(),
        }
    }

    /// Allocates a new instance with activated generation of files
    ///
    /// **Warning:** The output directory is cleared (all files are deleted).
    ///
    /// # Input
    ///
    /// * `mesh` -- the mesh (written as JSON)
    /// * `filename_stem` -- the last part of the filename without extension, e.g., "bar"
    /// * `output_directory` -- the directory to save the output files.
    ///   None means that the default directory will be used; see [DEFAULT_OUT_DIR]
    pub fn new_active(mesh: &Mesh, filename_stem: &str, output_directory: Option<&str>) -> Result<Self, StrError> {
        if filename_stem.is_empty() {
            return Err("the filename stem must not be empty");
        }
        let out_dir = match output_directory {
            Some(d) => d,
            None => DEFAULT_OUT_DIR,
        };
        let path = Path::new(out_dir);
        if path.exists() {
            fs::remove_dir_all(path).map_err(|_| "cannot clear the output directory")?;
        }
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;
        let io = FileIo {
            active: true,
            output_dir: out_dir.to_string(),
            filename_stem: filename_stem.to_string(),
            output_count: 0,
            indices: Vec::new(),
            steps: Vec::new(),
            loads: Vec::new(),
        };
        mesh.write_json(&io.path_mesh())?;
        Ok(io)
    }

    /// Returns whether the generation of files is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Generates the filename path for the mesh file
    pub fn path_mesh(&self) -> String {
        format!("{}/{}-mesh.json", self.output_dir, self.filename_stem)
    }

    /// Generates the filename path for the summary file
    pub fn path_summary(&self) -> String {
        format!("{}/{}-summary.json", self.output_dir, self.filename_stem)
    }

    /// Generates the filename path for the (displacement, force) series
    pub fn path_forces(&self) -> String {
        format!("{}/{}-forces.txt", self.output_dir, self.filename_stem)
    }

    /// Generates the filename path for the simulation report
    pub fn path_report(&self) -> String {
        format!("{}/{}-report.json", self.output_dir, self.filename_stem)
    }

    /// Generates the filename path for the state files
    pub fn path_state(&self, index: usize) -> String {
        format!("{}/{}-{:0>20}.json", self.output_dir, self.filename_stem, index)
    }

    /// Generates the filename path for the VTU files
    pub fn path_vtu(&self, index: usize) -> String {
        format!("{}/{}-{:0>20}.vtu", self.output_dir, self.filename_stem, index)
    }

    /// Generates the filename path for the PVD file
    pub fn path_pvd(&self) -> String {
        format!("{}/{}.pvd", self.output_dir, self.filename_stem)
    }

    /// Reads a JSON file containing this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let mut file = File::create(&tmp).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        file.sync_all().map_err(|_| "cannot write file")?;
        fs::rename(&tmp, &path).map_err(|_| "cannot rename file")?;
        Ok(())
    }

    /// Writes the files of a completed load step
    ///
    /// **Note:** No output is generated if the file generation is not active.
    pub fn write_step(&mut self, mesh: &Mesh, state: &FemState, series: &ForceSeries) -> Result<(), StrError> {
        if !self.active {
            return Ok(());
        }
        let index = self.output_count;
        state.write_json(&self.path_state(index))?;
        self.write_vtu(mesh, state, index)?;
        series.write_txt(&self.path_forces())?;
        self.indices.push(index);
        self.steps.push(state.step);
        self.loads.push(state.load);
        self.output_count += 1;
        self.write_json(&self.path_summary())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
