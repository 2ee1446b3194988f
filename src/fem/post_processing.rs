use super::{calc_shape_data, strain_matrix, EnergyFunctional, FemState};
use crate::base::{field_ndim, SQRT_2};
use crate::StrError;
use gemlab::integ::Gauss;
use gemlab::mesh::{Cell, CellId, Feature, Mesh, PointId};
use gemlab::shapes::{GeoKind, Scratchpad};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Holds an integration point on the boundary of the reaction region
struct BoundaryPoint {
    /// Cell owning the edge (or the bar end)
    cell_id: CellId,

    /// Integration weight times the length of the edge mapping (1 at a bar end)
    weight: f64,

    /// Points of the edge and their shape functions at the integration point
    points: Vec<PointId>,
    nn: Vec<f64>,

    /// Strain-displacement matrix of the owner cell at the integration point
    bb: DMatrix<f64>,
}

/// Holds the boundary region where the reaction force is evaluated
///
/// The region is identified once at setup. The reaction is the integral of one stress component
/// over the edges; the stress is evaluated in the cell owning each edge and degraded with the
/// damage interpolated at the edge integration points.
///
/// ```text
/// F = t Σ_edges Σ_p w_p |J_p| σ_c(ε_p, a(α_p))
/// ```
pub struct ReactionRegion {
    /// Index of the stress component: 0 = σxx, 1 = σyy, 2 = σxy (only 0 in 1D)
    pub component: usize,

    /// Out-of-plane thickness (2D) or cross-sectional area (1D)
    pub thickness: f64,

    ips: Vec<BoundaryPoint>,
}

/// Returns the reference coordinates of the nodes of the cells supported by the reaction region
fn node_reference_coords(kind: GeoKind) -> Result<&'static [[f64; 2]], StrError> {
    match kind {
        GeoKind::Tri3 => Ok(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
        GeoKind::Qua4 => Ok(&[[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]),
        _ => Err("the reaction region requires Tri3 or Qua4 cells"),
    }
}

/// Returns the position of each point in the cell connectivity
fn local_indices(cell: &Cell, points: &[PointId]) -> Option<Vec<usize>> {
    points
        .iter()
        .map(|p| cell.points.iter().position(|q| q == p))
        .collect()
}

impl ReactionRegion {
    /// Allocates a new instance from boundary edges of a 2D mesh
    ///
    /// The edges are typically found with `Features::search_edges`.
    pub fn new(mesh: &Mesh, edges: &[&Feature], component: usize, thickness: f64) -> Result<Self, StrError> {
        if edges.is_empty() {
            return Err("the reaction region must have at least one edge");
        }
        if field_ndim(mesh)? != 2 {
            return Err("the reaction region of a bar must be set with at_bar_end");
        }
        if component > 2 {
            return Err("the stress component is out of range");
        }
        let gauss = Gauss::new(GeoKind::Lin2);
        let mut edge_pad = Scratchpad::new(2, GeoKind::Lin2)?;
        let mut ips = Vec::new();
        for edge in edges {
            if edge.kind != GeoKind::Lin2 {
                return Err("the edges of the reaction region must be Lin2");
            }
            let (cell, locals) = mesh
                .cells
                .iter()
                .find_map(|cell| local_indices(cell, &edge.points).map(|locals| (cell, locals)))
                .ok_or("cannot find the cell owning the edge")?;
            let ref_coords = node_reference_coords(cell.kind)?;
            let mut cell_pad = mesh.get_pad(cell.id);
            for (m, p) in edge.points.iter().enumerate() {
                for j in 0..2 {
                    edge_pad.set_xx(m, j, mesh.points[*p].coords[j]);
                }
            }
            for p in 0..gauss.npoint() {
                let ksi = gauss.coords(p);
                let norm_jac = edge_pad.calc_jacobian(ksi)?;
                (edge_pad.fn_interp)(&mut edge_pad.interp, ksi);
                let nn = vec![edge_pad.interp[0], edge_pad.interp[1]];
                // map the edge point into the reference space of the owner cell
                let mut ksi_cell = [0.0, 0.0];
                for (k, local) in locals.iter().enumerate() {
                    for j in 0..2 {
                        ksi_cell[j] += nn[k] * ref_coords[*local][j];
                    }
                }
                let (_, _, gg) = calc_shape_data(&mut cell_pad, 2, &ksi_cell)?;
                ips.push(BoundaryPoint {
                    cell_id: cell.id,
                    weight: gauss.weight(p) * norm_jac,
                    points: edge.points.clone(),
                    nn,
                    bb: strain_matrix(&gg),
                });
            }
        }
        Ok(ReactionRegion {
            component,
            thickness,
            ips,
        })
    }

    /// Allocates a new instance at one end point of a bar (the axial stress times the area)
    pub fn at_bar_end(mesh: &Mesh, point_id: PointId, thickness: f64) -> Result<Self, StrError> {
        if field_ndim(mesh)? != 1 {
            return Err("the mesh must be a bar");
        }
        let owners: Vec<_> = mesh.cells.iter().filter(|cell| cell.points.contains(&point_id)).collect();
        if owners.len() != 1 {
            return Err("the point must be at one end of the bar");
        }
        let cell = owners[0];
        let ksi = if cell.points[0] == point_id { -1.0 } else { 1.0 };
        let mut pad = mesh.get_pad(cell.id);
        let (_, _, gg) = calc_shape_data(&mut pad, 1, &[ksi])?;
        Ok(ReactionRegion {
            component: 0,
            thickness,
            ips: vec![BoundaryPoint {
                cell_id: cell.id,
                weight: 1.0,
                points: vec![point_id],
                nn: vec![1.0],
                bb: strain_matrix(&gg),
            }],
        })
    }

    /// Computes the reaction force
    pub fn reaction(&self, functional: &EnergyFunctional, state: &FemState) -> f64 {
        let model = &functional.model;
        let mut force = 0.0;
        for ip in &self.ips {
            let element = &functional.elements[ip.cell_id];
            let eps = &ip.bb * element.local_u(&state.uu);
            let alpha: f64 = ip.points.iter().zip(&ip.nn).map(|(p, n)| n * state.alpha[*p]).sum();
            let sig = model.elastic.calc(eps.as_slice()).stress(model.softening.a(alpha));
            // the shear stress is stored as √2 σxy
            let value = if self.component == 2 {
                sig[2] / SQRT_2
            } else {
                sig[self.component]
            };
            force += ip.weight * value;
        }
        force * self.thickness
    }
}

/// Holds the (displacement, force) series; one entry per completed load step
///
/// The series is append-only.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ForceSeries {
    displacement: Vec<f64>,
    force: Vec<f64>,
}

impl ForceSeries {
    /// Allocates a new (empty) series
    pub fn new() -> Self {
        ForceSeries::default()
    }

    /// Appends a new entry
    pub fn push(&mut self, displacement: f64, force: f64) {
        self.displacement.push(displacement);
        self.force.push(force);
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.force.len()
    }

    /// Returns true if the series is empty
    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Returns the displacements
    pub fn displacement(&self) -> &[f64] {
        &self.displacement
    }

    /// Returns the forces
    pub fn force(&self) -> &[f64] {
        &self.force
    }

    /// Returns the (index, value) of the maximum force
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.force
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, f)| (i, *f))
    }

    /// Writes a text file with two columns (displacement, force)
    ///
    /// The numbers are written as `%.18e`, e.g., `1.500000000000000000e-02`.
    pub fn write_txt<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let mut buffer = String::new();
        for (d, f) in self.displacement.iter().zip(&self.force) {
            write!(&mut buffer, "{} {}\n", format_scientific(*d), format_scientific(*f)).unwrap();
        }
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let mut file = File::create(&tmp).map_err(|_| "cannot create file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write file")?;
        file.sync_all().map_err(|_| "cannot write file")?;
        fs::rename(&tmp, &path).map_err(|_| "cannot rename file")?;
        Ok(())
    }
}

/// Formats a number as `%.18e` with a signed two-digit (at least) exponent
pub fn format_scientific(value: f64) -> String {
    let s = format!("{:.18e}", value);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s, // NaN or inf
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{format_scientific, ForceSeries, ReactionRegion};
    use crate::base::{Config, Dof, Ebc, Essential, ParamDamage, SampleMeshes, SampleParams};
    use crate::base::{BAR_RIGHT_MARKER, DEFAULT_TEST_DIR};
    use crate::fem::{DisplacementSolver, EnergyFunctional, FemState, NewtonSolver, PrescribedValues};
    use approx::assert_abs_diff_eq;
    use gemlab::mesh::{At, Features, Mesh};
    use gemlab::util::any_x;
    use std::fs;
    use std::path::Path;

    #[test]
    fn format_scientific_works() {
        assert_eq!(format_scientific(0.0), "0.000000000000000000e+00");
        assert_eq!(format_scientific(0.015), "1.499999999999999944e-02");
        assert_eq!(format_scientific(-2.5e123), "-2.500000000000000000e+123");
        assert_eq!(format_scientific(3.0), "3.000000000000000000e+00");
    }

    #[test]
    fn new_captures_errors() {
        let mesh = SampleMeshes::rectangle(1.0, 1.0, 2, 2).unwrap();
        let features = Features::new(&mesh, false);
        let right = features.search_edges(At::X(1.0), any_x).unwrap();
        assert_eq!(
            ReactionRegion::new(&mesh, &[], 0, 1.0).err(),
            Some("the reaction region must have at least one edge")
        );
        assert_eq!(
            ReactionRegion::new(&mesh, &right, 3, 1.0).err(),
            Some("the stress component is out of range")
        );
        assert_eq!(
            ReactionRegion::at_bar_end(&mesh, 0, 1.0).err(),
            Some("the mesh must be a bar")
        );
        let bar = SampleMeshes::bar(1.0, 2).unwrap();
        assert_eq!(
            ReactionRegion::new(&bar, &right, 0, 1.0).err(),
            Some("the reaction region of a bar must be set with at_bar_end")
        );
        assert_eq!(
            ReactionRegion::at_bar_end(&bar, 1, 1.0).err(),
            Some("the point must be at one end of the bar")
        );
    }

    #[test]
    fn reaction_works_1d() {
        let mesh = SampleMeshes::bar(2.0, 2).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let mut config = Config::new();
        config.set_thickness(3.0).unwrap();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let mut state = FemState::new(&mesh, &Essential::new()).unwrap();
        state.uu[1] = 0.1;
        state.uu[2] = 0.2;
        let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x).unwrap();
        let region = ReactionRegion::at_bar_end(&mesh, right, config.thickness).unwrap();
        // F = A E ε = 3 · 1 · 0.1
        assert_abs_diff_eq!(region.reaction(&fun, &state), 0.3, epsilon = 1e-15);
        // damage at the end point degrades the stress
        state.alpha[2] = 0.5;
        assert_abs_diff_eq!(region.reaction(&fun, &state), 0.3 * (0.25 * (1.0 - 1e-6) + 1e-6), epsilon = 1e-15);
    }

    // solves the plane-strain tension of a rectangle: Ux fixed on the left, Ux imposed on the right
    fn uniaxial_state(mesh: &Mesh, fun: &EnergyFunctional, config: &Config, imposed: f64) -> FemState {
        let features = Features::new(mesh, false);
        let left = features.search_point_ids(At::X(0.0), any_x).unwrap();
        let right = features.search_point_ids(At::X(2.0), any_x).unwrap();
        let origin = features.search_point_ids(At::XY(0.0, 0.0), any_x).unwrap();
        let mut essential = Essential::new();
        essential
            .at(&left, Dof::Ux, Ebc::Fixed(0.0))
            .unwrap()
            .at(&origin, Dof::Uy, Ebc::Fixed(0.0))
            .unwrap()
            .at(&right, Dof::Ux, Ebc::Loaded(1.0))
            .unwrap();
        let prescribed = PrescribedValues::new(&fun.equations_u, &essential).unwrap();
        let mut solver = NewtonSolver::new(config, fun, &prescribed).unwrap();
        let mut state = FemState::new(mesh, &essential).unwrap();
        solver.solve(&mut state.uu, &state.alpha, imposed).unwrap();
        state
    }

    #[test]
    fn reaction_works_2d() {
        // plane strain, E = 1, ν = 0.25
        let (lx, ly) = (2.0, 1.0);
        let mesh = SampleMeshes::rectangle(lx, ly, 4, 2).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let mut config = Config::new();
        config.set_thickness(0.5).unwrap();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let imposed = 0.01;
        let state = uniaxial_state(&mesh, &fun, &config, imposed);
        let features = Features::new(&mesh, false);
        let edges = features.search_edges(At::X(lx), any_x).unwrap();
        assert_eq!(edges.len(), 2);
        let region = ReactionRegion::new(&mesh, &edges, 0, config.thickness).unwrap();
        // uniaxial stress in plane strain: σxx = E/(1-ν²) εxx
        let (young, poisson) = (1.0, 0.25);
        let correct = young / (1.0 - poisson * poisson) * (imposed / lx) * ly * config.thickness;
        assert_abs_diff_eq!(region.reaction(&fun, &state), correct, epsilon = 1e-12);
        // no shear along the edge
        let region = ReactionRegion::new(&mesh, &edges, 2, config.thickness).unwrap();
        assert_abs_diff_eq!(region.reaction(&fun, &state), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn reaction_integrates_the_damage_along_edges() {
        let (lx, ly) = (2.0, 1.0);
        let mesh = SampleMeshes::rectangle(lx, ly, 2, 3).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let config = Config::new();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let imposed = 0.01;
        let mut state = uniaxial_state(&mesh, &fun, &config, imposed);
        let features = Features::new(&mesh, false);
        let edges = features.search_edges(At::X(lx), any_x).unwrap();
        let region = ReactionRegion::new(&mesh, &edges, 0, config.thickness).unwrap();
        let sigma = 1.0 / (1.0 - 0.25 * 0.25) * (imposed / lx);
        // α = y/ly, thus ∫ a(α) dy = ly [(1-k)/3 + k] with a = (1-k)(1-α)² + k
        for (p, point) in mesh.points.iter().enumerate() {
            state.alpha[p] = point.coords[1] / ly;
        }
        let k = 1e-6;
        let correct = sigma * ly * ((1.0 - k) / 3.0 + k);
        assert_abs_diff_eq!(region.reaction(&fun, &state), correct, epsilon = 1e-12);
    }

    #[test]
    fn force_series_works() {
        let mut series = ForceSeries::new();
        assert!(series.is_empty());
        assert_eq!(series.peak(), None);
        series.push(0.0, 0.0);
        series.push(0.1, 2.0);
        series.push(0.2, 1.0);
        assert_eq!(series.len(), 3);
        assert_eq!(series.displacement(), &[0.0, 0.1, 0.2]);
        assert_eq!(series.force(), &[0.0, 2.0, 1.0]);
        assert_eq!(series.peak(), Some((1, 2.0)));
        let path = format!("{}/test_force_series.txt", DEFAULT_TEST_DIR);
        series.write_txt(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0.000000000000000000e+00 0.000000000000000000e+00");
        assert_eq!(lines[2], "2.000000000000000111e-01 1.000000000000000000e+00");
    }

    #[test]
    fn write_txt_replaces_the_file_atomically() {
        let path = format!("{}/test_force_series_replace.txt", DEFAULT_TEST_DIR);
        let mut series = ForceSeries::new();
        series.push(0.0, 1.0);
        series.push(1.0, 3.0);
        series.write_txt(&path).unwrap();
        series.push(2.0, 5.0);
        series.write_txt(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(!Path::new(&format!("{}.tmp", path)).exists());
    }
}
