use super::{print_footer, print_header, print_step, print_step_end, update_lower_bound};
use super::{AlternateMinimization, EnergyFunctional, FemState, FileIo, ForceSeries, NewtonSolver};
use super::{PrescribedValues, ProjectedNewtonSolver, ReactionRegion, StaggeredReport};
use crate::base::{Config, Dof, Essential, LoadSchedule, SolveStatus};
use crate::StrError;
use gemlab::mesh::{Mesh, PointId};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Holds the results of a complete simulation
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SimulationReport {
    /// Staggered loop results of each completed load step
    pub steps: Vec<StaggeredReport>,

    /// Elapsed wall time in milliseconds
    pub wall_time_millis: u64,
}

impl SimulationReport {
    /// Returns the number of load steps whose staggered loop was capped
    pub fn n_capped_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.status.converged()).count()
    }

    /// Returns the total number of staggered iterations
    pub fn n_staggered_iterations(&self) -> usize {
        self.steps.iter().map(|s| s.iterations).sum()
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
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        file.sync_all().map_err(|_| "cannot write file")?;
        fs::rename(&tmp, &path).map_err(|_| "cannot rename file")?;
        Ok(())
    }
}

/// Performs the load stepping of a phase-field fracture simulation
///
/// Each load step:
///
/// 1. computes the imposed displacement from the [LoadSchedule]
/// 2. runs the alternate minimization (the Dirichlet values are applied by the Newton solver)
/// 3. evaluates the reaction force, appends it to the series, and writes the output files
/// 4. locks the converged damage as the new lower bound
///
/// A displacement solver failure aborts the run. The entries already in the series (and the files
/// already written) correspond to the completed steps.
pub struct SolverStaggered<'a> {
    /// Holds configuration parameters
    pub config: &'a Config,

    /// Holds the mesh
    pub mesh: &'a Mesh,

    /// Holds the energy functional
    pub functional: &'a EnergyFunctional,

    /// Holds a collection of prescribed displacements
    pub prescribed_values: PrescribedValues,

    /// Holds the sequence of imposed displacements
    pub schedule: LoadSchedule,

    /// Holds the boundary region of the reaction force
    pub region: ReactionRegion,

    /// Equation of the displacement recorded in the series (None means the imposed value)
    monitor: Option<usize>,

    /// Multiplies the recorded displacement
    displacement_sign: f64,

    /// Multiplies the recorded reaction force
    force_sign: f64,
}

impl<'a> SolverStaggered<'a> {
    /// Allocates a new instance
    pub fn new(
        config: &'a Config,
        mesh: &'a Mesh,
        functional: &'a EnergyFunctional,
        essential: &Essential,
        schedule: LoadSchedule,
        region: ReactionRegion,
    ) -> Result<Self, StrError> {
        if let Some(_) = config.validate() {
            return Err("cannot allocate simulation because config.validate() failed");
        }
        schedule.validate()?;
        let prescribed_values = PrescribedValues::new(&functional.equations_u, essential)?;
        if prescribed_values.loaded_equations().is_empty() {
            return Err("at least one prescribed displacement must be loaded");
        }
        Ok(SolverStaggered {
            config,
            mesh,
            functional,
            prescribed_values,
            schedule,
            region,
            monitor: None,
            displacement_sign: 1.0,
            force_sign: 1.0,
        })
    }

    /// Records the displacement of a point DOF instead of the imposed displacement
    pub fn set_monitor(&mut self, point_id: PointId, dof: Dof) -> Result<&mut Self, StrError> {
        self.monitor = Some(self.functional.equations_u.eq(point_id, dof)?);
        Ok(self)
    }

    /// Sets the factors (±1) multiplying the recorded displacement and force
    pub fn set_signs(&mut self, displacement_sign: f64, force_sign: f64) -> Result<&mut Self, StrError> {
        if displacement_sign.abs() != 1.0 || force_sign.abs() != 1.0 {
            return Err("the signs must be equal to 1.0 or -1.0");
        }
        self.displacement_sign = displacement_sign;
        self.force_sign = force_sign;
        Ok(self)
    }

    /// Solves all load steps
    ///
    /// The series receives the initial (0, 0) entry followed by one entry per completed step.
    pub fn solve(
        &self,
        state: &mut FemState,
        series: &mut ForceSeries,
        file_io: &mut FileIo,
    ) -> Result<SimulationReport, StrError> {
        if state.uu.len() != self.functional.n_equation_u() || state.alpha.len() != self.functional.n_equation_alpha()
        {
            return Err("the state is incompatible with the energy functional");
        }
        state.check_bounds()?;

        // collaborators
        let mut displacement_solver = NewtonSolver::new(self.config, self.functional, &self.prescribed_values)?;
        let mut damage_solver = ProjectedNewtonSolver::new(self.config, self.functional)?;
        let controller = AlternateMinimization::new(self.config);

        // initial state
        let stopwatch = Instant::now();
        let mut report = SimulationReport::default();
        series.push(0.0, 0.0);

        // message
        print_header(self.config);

        // load steps
        for n in 0..self.schedule.n_steps() {
            let imposed = self.schedule.value(n);
            print_step(self.config, n + 1, imposed);

            // alternate minimization
            let staggered = controller.run(state, imposed, &mut displacement_solver, &mut damage_solver)?;
            state.step = n + 1;
            state.load = imposed;

            // post-processing
            let displacement = match self.monitor {
                Some(eq) => state.uu[eq],
                None => imposed,
            };
            let force = self.region.reaction(self.functional, state);
            series.push(self.displacement_sign * displacement, self.force_sign * force);
            file_io.write_step(self.mesh, state, series)?;

            // irreversibility
            update_lower_bound(state)?;

            // message
            print_step_end(self.config, staggered.iterations, staggered.status, self.force_sign * force);
            info!(
                step = state.step,
                load = imposed,
                force = self.force_sign * force,
                iterations = staggered.iterations,
                capped = staggered.status == SolveStatus::Capped,
                "load step completed"
            );
            report.steps.push(staggered);
        }
        print_footer(self.config);

        // final output
        report.wall_time_millis = stopwatch.elapsed().as_millis() as u64;
        if file_io.is_active() {
            file_io.write_pvd()?;
            report.write_json(&file_io.path_report())?;
        }
        Ok(report)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SolverStaggered;
    use crate::base::{Config, Dof, Ebc, Essential, LoadSchedule, ParamDamage, SampleMeshes, SampleParams};
    use crate::base::{BAR_LEFT_MARKER, BAR_RIGHT_MARKER, DEFAULT_TEST_DIR};
    use crate::fem::{EnergyFunctional, FemState, FileIo, ForceSeries, ReactionRegion};
    use approx::assert_relative_eq;
    use gemlab::mesh::Mesh;
    use gemlab::util::any_x;
    use std::fs;

    fn bar_essential(mesh: &Mesh) -> Essential {
        let left = mesh.search_first_marked_point(BAR_LEFT_MARKER, any_x).unwrap();
        let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x).unwrap();
        let mut essential = Essential::new();
        essential
            .at(&[left], Dof::Ux, Ebc::Fixed(0.0))
            .unwrap()
            .at(&[right], Dof::Ux, Ebc::Loaded(1.0))
            .unwrap();
        essential
    }

    fn bar_region(mesh: &Mesh, area: f64) -> ReactionRegion {
        let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x).unwrap();
        ReactionRegion::at_bar_end(mesh, right, area).unwrap()
    }

    #[test]
    fn new_captures_errors() {
        let mesh = SampleMeshes::bar(1.0, 4).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let config = Config::new();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let schedule = LoadSchedule::uniform_from_total(0.1, 2).unwrap();
        let mut essential = Essential::new();
        essential.at(&[0], Dof::Ux, Ebc::Fixed(0.0)).unwrap();
        assert_eq!(
            SolverStaggered::new(&config, &mesh, &fun, &essential, schedule, bar_region(&mesh, 1.0)).err(),
            Some("at least one prescribed displacement must be loaded")
        );
        let essential = bar_essential(&mesh);
        let mut solver =
            SolverStaggered::new(&config, &mesh, &fun, &essential, schedule, bar_region(&mesh, 1.0)).unwrap();
        assert_eq!(
            solver.set_signs(2.0, 1.0).err(),
            Some("the signs must be equal to 1.0 or -1.0")
        );
        assert_eq!(
            solver.set_monitor(9, Dof::Ux).err(),
            Some("cannot find equation number because PointId is out-of-bounds")
        );
    }

    #[test]
    fn undamaged_bar_is_linear_elastic() {
        let mesh = SampleMeshes::bar(1.0, 4).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let mut config = Config::new();
        config.set_thickness(2.0).unwrap();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let mut essential = bar_essential(&mesh);
        let region = bar_region(&mesh, config.thickness);
        let all: Vec<_> = (0..mesh.points.len()).collect();
        essential.fix_damage(&all, 0.0).unwrap();
        let schedule = LoadSchedule::uniform_from_total(0.1, 4).unwrap();
        let solver = SolverStaggered::new(&config, &mesh, &fun, &essential, schedule, region).unwrap();
        let mut state = FemState::new(&mesh, &essential).unwrap();
        let mut series = ForceSeries::new();
        let report = solver.solve(&mut state, &mut series, &mut FileIo::new()).unwrap();
        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.n_capped_steps(), 0);
        assert_eq!(report.n_staggered_iterations(), 4);
        assert_eq!(series.len(), 5);
        for i in 1..5 {
            let u = series.displacement()[i];
            // F = E A U / L
            assert_relative_eq!(series.force()[i], 1.0 * 2.0 * u / 1.0, max_relative = 1e-10);
        }
        assert_eq!(state.step, 4);
        assert_eq!(state.alpha_max(), 0.0);
    }

    #[test]
    fn damage_grows_monotonically() {
        let mesh = SampleMeshes::bar(1.0, 4).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let mut config = Config::new();
        config.set_tol_staggered(1e-6, 200).unwrap();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let essential = bar_essential(&mesh);
        let mut state = FemState::new(&mesh, &essential).unwrap();
        let mut lower_prev = state.lower.clone();
        let mut series = ForceSeries::new();
        for n in 1..4 {
            // one step at a time to check the lower bound after each step
            let schedule = LoadSchedule::Uniform {
                n_steps: 1,
                increment: 0.5 * (n as f64),
            };
            let solver =
                SolverStaggered::new(&config, &mesh, &fun, &essential, schedule, bar_region(&mesh, 1.0)).unwrap();
            solver.solve(&mut state, &mut series, &mut FileIo::new()).unwrap();
            for i in 0..state.lower.len() {
                assert!(state.lower[i] >= lower_prev[i]);
                assert_eq!(state.lower[i], state.alpha[i]);
            }
            lower_prev.copy_from(&state.lower);
        }
        assert!(state.alpha_max() > 0.0);
        assert_eq!(series.len(), 6); // each solve pushes the initial entry
    }

    #[test]
    fn monitor_signs_and_files_work() {
        let mesh = SampleMeshes::bar(1.0, 2).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let config = Config::new();
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        let mut essential = Essential::new();
        essential
            .at(&[0], Dof::Ux, Ebc::Fixed(0.0))
            .unwrap()
            .at(&[2], Dof::Ux, Ebc::Loaded(-1.0))
            .unwrap();
        essential.fix_damage(&[0, 1, 2], 0.0).unwrap();
        let region = ReactionRegion::at_bar_end(&mesh, 2, 1.0).unwrap();
        let schedule = LoadSchedule::uniform_from_total(0.2, 2).unwrap();
        let mut solver = SolverStaggered::new(&config, &mesh, &fun, &essential, schedule, region).unwrap();
        solver.set_monitor(1, Dof::Ux).unwrap().set_signs(-1.0, -1.0).unwrap();

        let out_dir = format!("{}/solver_staggered_files", DEFAULT_TEST_DIR);
        let mut file_io = FileIo::new_active(&mesh, "bar", Some(&out_dir)).unwrap();
        let mut state = FemState::new(&mesh, &essential).unwrap();
        let mut series = ForceSeries::new();
        solver.solve(&mut state, &mut series, &mut file_io).unwrap();

        // compression: u(0.5) = -imposed/2 and σ = -imposed
        assert_relative_eq!(series.displacement()[2], 0.1, max_relative = 1e-10);
        assert_relative_eq!(series.force()[2], 0.2, max_relative = 1e-10);
        assert_eq!(file_io.indices, &[0, 1]);
        let forces = fs::read_to_string(&file_io.path_forces()).unwrap();
        assert_eq!(forces.lines().count(), 3);
        assert!(fs::metadata(&file_io.path_pvd()).is_ok());
        assert!(fs::metadata(&file_io.path_report()).is_ok());
    }
}
