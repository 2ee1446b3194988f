use gemlab::prelude::*;
use pfmsim::{prelude::*, StrError};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "pfmsim_beam",
    about = "Simulates the three-point bending of a notch-free concrete beam with the phase-field model"
)]
struct Options {
    /// Number of cells along x
    #[structopt(long, default_value = "180")]
    nx: usize,

    /// Number of cells along y
    #[structopt(long, default_value = "41")]
    ny: usize,

    /// Output directory (the directory is cleared)
    #[structopt(long)]
    out_dir: Option<String>,

    /// Disables the generation of files
    #[structopt(long)]
    no_files: bool,

    /// Prints the staggered iterations
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> Result<(), StrError> {
    // logging
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // parse options
    let options = Options::from_args();

    // geometry (mm)
    let (lx, ly) = (450.0, 103.0);
    let (x_left, x_right, x_load) = (50.0, 400.0, 225.0);
    let mesh = SampleMeshes::rectangle(lx, ly, options.nx, options.ny)?;
    let features = Features::new(&mesh, false);
    let dx = lx / (options.nx as f64);
    let tol = dx / 2.0;
    let bottom = features.search_point_ids(At::Y(0.0), any_x)?;
    let top = features.search_point_ids(At::Y(ly), any_x)?;
    let nearest = |ids: &[usize], x: f64| -> Result<usize, StrError> {
        ids.iter()
            .copied()
            .find(|p| f64::abs(mesh.points[*p].coords[0] - x) <= tol)
            .ok_or("cannot find a mesh point near the requested x coordinate")
    };
    let support_left = nearest(&bottom, x_left)?;
    let support_right = nearest(&bottom, x_right)?;
    let load_point = nearest(&top, x_load)?;
    let x_load = mesh.points[load_point].coords[0];

    // configuration
    let mut config = Config::new();
    config
        .set_thickness(100.0)?
        .set_split(Split::Spectral)?
        .set_tol_u(1e-5, 5e-3, 50)?
        .set_tol_alpha(5e-4, 10000)?
        .set_tol_staggered(5e-4, 20000)?
        .set_verbose(true, options.verbose, false)?;
    config.tol_alpha_grad_rel = 5e-4;

    // boundary conditions
    let mut essential = Essential::new();
    essential
        .at(&[support_left], Dof::Ux, Ebc::Fixed(0.0))?
        .at(&[support_left, support_right], Dof::Uy, Ebc::Fixed(0.0))?
        .at(&[load_point], Dof::Uy, Ebc::Loaded(-1.0))?;

    // no damage at the supports and under the load
    let near_load = features.search_point_ids(At::Y(ly), |x| f64::abs(x[0] - x_load) <= 2.6)?;
    essential
        .fix_damage(&[support_left, support_right, load_point], 0.0)?
        .fix_damage(&near_load, 0.0)?;

    // reaction on the top edges touching the load point
    let edges = features.search_edges(At::Y(ly), |x| f64::abs(x[0] - x_load) <= dx * (1.0 + 1e-10))?;
    let region = ReactionRegion::new(&mesh, &edges, 1, config.thickness)?;

    // simulation: 3 coarse steps to 0.06 and 1410 fine steps to 1.0 (downwards)
    let param = SampleParams::param_beam_cornelissen();
    let functional = EnergyFunctional::new(&mesh, &param, &config)?;
    let schedule = LoadSchedule::two_segment_from_total(1.0, 3, 1410, 0.06)?;
    let mut solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;
    solver.set_monitor(load_point, Dof::Uy)?.set_signs(-1.0, -1.0)?;
    let mut file_io = if options.no_files {
        FileIo::new()
    } else {
        FileIo::new_active(&mesh, "beam", options.out_dir.as_deref())?
    };
    let mut state = FemState::new(&mesh, &essential)?;
    let mut series = ForceSeries::new();
    let report = solver.solve(&mut state, &mut series, &mut file_io)?;

    // message
    if let Some((index, force)) = series.peak() {
        println!("\npeak force = {:.6} at deflection = {:.6}", force, series.displacement()[index]);
    }
    println!("capped load steps = {}", report.n_capped_steps());
    println!("elapsed time = {} ms", report.wall_time_millis);
    if file_io.is_active() {
        println!("forces written to {}", file_io.path_forces());
    }
    Ok(())
}
