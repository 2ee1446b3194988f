use gemlab::prelude::*;
use pfmsim::{prelude::*, StrError};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "pfmsim_bar",
    about = "Simulates the uniaxial tension of a bar with the phase-field model"
)]
struct Options {
    /// Softening law: cornelissen, linear, at1, or at2
    #[structopt(long, default_value = "cornelissen")]
    law: String,

    /// Number of cells along the bar
    #[structopt(long, default_value = "200")]
    ncell: usize,

    /// Number of load steps
    #[structopt(long, default_value = "90")]
    nstep: usize,

    /// Total imposed displacement at the right end
    #[structopt(long, default_value = "0.216")]
    total: f64,

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

    // parameters (N and mm)
    let length = 200.0;
    let base = SampleParams::param_bar_cornelissen();
    let damage = match options.law.as_str() {
        "cornelissen" => base.damage,
        "linear" => SampleParams::param_bar_linear_softening().damage,
        "at1" => ParamDamage::At1,
        "at2" => ParamDamage::At2,
        _ => return Err("the softening law must be cornelissen, linear, at1, or at2"),
    };
    let param = ParamPhaseField { damage, ..base };
    param.validate()?;

    // mesh
    let mesh = SampleMeshes::bar(length, options.ncell)?;
    let left = mesh.search_first_marked_point(BAR_LEFT_MARKER, any_x)?;
    let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x)?;

    // configuration
    let mut config = Config::new();
    config
        .set_tol_u(1e-5, 1e-5, 50)?
        .set_tol_alpha(1e-7, 1000)?
        .set_tol_staggered(1e-5, 1000)?
        .set_verbose(true, options.verbose, false)?;

    // boundary conditions (no damage at the supports)
    let mut essential = Essential::new();
    essential
        .at(&[left], Dof::Ux, Ebc::Fixed(0.0))?
        .at(&[right], Dof::Ux, Ebc::Loaded(1.0))?;
    essential.fix_damage(&[left, right], 0.0)?;

    // reaction at the right end
    let region = ReactionRegion::at_bar_end(&mesh, right, config.thickness)?;

    // simulation
    let functional = EnergyFunctional::new(&mesh, &param, &config)?;
    let schedule = LoadSchedule::uniform_from_total(options.total, options.nstep)?;
    let mut solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;
    solver.set_monitor(right, Dof::Ux)?;
    let mut file_io = if options.no_files {
        FileIo::new()
    } else {
        FileIo::new_active(&mesh, "bar", options.out_dir.as_deref())?
    };
    let mut state = FemState::new(&mesh, &essential)?;
    let mut series = ForceSeries::new();
    let report = solver.solve(&mut state, &mut series, &mut file_io)?;

    // message
    if let Some((index, force)) = series.peak() {
        println!("\npeak force = {:.6} at displacement = {:.6}", force, series.displacement()[index]);
    }
    println!("capped load steps = {}", report.n_capped_steps());
    println!("elapsed time = {} ms", report.wall_time_millis);
    if file_io.is_active() {
        println!("forces written to {}", file_io.path_forces());
    }
    Ok(())
}
