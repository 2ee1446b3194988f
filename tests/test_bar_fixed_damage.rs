use approx::assert_relative_eq;
use gemlab::prelude::*;
use pfmsim::{prelude::*, StrError};

// Uniaxial bar with prescribed damage bounds
//
// TEST GOAL
//
// This test verifies two limit cases of the staggered simulation:
//
// 1. With the damage bounds set to [0, 0], the simulation reduces to linear elasticity
// 2. With the lower bound set to 1 everywhere, the damage cannot move from 1 and the stiffness
//    equals the residual stiffness
//
// MESH
//
// 0----1----2---- ... ----10    (points)
// x=0                   x=200
//
// BOUNDARY CONDITIONS
//
// Ux = 0 on the left end; Ux = imposed on the right end
//
// CONFIGURATION AND PARAMETERS
//
// E = 30000, Gc = 0.12, ℓ = 5, ft = 3, k_res = 1e-6, A = 2

fn setup(mesh: &Mesh, thickness: f64) -> Result<(Essential, ReactionRegion), StrError> {
    let left = mesh.search_first_marked_point(BAR_LEFT_MARKER, any_x)?;
    let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x)?;
    let mut essential = Essential::new();
    essential
        .at(&[left], Dof::Ux, Ebc::Fixed(0.0))?
        .at(&[right], Dof::Ux, Ebc::Loaded(1.0))?;
    let region = ReactionRegion::at_bar_end(mesh, right, thickness)?;
    Ok((essential, region))
}

#[test]
fn test_bar_without_damage_is_linear_elastic() -> Result<(), StrError> {
    let (length, area) = (200.0, 2.0);
    let mesh = SampleMeshes::bar(length, 10)?;
    let param = SampleParams::param_bar_cornelissen();
    let mut config = Config::new();
    config.set_thickness(area)?;

    let (mut essential, region) = setup(&mesh, config.thickness)?;
    let all: Vec<_> = (0..mesh.points.len()).collect();
    essential.fix_damage(&all, 0.0)?;

    let functional = EnergyFunctional::new(&mesh, &param, &config)?;
    let total = 0.216;
    let schedule = LoadSchedule::uniform_from_total(total, 9)?;
    let solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;

    let mut state = FemState::new(&mesh, &essential)?;
    let mut series = ForceSeries::new();
    let report = solver.solve(&mut state, &mut series, &mut FileIo::new())?;
    assert_eq!(report.n_capped_steps(), 0);
    assert_eq!(report.n_staggered_iterations(), 9);

    // F = E A U / L
    let young = param.young;
    assert_relative_eq!(series.force()[9], young * total / length * area, max_relative = 1e-10);
    for i in 0..series.len() {
        let u = series.displacement()[i];
        assert_relative_eq!(series.force()[i], young * u / length * area, max_relative = 1e-10);
    }
    assert_eq!(state.alpha_max(), 0.0);
    assert_eq!(state.lower.max(), 0.0);
    Ok(())
}

#[test]
fn test_bar_fully_damaged_keeps_residual_stiffness() -> Result<(), StrError> {
    let (length, area) = (200.0, 2.0);
    let mesh = SampleMeshes::bar(length, 10)?;
    let param = SampleParams::param_bar_cornelissen();
    let mut config = Config::new();
    config.set_thickness(area)?.set_tol_u(1e-8, 1e-15, 20)?;

    let (essential, region) = setup(&mesh, config.thickness)?;
    let functional = EnergyFunctional::new(&mesh, &param, &config)?;
    let total = 0.0024;
    let schedule = LoadSchedule::uniform_from_total(total, 1)?;
    let solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;

    // lock the damage at one
    let mut state = FemState::new(&mesh, &essential)?;
    state.lower.fill(1.0);
    state.alpha.fill(1.0);

    let mut series = ForceSeries::new();
    solver.solve(&mut state, &mut series, &mut FileIo::new())?;
    for i in 0..state.alpha.len() {
        assert_eq!(state.alpha[i], 1.0);
    }

    // degradation at the floor: F = k_res E A U / L
    let k_res = param.k_res;
    assert_eq!(functional.model.softening.a(1.0), k_res);
    let correct = k_res * param.young * total / length * area;
    assert_relative_eq!(series.force()[1], correct, max_relative = 1e-8);
    Ok(())
}
