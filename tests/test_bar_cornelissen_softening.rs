use approx::assert_relative_eq;
use gemlab::prelude::*;
use pfmsim::{prelude::*, StrError};

// Uniaxial bar with the Cornelissen softening law
//
// TEST GOAL
//
// This test verifies the complete staggered simulation of a bar under tension: the force rises
// linearly, peaks near the tensile strength, and then softens. It also verifies that the damage
// never heals (the lower bound of each step equals the damage of the previous step).
//
// MESH
//
// 0----1----2---- ... ----50    (points)
// x=0                   x=200
//
// BOUNDARY CONDITIONS
//
// Ux = 0 on the left end; Ux = imposed on the right end
// Damage fixed to zero at both ends
//
// CONFIGURATION AND PARAMETERS
//
// E = 30000, Gc = 0.12, ℓ = 5, ft = 3, k_res = 1e-6, A = 1
// 90 steps of 0.0024

#[test]
fn test_bar_cornelissen_softening() -> Result<(), StrError> {
    // mesh
    let length = 200.0;
    let mesh = SampleMeshes::bar(length, 50)?;
    let left = mesh.search_first_marked_point(BAR_LEFT_MARKER, any_x)?;
    let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x)?;

    // parameters and configuration
    let param = SampleParams::param_bar_cornelissen();
    let mut config = Config::new();
    config.set_tol_staggered(1e-5, 300)?;

    // boundary conditions
    let mut essential = Essential::new();
    essential
        .at(&[left], Dof::Ux, Ebc::Fixed(0.0))?
        .at(&[right], Dof::Ux, Ebc::Loaded(1.0))?;
    essential.fix_damage(&[left, right], 0.0)?;

    // reaction region
    let region = ReactionRegion::at_bar_end(&mesh, right, config.thickness)?;

    // solver
    let functional = EnergyFunctional::new(&mesh, &param, &config)?;
    let schedule = LoadSchedule::Uniform {
        n_steps: 90,
        increment: 0.0024,
    };
    let mut solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;
    solver.set_monitor(right, Dof::Ux)?;

    // run
    let out_dir = format!("{}/bar_cornelissen_softening", DEFAULT_TEST_DIR);
    let mut file_io = FileIo::new_active(&mesh, "bar", Some(&out_dir))?;
    let mut state = FemState::new(&mesh, &essential)?;
    let mut series = ForceSeries::new();
    let report = solver.solve(&mut state, &mut series, &mut file_io)?;
    assert_eq!(report.steps.len(), 90);
    assert_eq!(series.len(), 91);

    // elastic stage: F = E A U / L
    assert_eq!(series.force()[0], 0.0);
    assert_relative_eq!(series.displacement()[1], 0.0024, max_relative = 1e-12);
    assert_relative_eq!(series.force()[1], 30000.0 * 0.0024 / length, max_relative = 1e-3);

    // peak near the tensile strength, then softening
    let (index, peak) = series.peak().unwrap();
    assert!(peak > 2.7 && peak < 3.1, "peak = {}", peak);
    assert!(index > 1 && index < 90);
    let last = series.force()[90];
    assert!(last < 0.25 * peak, "last = {}, peak = {}", last, peak);

    // damage localizes and the fixed ends remain intact
    assert!(state.alpha_max() > 0.9);
    assert_eq!(state.alpha[left], 0.0);
    assert_eq!(state.alpha[right], 0.0);

    // irreversibility
    for k in 1..file_io.indices.len() {
        let prev = FemState::read_json(&file_io.path_state(k - 1))?;
        let curr = FemState::read_json(&file_io.path_state(k))?;
        for i in 0..curr.alpha.len() {
            assert_eq!(curr.lower[i], prev.alpha[i]);
            assert!(curr.lower[i] >= prev.lower[i]);
            assert!(curr.alpha[i] >= curr.lower[i]);
        }
    }
    Ok(())
}
