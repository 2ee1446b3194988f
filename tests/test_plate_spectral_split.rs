use approx::assert_relative_eq;
use gemlab::prelude::*;
use pfmsim::{prelude::*, StrError};

// Damaged plate under tension and compression with the spectral split
//
// TEST GOAL
//
// This test verifies that only the tensile part of the strain energy is degraded. The damage is
// fixed to 0.5 everywhere, thus the displacement field is uniform and the reaction has a closed
// form solution for both loading directions.
//
// MESH
//
// 1.0  +-----+-----+-----+-----+
//      |     |     |     |     |
// 0.5  +-----+-----+-----+-----+
//      |     |     |     |     |
// 0.0  +-----+-----+-----+-----+
//     0.0   0.5   1.0   1.5   2.0
//
// 4 × 2 Qua4 cells
//
// BOUNDARY CONDITIONS
//
// Ux = 0 on the left edge; Uy = 0 at the origin; Ux = imposed on the right edge
//
// CONFIGURATION AND PARAMETERS
//
// E = 1, ν = 0.25 (λ = μ = 0.4), plane strain, thickness = 0.5, AT2 (a = 0.25 at α = 0.5)

fn run(split: Split, imposed: f64) -> Result<(f64, f64), StrError> {
    let (lx, ly) = (2.0, 1.0);
    let mesh = SampleMeshes::rectangle(lx, ly, 4, 2)?;
    let features = Features::new(&mesh, false);
    let param = SampleParams::param_unit(ParamDamage::At2);
    let mut config = Config::new();
    config.set_thickness(0.5)?.set_split(split)?.set_tol_u(1e-10, 1e-14, 30)?;

    let left = features.search_point_ids(At::X(0.0), any_x)?;
    let right = features.search_point_ids(At::X(lx), any_x)?;
    let origin = features.search_point_ids(At::XY(0.0, 0.0), any_x)?;
    let all: Vec<_> = (0..mesh.points.len()).collect();
    let mut essential = Essential::new();
    essential
        .at(&left, Dof::Ux, Ebc::Fixed(0.0))?
        .at(&origin, Dof::Uy, Ebc::Fixed(0.0))?
        .at(&right, Dof::Ux, Ebc::Loaded(1.0))?;
    essential.fix_damage(&all, 0.5)?;

    let edges = features.search_edges(At::X(lx), any_x)?;
    let region = ReactionRegion::new(&mesh, &edges, 0, config.thickness)?;
    let functional = EnergyFunctional::new(&mesh, &param, &config)?;
    let schedule = LoadSchedule::uniform_from_total(imposed, 1)?;
    let solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;

    let mut state = FemState::new(&mesh, &essential)?;
    let mut series = ForceSeries::new();
    solver.solve(&mut state, &mut series, &mut FileIo::new())?;
    let a = functional.model.softening.a(0.5);
    Ok((series.force()[1], a))
}

#[test]
fn test_plate_spectral_split() -> Result<(), StrError> {
    let (lx, ly, thickness) = (2.0, 1.0, 0.5);
    let (lambda, mu) = (0.4, 0.4);
    let u = 0.01;
    let e = u / lx;

    // no split: the whole energy is degraded in both directions
    let (f_tension, a) = run(Split::NoSplit, u)?;
    let (f_compression, _) = run(Split::NoSplit, -u)?;
    let young_plane_strain = 1.0 / (1.0 - 0.25 * 0.25);
    assert_relative_eq!(f_tension, a * young_plane_strain * e * ly * thickness, max_relative = 1e-8);
    assert_relative_eq!(f_compression, -f_tension, max_relative = 1e-8);

    // spectral split, tension: εxx > 0, εyy < 0, tr(ε) > 0
    //   σyy = a λ tr + 2μ εyy = 0
    //   σxx = a (λ tr + 2μ εxx)
    let (f_tension, _) = run(Split::Spectral, u)?;
    let eyy = -a * lambda * e / (a * lambda + 2.0 * mu);
    let sxx = a * (lambda * (e + eyy) + 2.0 * mu * e);
    assert_relative_eq!(f_tension, sxx * ly * thickness, max_relative = 1e-8);

    // spectral split, compression: εxx < 0, εyy > 0, tr(ε) < 0
    //   σyy = λ tr + 2 a μ εyy = 0
    //   σxx = λ tr + 2μ εxx
    let (f_compression, _) = run(Split::Spectral, -u)?;
    let eyy = lambda * e / (lambda + 2.0 * a * mu);
    let sxx = lambda * (-e + eyy) - 2.0 * mu * e;
    assert_relative_eq!(f_compression, sxx * ly * thickness, max_relative = 1e-8);

    // the material is stiffer in compression
    assert!(f_compression.abs() > 2.0 * f_tension.abs());
    Ok(())
}
