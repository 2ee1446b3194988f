use super::Config;

/// Defines the geometry idealization (1D bar, plane-strain, plane-stress)
///
/// # Default values
///
/// * The default thickness value is **1.0** for all cases
/// * In 2D, the default choice is **plane-strain**
/// * In 1D, the thickness holds the cross-sectional area
#[derive(Clone, Copy, Debug)]
pub struct Idealization {
    /// Indicates 2D instead of 1D
    pub two_dim: bool,

    /// Indicates a plane-stress idealization in 2D
    pub plane_stress: bool,

    /// Holds the out-of-plane thickness (2D) or the cross-sectional area (1D)
    pub thickness: f64,
}

impl Idealization {
    /// Allocates a new instance
    pub fn new(ndim: usize) -> Self {
        Idealization {
            two_dim: ndim == 2,
            plane_stress: false,
            thickness: 1.0,
        }
    }

    /// Allocates a new instance from the configuration data
    pub fn from_config(ndim: usize, config: &Config) -> Self {
        Idealization {
            two_dim: ndim == 2,
            plane_stress: ndim == 2 && config.plane_stress,
            thickness: config.thickness,
        }
    }

    /// Returns the Lamé parameters (λ, μ) considering the idealization
    ///
    /// In plane-stress, λ is replaced by `λ* = 2λμ/(λ+2μ)`.
    pub fn lame(&self, young: f64, poisson: f64) -> (f64, f64) {
        let lambda = young * poisson / ((1.0 + poisson) * (1.0 - 2.0 * poisson));
        let mu = young / (2.0 * (1.0 + poisson));
        if self.plane_stress {
            (2.0 * lambda * mu / (lambda + 2.0 * mu), mu)
        } else {
            (lambda, mu)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Idealization;
    use crate::base::Config;
    use approx::assert_relative_eq;

    #[test]
    fn new_works() {
        let ideal = Idealization::new(1);
        assert_eq!(ideal.two_dim, false);
        let mut config = Config::new();
        config.set_plane_stress(true).unwrap().set_thickness(100.0).unwrap();
        let ideal = Idealization::from_config(2, &config);
        assert_eq!(ideal.two_dim, true);
        assert_eq!(ideal.plane_stress, true);
        assert_eq!(ideal.thickness, 100.0);
        let ideal = Idealization::from_config(1, &config);
        assert_eq!(ideal.plane_stress, false);
    }

    #[test]
    fn lame_works() {
        let mut ideal = Idealization::new(2);
        let (lambda, mu) = ideal.lame(30000.0, 0.2);
        assert_relative_eq!(lambda, 8333.333333333334, epsilon = 1e-10);
        assert_relative_eq!(mu, 12500.0, epsilon = 1e-10);
        ideal.plane_stress = true;
        let (lambda, mu) = ideal.lame(30000.0, 0.2);
        // plane-stress: E ν / (1 - ν²)
        assert_relative_eq!(lambda, 30000.0 * 0.2 / (1.0 - 0.04), epsilon = 1e-10);
        assert_relative_eq!(mu, 12500.0, epsilon = 1e-10);
    }
}
