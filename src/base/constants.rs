/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/pfmsim/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/pfmsim/test";

/// Holds the square root of two (used by the Mandel representation of the strain)
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;
