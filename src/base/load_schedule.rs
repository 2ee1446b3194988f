use crate::StrError;
use serde::{Deserialize, Serialize};

/// Defines the sequence of imposed boundary displacements (one value per load step)
///
/// ```text
///  imposed
///     ^                                   .·´ fine increments (Δf)
///     |                            . · ´
///     |                     . · ´
///     |             .·´ ´
///     |         .·´
///     |     .·´   coarse increments (Δc)
///     | .·´
///     +---+---+---+-+-+-+-+-+-+-+-+-+-+-> step
///       0   1   2   n_coarse ...
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum LoadSchedule {
    /// Constant increments: `value(n) = Δ·(n+1)`
    Uniform {
        /// Number of load steps
        n_steps: usize,

        /// Increment Δ
        increment: f64,
    },

    /// Coarse increments followed by fine increments
    ///
    /// ```text
    /// value(n) = Δc·(n+1)                          if n < n_coarse
    /// value(n) = Δc·n_coarse + Δf·(n+1-n_coarse)   otherwise
    /// ```
    TwoSegment {
        /// Total number of load steps (coarse plus fine)
        n_steps: usize,

        /// Number of coarse steps
        n_coarse: usize,

        /// Coarse increment Δc
        coarse_increment: f64,

        /// Fine increment Δf
        fine_increment: f64,
    },
}

impl LoadSchedule {
    /// Allocates a uniform schedule reaching `total` after `n_steps`
    pub fn uniform_from_total(total: f64, n_steps: usize) -> Result<Self, StrError> {
        if n_steps < 1 {
            return Err("the number of steps must be ≥ 1");
        }
        Ok(LoadSchedule::Uniform {
            n_steps,
            increment: total / (n_steps as f64),
        })
    }

    /// Allocates a two-segment schedule reaching `total` after `n_coarse + n_fine` steps
    ///
    /// The coarse segment covers `coarse_fraction · total`; the fine segment covers the rest.
    pub fn two_segment_from_total(
        total: f64,
        n_coarse: usize,
        n_fine: usize,
        coarse_fraction: f64,
    ) -> Result<Self, StrError> {
        if n_coarse < 1 || n_fine < 1 {
            return Err("the numbers of coarse and fine steps must be ≥ 1");
        }
        if coarse_fraction <= 0.0 || coarse_fraction >= 1.0 {
            return Err("the coarse fraction must be in (0.0, 1.0)");
        }
        Ok(LoadSchedule::TwoSegment {
            n_steps: n_coarse + n_fine,
            n_coarse,
            coarse_increment: coarse_fraction * total / (n_coarse as f64),
            fine_increment: (1.0 - coarse_fraction) * total / (n_fine as f64),
        })
    }

    /// Returns the number of load steps
    pub fn n_steps(&self) -> usize {
        match self {
            LoadSchedule::Uniform { n_steps, .. } => *n_steps,
            LoadSchedule::TwoSegment { n_steps, .. } => *n_steps,
        }
    }

    /// Returns the imposed value at a given step (step = 0 is the first step)
    pub fn value(&self, step: usize) -> f64 {
        match *self {
            LoadSchedule::Uniform { increment, .. } => increment * ((step + 1) as f64),
            LoadSchedule::TwoSegment {
                n_coarse,
                coarse_increment,
                fine_increment,
                ..
            } => {
                if step < n_coarse {
                    coarse_increment * ((step + 1) as f64)
                } else {
                    coarse_increment * (n_coarse as f64) + fine_increment * ((step + 1 - n_coarse) as f64)
                }
            }
        }
    }

    /// Returns all imposed values
    pub fn values(&self) -> Vec<f64> {
        (0..self.n_steps()).map(|n| self.value(n)).collect()
    }

    /// Validates the schedule
    pub fn validate(&self) -> Result<(), StrError> {
        if self.n_steps() < 1 {
            return Err("the number of steps must be ≥ 1");
        }
        if let LoadSchedule::TwoSegment { n_steps, n_coarse, .. } = self {
            if n_coarse > n_steps {
                return Err("the number of coarse steps must be ≤ the number of steps");
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
