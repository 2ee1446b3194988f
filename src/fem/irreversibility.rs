use super::FemState;
use crate::StrError;

/// Locks the converged damage as the lower bound of the next load steps
///
/// This is the only place where the lower bound changes. Since `lower ≤ alpha`, the lower bound
/// never decreases; thus, damage may grow but never heal.
pub fn update_lower_bound(state: &mut FemState) -> Result<(), StrError> {
    state.check_bounds()?;
    state.lower.copy_from(&state.alpha);
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
