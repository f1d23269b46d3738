//! Step budgets for bounded random walks.

use crate::error::HarnessError;

/// Rule for choosing a walk's `max_steps` from the size of the component
/// containing the start vertex.
///
/// # Examples
/// ```
/// use ustcon_core::StepBudget;
///
/// assert_eq!(StepBudget::CoverTime.resolve(3).expect("fits in u64"), 54);
/// assert_eq!(StepBudget::Linear.resolve(3).expect("fits in u64"), 3);
/// assert_eq!(StepBudget::Fixed(100).resolve(3).expect("fits in u64"), 100);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StepBudget {
    /// `2·n³` steps, enough for a false-negative rate of at most one half.
    #[default]
    CoverTime,
    /// `n` steps. Fast but unreliable; useful for illustrating failures.
    Linear,
    /// An explicit budget independent of the component size.
    Fixed(u64),
}

impl StepBudget {
    /// Resolves the budget for a component of `component_size` vertices.
    ///
    /// # Errors
    /// Returns [`HarnessError::StepBudgetOverflow`] when the cover-time budget
    /// or the component size itself does not fit in a `u64`.
    pub fn resolve(self, component_size: usize) -> Result<u64, HarnessError> {
        let overflow = HarnessError::StepBudgetOverflow { component_size };
        match self {
            Self::CoverTime => cover_time_bound(component_size).ok_or(overflow),
            Self::Linear => u64::try_from(component_size).map_err(|_| overflow),
            Self::Fixed(steps) => Ok(steps),
        }
    }
}

/// Returns `2·n³`, or `None` when it overflows `u64`.
///
/// # Examples
/// ```
/// use ustcon_core::cover_time_bound;
///
/// assert_eq!(cover_time_bound(7), Some(686));
/// assert_eq!(cover_time_bound(usize::MAX), None);
/// ```
#[must_use]
pub fn cover_time_bound(vertices: usize) -> Option<u64> {
    let n = u64::try_from(vertices).ok()?;
    n.checked_mul(n)?.checked_mul(n)?.checked_mul(2)
}
