use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid argument to {operation}: series lengths differ ({left} vs {right})")]
    InvalidArgument {
        operation: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Failed to construct the t distribution: {0}")]
    Distribution(String),
}

/// Fails with [`AnalyticsError::InvalidArgument`] unless both series have the same length.
pub(crate) fn ensure_same_len(
    operation: &'static str,
    left: usize,
    right: usize,
) -> Result<(), AnalyticsError> {
    if left != right {
        return Err(AnalyticsError::InvalidArgument {
            operation,
            left,
            right,
        });
    }
    Ok(())
}
