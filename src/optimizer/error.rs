use thiserror::Error;

/// Failures a scheduling request can produce.
///
/// `InvalidParameter` is recoverable by the caller resubmitting corrected
/// input; `InfeasibleOrUnbounded` only by adjusting parameters. The last two
/// are engine-side: `SolverFault` may warrant a caller-driven retry,
/// `Extraction` is always a defect.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid parameter {field}: {message}")]
    InvalidParameter { field: &'static str, message: String },

    #[error("no feasible schedule: the model is infeasible or unbounded")]
    InfeasibleOrUnbounded,

    #[error("solver fault: {0}")]
    SolverFault(String),

    #[error("solution extraction failed: {0}")]
    Extraction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_field() {
        let error = ScheduleError::InvalidParameter {
            field: "conversion_efficiency",
            message: "must be positive, got 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid parameter conversion_efficiency: must be positive, got 0"
        );
    }
}
