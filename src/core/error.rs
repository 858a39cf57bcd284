use std::fmt;

use crate::core::stage::Stage;

/// Rejected transitions of the stepper or the stage controller.
///
/// Every variant is a precondition violation: the caller asked for a
/// transition whose guard does not hold. The state the caller holds is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// `advance_round` with the counter already at 64 (or beyond).
    RoundsExhausted { round: usize },
    /// Leaving Compression before round 64.
    CompressionIncomplete { round: usize },
    /// A round-level action outside the Compression stage.
    WrongStage { action: &'static str, stage: Stage },
    /// The state is missing data the transition needs (e.g. no schedule yet).
    MissingData(&'static str),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::RoundsExhausted { round } => {
                write!(f, "Precondition Violation: round {} of 64 already reached", round)
            }
            StepError::CompressionIncomplete { round } => write!(
                f,
                "Precondition Violation: compression at round {}/64, finish all rounds first",
                round
            ),
            StepError::WrongStage { action, stage } => write!(
                f,
                "Precondition Violation: '{}' is only available during Compression (current stage: {})",
                action,
                stage.label()
            ),
            StepError::MissingData(what) => write!(f, "Precondition Violation: missing {}", what),
        }
    }
}

impl std::error::Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn test_rounds_exhausted() {
        let err = StepError::RoundsExhausted { round: 64 };
        assert_eq!(format!("{}", err), "Precondition Violation: round 64 of 64 already reached");
    }
    #[test] fn test_wrong_stage() {
        let err = StepError::WrongStage { action: "next round", stage: Stage::Preprocessing };
        assert!(err.to_string().contains("current stage: Preprocessing"));
    }
    #[test] fn test_incomplete() {
        let err = StepError::CompressionIncomplete { round: 12 };
        assert!(err.to_string().contains("12/64"));
    }
}
