//! Core module tree: constant tables, bit mixing, preprocessing, the round
//! stepper and the stage controller.

pub mod bitops;
pub mod constants;
#[macro_use]
pub mod debug; // gated debug logging (SHASTEP_DEBUG=1) provides debug_log! macro
pub mod error;
pub mod preprocess;
pub mod stage;
pub mod stepper;
pub mod trace;

pub use error::StepError;
pub use stage::{dispatch, reduce, Action, FinalHashMode, Sha256State, Stage};
pub use stepper::{advance_round, init_compression, reset_round, RoundStepper, WorkingVariables};
