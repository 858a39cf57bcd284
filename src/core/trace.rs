//! Drive a session from input to Validation and record every round.
//!
//! The trace is a pure function of the input text and the hash mode, so two
//! runs can be compared line by line.

use serde::Serialize;

use crate::core::constants::{word_hex, ROUNDS};
use crate::core::error::StepError;
use crate::core::stage::{dispatch, Action, FinalHashMode, Sha256State, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    pub block: usize,
    /// Zero-based index of the round that produced `vars`.
    pub round: usize,
    pub w: String,
    pub k: String,
    pub t1: String,
    pub t2: String,
    pub vars: [String; 8],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub input: String,
    pub mode: FinalHashMode,
    pub blocks: usize,
    pub rounds: Vec<RoundRecord>,
    pub intermediate_hashes: Vec<String>,
    pub final_hash: String,
}

impl Trace {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Step through every stage and round; ends in `Stage::Validation`.
pub fn run_to_completion(
    input: &str,
    mode: FinalHashMode,
) -> Result<(Sha256State, Trace), StepError> {
    let mut state = Sha256State::new(input, mode);
    while state.stage != Stage::Compression {
        dispatch(&mut state, Action::NextStage)?;
    }

    let mut rounds = Vec::with_capacity(state.block_count() * 64);
    while state.stage == Stage::Compression {
        while state.can_advance_round() {
            dispatch(&mut state, Action::NextRound)?;
            let detail = state.last_round.ok_or(StepError::MissingData("round detail"))?;
            let vars = state.working_variables.ok_or(StepError::MissingData("working variables"))?;
            rounds.push(RoundRecord {
                block: state.block_index,
                round: detail.round,
                w: word_hex(detail.w),
                k: word_hex(detail.k),
                t1: word_hex(detail.t1),
                t2: word_hex(detail.t2),
                vars: vars.to_hex(),
            });
        }
        dispatch(&mut state, Action::NextStage)?;
    }
    dispatch(&mut state, Action::NextStage)?;

    let final_hash = state.final_hash.clone().ok_or(StepError::MissingData("final hash"))?;
    let trace = Trace {
        input: input.to_string(),
        mode,
        blocks: state.block_count(),
        rounds,
        intermediate_hashes: state.intermediate_hashes.clone(),
        final_hash,
    };
    Ok((state, trace))
}

/// State as it looks on arrival at `target`, with `rounds` rounds run if the
/// target is Compression. Stages before the target are completed in full.
pub fn advance_to(
    input: &str,
    mode: FinalHashMode,
    target: Stage,
    rounds: usize,
) -> Result<Sha256State, StepError> {
    let mut state = Sha256State::new(input, mode);
    while state.stage < target {
        while state.can_advance_round() {
            dispatch(&mut state, Action::NextRound)?;
        }
        dispatch(&mut state, Action::NextStage)?;
    }
    if target == Stage::Compression {
        for _ in 0..rounds.min(ROUNDS) {
            dispatch(&mut state, Action::NextRound)?;
        }
    }
    Ok(state)
}
