//! Stage controller: the whole visualisation session as one value type plus
//! a pure reducer.
//!
//! ```text
//!  Preprocessing → Initial Hash Values → Message Schedule → Compression → Final Hash → Validation
//!                                                             ↺ 64 rounds per block
//! ```
//!
//! [`reduce`] never mutates its input. A rejected action returns
//! [`StepError`] and the caller simply keeps the state it already has.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::constants::{word_hex, H0, ROUNDS};
use crate::core::error::StepError;
use crate::core::preprocess::{blocks_of, bytes_of, Block, MessageSchedule};
use crate::core::stepper::{apply_round, reset_round, round_detail, RoundDetail, WorkingVariables};
use crate::debug_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    Preprocessing,
    InitialHashValues,
    MessageSchedule,
    Compression,
    FinalHashCalculation,
    Validation,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Preprocessing,
        Stage::InitialHashValues,
        Stage::MessageSchedule,
        Stage::Compression,
        Stage::FinalHashCalculation,
        Stage::Validation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Out-of-range indices clamp to the last stage.
    pub fn from_index(i: usize) -> Stage {
        Self::ALL[i.min(Self::ALL.len() - 1)]
    }

    pub fn next(self) -> Stage {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Stage {
        Self::from_index(self.index().saturating_sub(1))
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Preprocessing => "Preprocessing",
            Stage::InitialHashValues => "Initial Hash Values",
            Stage::MessageSchedule => "Message Schedule",
            Stage::Compression => "Compression Function",
            Stage::FinalHashCalculation => "Final Hash Calculation",
            Stage::Validation => "Validation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a finished block becomes its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalHashMode {
    /// Add the block's starting chaining value (feed-forward). Real SHA-256.
    #[default]
    Standard,
    /// Take the working variables after round 64 as they are.
    Raw,
}

impl fmt::Display for FinalHashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalHashMode::Standard => f.write_str("standard"),
            FinalHashMode::Raw => f.write_str("raw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetInput(String),
    SetMode(FinalHashMode),
    TogglePadding,
    NextStage,
    PrevStage,
    NextRound,
    ResetRounds,
    Reset,
}

/// Digest comparison shown in the Validation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub computed: String,
    pub reference: String,
    pub matches: bool,
}

/// Everything the visualisation shows, owned by one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha256State {
    pub input: String,
    pub stage: Stage,
    pub round: usize,
    pub show_padding: bool,
    pub mode: FinalHashMode,
    pub binary_input: Vec<String>,
    pub blocks: Vec<Block>,
    pub block_index: usize,
    pub message_schedule: Option<MessageSchedule>,
    pub working_variables: Option<WorkingVariables>,
    /// Hash value the current block started from.
    pub chaining: [u32; 8],
    pub intermediate_hashes: Vec<String>,
    pub final_hash: Option<String>,
    pub last_round: Option<RoundDetail>,
}

impl Sha256State {
    pub fn new(input: impl Into<String>, mode: FinalHashMode) -> Self {
        let mut s = Self {
            input: input.into(),
            stage: Stage::Preprocessing,
            round: 0,
            show_padding: true,
            mode,
            binary_input: Vec::new(),
            blocks: Vec::new(),
            block_index: 0,
            message_schedule: None,
            working_variables: None,
            chaining: H0,
            intermediate_hashes: Vec::new(),
            final_hash: None,
            last_round: None,
        };
        s.reset();
        s
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn can_advance_round(&self) -> bool {
        self.stage == Stage::Compression && self.round < ROUNDS
    }

    pub fn can_next_stage(&self) -> bool {
        match self.stage {
            Stage::Validation => false,
            Stage::Compression => self.round >= ROUNDS,
            _ => true,
        }
    }

    pub fn can_prev_stage(&self) -> bool {
        self.stage != Stage::Preprocessing
    }

    /// Only meaningful once a final hash exists.
    pub fn validation(&self) -> Option<Validation> {
        let computed = self.final_hash.clone()?;
        let reference: String = Sha256::digest(self.input.as_bytes())
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        let matches = computed == reference;
        Some(Validation { computed, reference, matches })
    }

    fn reset(&mut self) {
        self.stage = Stage::Preprocessing;
        self.round = 0;
        self.binary_input = bytes_of(&self.input);
        self.blocks = blocks_of(&self.input);
        self.block_index = 0;
        self.message_schedule = None;
        self.working_variables = None;
        self.chaining = H0;
        self.intermediate_hashes.clear();
        self.final_hash = None;
        self.last_round = None;
    }

    fn load_block(&mut self, index: usize) -> Result<(), StepError> {
        let block = self.blocks.get(index).ok_or(StepError::MissingData("message block"))?;
        self.block_index = index;
        self.message_schedule = Some(MessageSchedule::from_block(block));
        Ok(())
    }

    fn begin_compression(&mut self) -> Result<(), StepError> {
        self.load_block(0)?;
        let (round, vars) = reset_round();
        self.round = round;
        self.working_variables = Some(vars);
        self.chaining = H0;
        self.intermediate_hashes.clear();
        self.final_hash = None;
        self.last_round = None;
        self.stage = Stage::Compression;
        Ok(())
    }

    fn next_round(&mut self) -> Result<(), StepError> {
        if self.stage != Stage::Compression {
            return Err(StepError::WrongStage { action: "next round", stage: self.stage });
        }
        let schedule = self.message_schedule.ok_or(StepError::MissingData("message schedule"))?;
        let vars = self.working_variables.ok_or(StepError::MissingData("working variables"))?;
        let detail = round_detail(self.round, &vars, &schedule)?;
        self.round += 1;
        self.working_variables = Some(apply_round(&vars, &detail));
        self.last_round = Some(detail);
        Ok(())
    }

    /// Leave a finished block: record its hash, then either start the next
    /// block or move on to the final hash.
    fn commit_block(&mut self) -> Result<(), StepError> {
        if self.round < ROUNDS {
            return Err(StepError::CompressionIncomplete { round: self.round });
        }
        let vars = self.working_variables.ok_or(StepError::MissingData("working variables"))?;
        let out = match self.mode {
            FinalHashMode::Standard => vars.feed_forward(&self.chaining),
            FinalHashMode::Raw => vars.to_words(),
        };
        let hash: String = out.iter().map(|w| word_hex(*w)).collect();
        debug_log!("[stage] block {} committed: {}", self.block_index, hash);
        self.intermediate_hashes.push(hash.clone());

        if self.block_index + 1 < self.blocks.len() {
            self.load_block(self.block_index + 1)?;
            self.chaining = out;
            self.working_variables = Some(WorkingVariables::from_words(out));
            self.round = 0;
            self.last_round = None;
        } else {
            self.final_hash = Some(hash);
            self.stage = Stage::FinalHashCalculation;
        }
        Ok(())
    }

    fn next_stage(&mut self) -> Result<(), StepError> {
        match self.stage {
            Stage::Validation => {}
            Stage::InitialHashValues => {
                self.load_block(0)?;
                self.stage = Stage::MessageSchedule;
            }
            Stage::MessageSchedule => self.begin_compression()?,
            Stage::Compression => self.commit_block()?,
            stage => self.stage = stage.next(),
        }
        Ok(())
    }

    fn prev_stage(&mut self) -> Result<(), StepError> {
        match self.stage {
            Stage::Preprocessing => {}
            Stage::FinalHashCalculation => {
                // undo the last commit so stepping forward again doesn't repeat it
                self.intermediate_hashes.pop();
                self.final_hash = None;
                self.stage = Stage::Compression;
            }
            Stage::Compression => {
                self.load_block(0)?;
                self.stage = Stage::MessageSchedule;
            }
            stage => self.stage = stage.prev(),
        }
        Ok(())
    }
}

impl Default for Sha256State {
    fn default() -> Self {
        Self::new("", FinalHashMode::default())
    }
}

/// `(state, action) -> state'`. On error the input state is the one to keep.
pub fn reduce(state: &Sha256State, action: Action) -> Result<Sha256State, StepError> {
    let mut next = state.clone();
    match action {
        Action::SetInput(text) => {
            next.input = text;
            next.reset();
        }
        Action::SetMode(mode) => {
            next.mode = mode;
            next.reset();
        }
        Action::TogglePadding => next.show_padding = !next.show_padding,
        Action::NextStage => next.next_stage()?,
        Action::PrevStage => next.prev_stage()?,
        Action::NextRound => next.next_round()?,
        Action::ResetRounds => {
            if next.stage != Stage::Compression {
                return Err(StepError::WrongStage { action: "reset rounds", stage: next.stage });
            }
            next.begin_compression()?;
        }
        Action::Reset => next.reset(),
    }
    Ok(next)
}

/// Apply `action` in place, keeping the old state when it is rejected.
pub fn dispatch(state: &mut Sha256State, action: Action) -> Result<(), StepError> {
    *state = reduce(state, action)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_compression(input: &str) -> Sha256State {
        let mut s = Sha256State::new(input, FinalHashMode::Standard);
        for _ in 0..3 {
            dispatch(&mut s, Action::NextStage).unwrap();
        }
        assert_eq!(s.stage, Stage::Compression);
        s
    }

    #[test]
    fn prev_at_first_stage_is_noop() {
        let s = Sha256State::new("abc", FinalHashMode::Standard);
        assert_eq!(reduce(&s, Action::PrevStage).unwrap(), s);
    }

    #[test]
    fn next_at_last_stage_is_noop() {
        let mut s = at_compression("abc");
        for _ in 0..64 {
            dispatch(&mut s, Action::NextRound).unwrap();
        }
        dispatch(&mut s, Action::NextStage).unwrap();
        dispatch(&mut s, Action::NextStage).unwrap();
        assert_eq!(s.stage, Stage::Validation);
        assert_eq!(reduce(&s, Action::NextStage).unwrap(), s);
        assert!(!s.can_next_stage());
    }

    #[test]
    fn entering_schedule_populates_it() {
        let mut s = Sha256State::new("abc", FinalHashMode::Standard);
        assert!(s.message_schedule.is_none());
        dispatch(&mut s, Action::NextStage).unwrap();
        dispatch(&mut s, Action::NextStage).unwrap();
        assert_eq!(s.stage, Stage::MessageSchedule);
        assert_eq!(s.message_schedule.unwrap()[0], 0x61626380);
    }

    #[test]
    fn compression_starts_from_h0() {
        let s = at_compression("abc");
        assert_eq!(s.round, 0);
        assert_eq!(s.working_variables.unwrap().to_words(), H0);
    }

    #[test]
    fn cannot_leave_compression_early() {
        let mut s = at_compression("abc");
        dispatch(&mut s, Action::NextRound).unwrap();
        let err = reduce(&s, Action::NextStage).unwrap_err();
        assert_eq!(err, StepError::CompressionIncomplete { round: 1 });
        assert!(!s.can_next_stage());
    }

    #[test]
    fn round_outside_compression_rejected() {
        let s = Sha256State::new("abc", FinalHashMode::Standard);
        assert!(matches!(
            reduce(&s, Action::NextRound),
            Err(StepError::WrongStage { stage: Stage::Preprocessing, .. })
        ));
    }

    #[test]
    fn round_64_rejected_and_state_kept() {
        let mut s = at_compression("abc");
        for _ in 0..64 {
            dispatch(&mut s, Action::NextRound).unwrap();
        }
        let before = s.clone();
        assert!(dispatch(&mut s, Action::NextRound).is_err());
        assert_eq!(s, before);
        assert_eq!(s.round, 64);
    }

    #[test]
    fn final_hash_abc_standard_and_raw() {
        for (mode, want) in [
            (FinalHashMode::Standard, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"),
            (FinalHashMode::Raw, "506e3058d39a216504d24d6cb85e2ce95ef50f24fb121210948d25b6961f4894"),
        ] {
            let mut s = at_compression("abc");
            dispatch(&mut s, Action::SetMode(mode)).unwrap();
            for _ in 0..3 {
                dispatch(&mut s, Action::NextStage).unwrap();
            }
            for _ in 0..64 {
                dispatch(&mut s, Action::NextRound).unwrap();
            }
            dispatch(&mut s, Action::NextStage).unwrap();
            assert_eq!(s.stage, Stage::FinalHashCalculation);
            assert_eq!(s.final_hash.as_deref(), Some(want));
            assert_eq!(s.intermediate_hashes, vec![want.to_string()]);
            let v = s.validation().unwrap();
            assert_eq!(v.matches, mode == FinalHashMode::Standard);
        }
    }

    #[test]
    fn back_from_final_hash_does_not_duplicate() {
        let mut s = at_compression("abc");
        for _ in 0..64 {
            dispatch(&mut s, Action::NextRound).unwrap();
        }
        dispatch(&mut s, Action::NextStage).unwrap();
        dispatch(&mut s, Action::PrevStage).unwrap();
        assert_eq!(s.stage, Stage::Compression);
        assert!(s.intermediate_hashes.is_empty());
        dispatch(&mut s, Action::NextStage).unwrap();
        assert_eq!(s.intermediate_hashes.len(), 1);
    }

    #[test]
    fn reset_rounds_restarts_compression() {
        let mut s = at_compression("abc");
        for _ in 0..10 {
            dispatch(&mut s, Action::NextRound).unwrap();
        }
        dispatch(&mut s, Action::ResetRounds).unwrap();
        assert_eq!(s.round, 0);
        assert_eq!(s.working_variables.unwrap().to_words(), H0);
        assert_eq!(s, at_compression("abc"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = at_compression("abc");
        dispatch(&mut s, Action::NextRound).unwrap();
        dispatch(&mut s, Action::Reset).unwrap();
        assert_eq!(s, Sha256State::new("abc", FinalHashMode::Standard));
        assert_eq!(s.binary_input, vec!["01100001", "01100010", "01100011"]);
    }

    #[test]
    fn stage_index_roundtrip_clamps() {
        assert_eq!(Stage::from_index(9), Stage::Validation);
        assert_eq!(Stage::Preprocessing.prev(), Stage::Preprocessing);
        assert_eq!(Stage::Validation.next(), Stage::Validation);
        assert_eq!(Stage::Compression.index(), 3);
    }
}
