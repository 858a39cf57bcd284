//! The round stepper: one explicit SHA-256 compression round per call.
//!
//! The free functions are the in-process boundary the stage controller uses;
//! [`RoundStepper`] bundles the counter and the working variables for callers
//! that prefer an owned value.

use serde::Serialize;

use crate::core::bitops::{big_sigma0, big_sigma1, ch, maj};
use crate::core::constants::{word_hex, H0, K, ROUNDS};
use crate::core::error::StepError;
use crate::core::preprocess::MessageSchedule;

/// The eight 32-bit accumulators a..h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkingVariables {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub e: u32,
    pub f: u32,
    pub g: u32,
    pub h: u32,
}

impl WorkingVariables {
    pub const NAMES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

    pub fn from_words(w: [u32; 8]) -> Self {
        let [a, b, c, d, e, f, g, h] = w;
        Self { a, b, c, d, e, f, g, h }
    }

    pub fn to_words(&self) -> [u32; 8] {
        [self.a, self.b, self.c, self.d, self.e, self.f, self.g, self.h]
    }

    pub fn to_hex(&self) -> [String; 8] {
        self.to_words().map(word_hex)
    }

    /// The eight hex strings concatenated (64 hex digits).
    pub fn digest_hex(&self) -> String {
        self.to_hex().concat()
    }

    /// `chaining + self`, word by word, mod 2^32.
    pub fn feed_forward(&self, chaining: &[u32; 8]) -> [u32; 8] {
        let mut out = self.to_words();
        for (o, c) in out.iter_mut().zip(chaining) {
            *o = o.wrapping_add(*c);
        }
        out
    }
}

impl Default for WorkingVariables {
    fn default() -> Self {
        Self::from_words(H0)
    }
}

/// Intermediate values of one round, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundDetail {
    pub round: usize,
    pub w: u32,
    pub k: u32,
    pub sigma1_e: u32,
    pub ch_efg: u32,
    pub t1: u32,
    pub sigma0_a: u32,
    pub maj_abc: u32,
    pub t2: u32,
}

pub fn init_compression() -> WorkingVariables {
    WorkingVariables::from_words(H0)
}

pub fn reset_round() -> (usize, WorkingVariables) {
    (0, init_compression())
}

/// Values round `round` would compute from `vars`, without applying them.
pub fn round_detail(
    round: usize,
    vars: &WorkingVariables,
    schedule: &MessageSchedule,
) -> Result<RoundDetail, StepError> {
    if round >= ROUNDS {
        return Err(StepError::RoundsExhausted { round });
    }
    let WorkingVariables { a, b, c, e, f, g, h, .. } = *vars;
    let w = schedule[round];
    let k = K[round];

    let sigma1_e = big_sigma1(e);
    let ch_efg = ch(e, f, g);
    let t1 = h
        .wrapping_add(sigma1_e)
        .wrapping_add(ch_efg)
        .wrapping_add(k)
        .wrapping_add(w);
    let sigma0_a = big_sigma0(a);
    let maj_abc = maj(a, b, c);
    let t2 = sigma0_a.wrapping_add(maj_abc);

    Ok(RoundDetail { round, w, k, sigma1_e, ch_efg, t1, sigma0_a, maj_abc, t2 })
}

/// Apply one compression round. Returns the next counter and variables.
pub fn advance_round(
    round: usize,
    vars: &WorkingVariables,
    schedule: &MessageSchedule,
) -> Result<(usize, WorkingVariables), StepError> {
    let detail = round_detail(round, vars, schedule)?;
    Ok((round + 1, apply_round(vars, &detail)))
}

/// Variables after the round `d` was computed from.
pub(crate) fn apply_round(v: &WorkingVariables, d: &RoundDetail) -> WorkingVariables {
    WorkingVariables {
        a: d.t1.wrapping_add(d.t2),
        b: v.a,
        c: v.b,
        d: v.c,
        e: v.d.wrapping_add(d.t1),
        f: v.e,
        g: v.f,
        h: v.g,
    }
}

/// Owned stepper for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStepper {
    round: usize,
    vars: WorkingVariables,
}

impl RoundStepper {
    pub fn new() -> Self {
        let (round, vars) = reset_round();
        Self { round, vars }
    }

    /// Start from a chaining value other than H0 (later blocks).
    pub fn starting_at(vars: WorkingVariables) -> Self {
        Self { round: 0, vars }
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn vars(&self) -> &WorkingVariables {
        &self.vars
    }

    pub fn is_complete(&self) -> bool {
        self.round >= ROUNDS
    }

    /// One round. On error nothing changes.
    pub fn advance(&mut self, schedule: &MessageSchedule) -> Result<RoundDetail, StepError> {
        let detail = round_detail(self.round, &self.vars, schedule)?;
        self.vars = apply_round(&self.vars, &detail);
        self.round += 1;
        Ok(detail)
    }

    /// Run the remaining rounds.
    pub fn finish(&mut self, schedule: &MessageSchedule) -> Vec<RoundDetail> {
        let mut out = Vec::with_capacity(ROUNDS - self.round.min(ROUNDS));
        while let Ok(d) = self.advance(schedule) {
            out.push(d);
        }
        out
    }

    pub fn reset(&mut self) {
        (self.round, self.vars) = reset_round();
    }
}

impl Default for RoundStepper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preprocess::blocks_of;

    fn abc_schedule() -> MessageSchedule {
        MessageSchedule::from_block(&blocks_of("abc")[0])
    }

    #[test]
    fn first_round_of_abc() {
        let w = abc_schedule();
        let (round, vars) = advance_round(0, &init_compression(), &w).unwrap();
        assert_eq!(round, 1);
        assert_eq!(vars.a, 0x5d6aebcd);
        assert_eq!(vars.b, 0x6a09e667);
        assert_eq!(vars.e, 0xfa2a4622);
        assert_eq!(vars.h, 0x1f83d9ab);
    }

    #[test]
    fn detail_matches_applied_round() {
        let w = abc_schedule();
        let d = round_detail(0, &init_compression(), &w).unwrap();
        assert_eq!(d.t1, 0x54da50e8);
        assert_eq!(d.t2, 0x08909ae5);
        assert_eq!(d.k, 0x428a2f98);
        assert_eq!(d.w, 0x61626380);
    }

    #[test]
    fn sixty_four_rounds_then_feed_forward() {
        let w = abc_schedule();
        let mut s = RoundStepper::new();
        let details = s.finish(&w);
        assert_eq!(details.len(), 64);
        assert!(s.is_complete());
        assert_eq!(
            s.vars().digest_hex(),
            "506e3058d39a216504d24d6cb85e2ce95ef50f24fb121210948d25b6961f4894"
        );
        let out = s.vars().feed_forward(&H0);
        let hex: String = out.iter().map(|w| word_hex(*w)).collect();
        assert_eq!(hex, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn advance_at_64_is_rejected_without_change() {
        let w = abc_schedule();
        let mut s = RoundStepper::new();
        s.finish(&w);
        let before = s.clone();
        assert_eq!(s.advance(&w), Err(StepError::RoundsExhausted { round: 64 }));
        assert_eq!(s, before);
        assert_eq!(s.round(), 64);

        let vars = *before.vars();
        assert!(advance_round(64, &vars, &w).is_err());
    }

    #[test]
    fn second_block_starts_from_first_block_hash() {
        let input = "abcdbcdecdefdefgefghfghighijhijkijkljklmjklmnklmnolmnopmnopqnopq";
        let blocks = blocks_of(input);
        assert_eq!(blocks.len(), 2);

        let mut first = RoundStepper::new();
        first.finish(&MessageSchedule::from_block(&blocks[0]));
        let chaining = first.vars().feed_forward(&H0);

        let w1 = MessageSchedule::from_block(&blocks[1]);
        let mut second = RoundStepper::starting_at(WorkingVariables::from_words(chaining));
        assert_eq!(second.round(), 0);
        second.advance(&w1).unwrap();
        assert_eq!(second.vars().a, 0xed471abb);
        second.finish(&w1);
        let out = second.vars().feed_forward(&chaining);
        let hex: String = out.iter().map(|w| word_hex(*w)).collect();
        assert_eq!(hex, "9ad289b5b8ca3b67b3e1238ea026560d218cac02ee49b871795a3311874d107e");
    }

    #[test]
    fn reset_is_idempotent() {
        let w = abc_schedule();
        for n in [0usize, 1, 17, 64] {
            let mut s = RoundStepper::new();
            for _ in 0..n {
                s.advance(&w).unwrap();
            }
            s.reset();
            assert_eq!(s.round(), 0);
            assert_eq!(s.vars().to_words(), H0);
            s.reset();
            assert_eq!(s, RoundStepper::new());
        }
    }
}
