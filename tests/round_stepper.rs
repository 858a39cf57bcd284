use shastep_project::core::constants::{word_hex, H0};
use shastep_project::core::preprocess::{blocks_of, MessageSchedule};
use shastep_project::core::{advance_round, init_compression, reset_round, StepError, WorkingVariables};

fn abc() -> MessageSchedule {
    MessageSchedule::from_block(&blocks_of("abc")[0])
}

fn hex(v: &WorkingVariables) -> String {
    v.to_hex().join(" ")
}

/// FIPS 180-2 appendix B.1 intermediate values for "abc".
#[test]
fn abc_compression_trace() {
    let w = abc();
    let (mut round, mut vars) = (0usize, init_compression());
    let mut seen = Vec::new();
    while round < 64 {
        (round, vars) = advance_round(round, &vars, &w).unwrap();
        seen.push(hex(&vars));
    }
    assert_eq!(round, 64);
    assert_eq!(seen[0], "5d6aebcd 6a09e667 bb67ae85 3c6ef372 fa2a4622 510e527f 9b05688c 1f83d9ab");
    assert_eq!(seen[15], "b0fa238e c0645fde d932eb16 87912990 07590dcd 0b92f20c 745a48de 1e578218");
    assert_eq!(seen[31], "73b33bf5 ea992a22 a0060b30 363482c9 ba591112 0109ab3a ade79437 6112a3b7");
    assert_eq!(seen[62], "d39a2165 04d24d6c b85e2ce9 b6ae8fff fb121210 948d25b6 961f4894 b21bad3d");
    assert_eq!(seen[63], "506e3058 d39a2165 04d24d6c b85e2ce9 5ef50f24 fb121210 948d25b6 961f4894");

    let digest: String = vars.feed_forward(&H0).iter().map(|w| word_hex(*w)).collect();
    assert_eq!(digest, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

#[test]
fn advance_past_64_is_a_precondition_violation() {
    let w = abc();
    let vars = init_compression();
    let err = advance_round(64, &vars, &w).unwrap_err();
    assert_eq!(err, StepError::RoundsExhausted { round: 64 });
    assert!(err.to_string().starts_with("Precondition Violation"));
    assert!(advance_round(1000, &vars, &w).is_err());
}

#[test]
fn reset_round_restores_constants() {
    let (round, vars) = reset_round();
    assert_eq!(round, 0);
    assert_eq!(vars.to_words(), H0);
    assert_eq!(vars, init_compression());
}

#[test]
fn external_schedule_is_used_verbatim() {
    // an all-zero schedule still walks the constants through the rounds
    let zero = MessageSchedule::from_words([0; 64]);
    let (_, a) = advance_round(0, &init_compression(), &zero).unwrap();
    let (_, b) = advance_round(0, &init_compression(), &abc()).unwrap();
    assert_ne!(a, b);
    assert_eq!(a.b, H0[0]);
}
