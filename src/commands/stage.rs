//! src/commands/stage.rs
//! Render one stage snapshot without entering the shell.

use anyhow::Result;

use crate::core::trace::advance_to;
use crate::core::{FinalHashMode, Stage};
use crate::render::view;

/// `stage_no` is 1-based, as shown in the progress line.
pub fn main(text: &str, mode: FinalHashMode, stage_no: u8, rounds: u8, color: bool) -> Result<()> {
    let target = Stage::from_index(usize::from(stage_no.saturating_sub(1)));
    let state = advance_to(text, mode, target, usize::from(rounds))?;
    print!("{}", view(&state, color));
    Ok(())
}
