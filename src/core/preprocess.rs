//! Preprocessing: text → bytes → padded 512-bit blocks → message schedule.

use std::ops::Index;

use crate::core::bitops::{small_sigma0, small_sigma1};
use crate::core::constants::{word_hex, BLOCK_BYTES, SCHEDULE_LEN};

pub type Block = [u8; BLOCK_BYTES];

/// One 8-bit binary string per input byte.
pub fn bytes_of(text: &str) -> Vec<String> {
    text.bytes().map(|b| format!("{b:08b}")).collect()
}

/// Append the `1` bit, zero fill and the 64-bit big-endian bit length.
pub fn pad_message(message: &[u8]) -> Vec<u8> {
    let bit_len = (message.len() as u64).wrapping_mul(8);
    let mut out = Vec::with_capacity(message.len() + BLOCK_BYTES + 9);
    out.extend_from_slice(message);
    out.push(0x80);
    while out.len() % BLOCK_BYTES != BLOCK_BYTES - 8 {
        out.push(0);
    }
    out.extend_from_slice(&bit_len.to_be_bytes());
    out
}

pub fn split_blocks(padded: &[u8]) -> Vec<Block> {
    padded
        .chunks_exact(BLOCK_BYTES)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_BYTES];
            block.copy_from_slice(chunk);
            block
        })
        .collect()
}

/// Text straight to its padded blocks.
pub fn blocks_of(text: &str) -> Vec<Block> {
    split_blocks(&pad_message(text.as_bytes()))
}

/// What the padding panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingSummary {
    pub message_bits: u64,
    /// Zero bits between the leading `1` and the length field.
    pub zero_bits: u64,
    pub length_bits: u64,
    pub blocks: usize,
}

impl PaddingSummary {
    pub fn for_message(message: &[u8]) -> Self {
        let padded_len = pad_message(message).len() as u64;
        let message_bits = message.len() as u64 * 8;
        Self {
            message_bits,
            zero_bits: padded_len * 8 - message_bits - 1 - 64,
            length_bits: 64,
            blocks: (padded_len as usize) / BLOCK_BYTES,
        }
    }

    pub fn total_bits(&self) -> u64 {
        self.message_bits + 1 + self.zero_bits + self.length_bits
    }
}

/// W[0..64] for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSchedule([u32; SCHEDULE_LEN]);

impl MessageSchedule {
    pub fn from_block(block: &Block) -> Self {
        let mut w = [0u32; SCHEDULE_LEN];
        for (t, word) in block.chunks_exact(4).enumerate() {
            w[t] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        }
        for t in 16..SCHEDULE_LEN {
            w[t] = small_sigma1(w[t - 2])
                .wrapping_add(w[t - 7])
                .wrapping_add(small_sigma0(w[t - 15]))
                .wrapping_add(w[t - 16]);
        }
        Self(w)
    }

    /// Use an externally supplied schedule as-is (no expansion).
    pub fn from_words(words: [u32; SCHEDULE_LEN]) -> Self {
        Self(words)
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(|w| word_hex(*w)).collect()
    }
}

impl Index<usize> for MessageSchedule {
    type Output = u32;

    fn index(&self, t: usize) -> &u32 {
        &self.0[t]
    }
}
