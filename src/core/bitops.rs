//! Bit-mixing functions used by the message schedule and the compression rounds.
//!
//! Everything here is total over `u32`; there is no failure mode.

/// Right-rotate within a 32-bit word. `n` is taken modulo 32.
#[inline]
pub fn rotr(x: u32, n: u32) -> u32 {
    x.rotate_right(n % 32)
}

/// Ch(x,y,z) = (x AND y) XOR (NOT x AND z)
#[inline]
pub fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

/// Maj(x,y,z) = (x AND y) XOR (x AND z) XOR (y AND z)
#[inline]
pub fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Σ0, applied to `a` each round.
#[inline]
pub fn big_sigma0(x: u32) -> u32 {
    rotr(x, 2) ^ rotr(x, 13) ^ rotr(x, 22)
}

/// Σ1, applied to `e` each round.
#[inline]
pub fn big_sigma1(x: u32) -> u32 {
    rotr(x, 6) ^ rotr(x, 11) ^ rotr(x, 25)
}

/// γ0 (schedule expansion).
#[inline]
pub fn small_sigma0(x: u32) -> u32 {
    rotr(x, 7) ^ rotr(x, 18) ^ (x >> 3)
}

/// γ1 (schedule expansion).
#[inline]
pub fn small_sigma1(x: u32) -> u32 {
    rotr(x, 17) ^ rotr(x, 19) ^ (x >> 10)
}
