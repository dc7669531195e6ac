#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic token generation for grid cells.
//!
//! Every cell's starting token is derived from a `luck` roll keyed on the
//! cell's canonical seed string. The roll is partitioned into fixed
//! probability bands so the same cell always yields the same token, on any
//! platform, no matter how often or in which order cells are generated.

use std::fmt;

use sha2::{Digest, Sha256};
use token_grid_core::{CellId, TokenValue};

/// Rolls strictly below this value leave the cell empty.
pub const EMPTY_BELOW: f64 = 0.70;
/// Rolls in `[EMPTY_BELOW, ONE_BELOW)` yield a token worth one.
pub const ONE_BELOW: f64 = 0.90;
/// Rolls in `[ONE_BELOW, TWO_BELOW)` yield a token worth two; higher rolls yield four.
pub const TWO_BELOW: f64 = 0.97;

/// Deterministic hash mapping a seed string onto `[0, 1)`.
///
/// Implementations must be pure: the same seed always produces the same roll.
pub trait Luck {
    /// Rolls the value associated with `seed`.
    fn luck(&self, seed: &str) -> f64;
}

impl<F> Luck for F
where
    F: Fn(&str) -> f64,
{
    fn luck(&self, seed: &str) -> f64 {
        self(seed)
    }
}

/// Portable [`Luck`] implementation backed by SHA-256.
///
/// The first eight digest bytes are read as a little-endian integer whose top
/// 53 bits become the mantissa of the roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Luck;

impl Luck for Sha256Luck {
    fn luck(&self, seed: &str) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);

        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let value = u64::from_le_bytes(bytes) >> 11;
        (value as f64) * SCALE
    }
}

/// Maps a roll onto the token it produces.
#[must_use]
pub fn roll_to_token(roll: f64) -> Option<TokenValue> {
    if roll < EMPTY_BELOW || roll.is_nan() {
        None
    } else if roll < ONE_BELOW {
        Some(TokenValue::ONE)
    } else if roll < TWO_BELOW {
        Some(TokenValue::TWO)
    } else {
        Some(TokenValue::FOUR)
    }
}

/// Pure generator that assigns starting tokens to cells.
pub struct TokenGenerator {
    luck: Box<dyn Luck>,
}

impl TokenGenerator {
    /// Creates a generator backed by the provided hash.
    #[must_use]
    pub fn new(luck: impl Luck + 'static) -> Self {
        Self {
            luck: Box::new(luck),
        }
    }

    /// Token a freshly observed cell starts with.
    #[must_use]
    pub fn generate(&self, cell: CellId) -> Option<TokenValue> {
        roll_to_token(self.luck.luck(&cell.seed()))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new(Sha256Luck)
    }
}

impl fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGenerator").finish_non_exhaustive()
    }
}
