//! Operand resolution shared by all four instructions.
//!
//! Raw register values are never used directly as sizes. The matrix
//! dimension goes through the grain table and lengths are clamped. Strided
//! addresses use wrapping arithmetic.

use crate::memory::Addr;

/// Largest matrix dimension the grain table can produce.
pub const MAX_DIM: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grain {
  G8,
  G16,
  G32,
}

impl Grain {
  /// Unknown codes fall back to 8x8.
  pub fn from_code(code: u64) -> Self {
    match code {
      0 => Grain::G8,
      1 => Grain::G16,
      2 => Grain::G32,
      _ => Grain::G8,
    }
  }

  pub fn dim(self) -> usize {
    match self {
      Grain::G8 => 8,
      Grain::G16 => 16,
      Grain::G32 => 32,
    }
  }
}

pub fn effective_sort_len(sort_len: u64, array_len: u64) -> u64 {
  sort_len.min(array_len)
}

/// Number of packed bytes CRUSH produces; an odd trailing byte is dropped.
pub fn crush_pairs(count: u64) -> u64 {
  count / 2
}

/// Address of the `index`-th element of `stride` bytes from `base`.
pub fn strided(base: Addr, index: u64, stride: u64) -> Addr {
  base.wrapping_add(index.wrapping_mul(stride))
}

pub fn word_addr(base: Addr, index: u64) -> Addr {
  strided(base, index, 4)
}
