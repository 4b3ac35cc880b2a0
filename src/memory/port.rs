use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Byte address in the external memory space.
pub type Addr = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessSize {
  Byte,
  Word,
}

impl AccessSize {
  pub fn bytes(self) -> u64 {
    match self {
      AccessSize::Byte => 1,
      AccessSize::Word => 4,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDir {
  Read,
  Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultReason {
  Unmapped,
  Misaligned,
  ReadOnly,
  Injected,
}

impl fmt::Display for FaultReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      FaultReason::Unmapped => "unmapped",
      FaultReason::Misaligned => "misaligned",
      FaultReason::ReadOnly => "read-only",
      FaultReason::Injected => "injected",
    };
    f.write_str(s)
  }
}

/// The only error an instruction can raise. Raised by the port, never by the
/// engines themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address fault: {dir:?} {size:?} at {addr:#x} ({reason})")]
pub struct AddressFault {
  pub addr: Addr,
  pub size: AccessSize,
  pub dir: AccessDir,
  pub reason: FaultReason,
}

impl AddressFault {
  pub fn new(addr: Addr, size: AccessSize, dir: AccessDir, reason: FaultReason) -> Self {
    Self {
      addr,
      size,
      dir,
      reason,
    }
  }
}

/// Sized load/store channel into the target address space.
///
/// Every instruction touches memory only through these four calls. Each call
/// either fully happens or returns an [`AddressFault`]; there is no batching
/// and implementations must not reorder calls.
pub trait MemoryPort {
  fn read_byte(&mut self, addr: Addr) -> Result<u8, AddressFault>;
  fn read_word(&mut self, addr: Addr) -> Result<u32, AddressFault>;
  fn write_byte(&mut self, addr: Addr, value: u8) -> Result<(), AddressFault>;
  fn write_word(&mut self, addr: Addr, value: u32) -> Result<(), AddressFault>;
}

impl<P: MemoryPort + ?Sized> MemoryPort for &mut P {
  fn read_byte(&mut self, addr: Addr) -> Result<u8, AddressFault> {
    (**self).read_byte(addr)
  }

  fn read_word(&mut self, addr: Addr) -> Result<u32, AddressFault> {
    (**self).read_word(addr)
  }

  fn write_byte(&mut self, addr: Addr, value: u8) -> Result<(), AddressFault> {
    (**self).write_byte(addr, value)
  }

  fn write_word(&mut self, addr: Addr, value: u32) -> Result<(), AddressFault> {
    (**self).write_word(addr, value)
  }
}
