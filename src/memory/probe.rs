use super::port::{AccessDir, AccessSize, AddressFault, Addr, FaultReason, MemoryPort};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
  ReadByte,
  ReadWord,
  WriteByte,
  WriteWord,
}

impl AccessKind {
  pub fn size(self) -> AccessSize {
    match self {
      AccessKind::ReadByte | AccessKind::WriteByte => AccessSize::Byte,
      AccessKind::ReadWord | AccessKind::WriteWord => AccessSize::Word,
    }
  }

  pub fn dir(self) -> AccessDir {
    match self {
      AccessKind::ReadByte | AccessKind::ReadWord => AccessDir::Read,
      AccessKind::WriteByte | AccessKind::WriteWord => AccessDir::Write,
    }
  }
}

/// One attempted port call. `value` is the data written, or the data read
/// back; it is `None` when the call faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
  pub seq: u64,
  pub kind: AccessKind,
  pub addr: Addr,
  pub value: Option<u32>,
}

/// Port wrapper that records every call and can fault on the k-th one.
pub struct Probe<P> {
  inner: P,
  accesses: Vec<Access>,
  seq: u64,
  fault_at: Option<u64>,
}

impl<P: MemoryPort> Probe<P> {
  pub fn new(inner: P) -> Self {
    Self {
      inner,
      accesses: Vec::new(),
      seq: 0,
      fault_at: None,
    }
  }

  /// Fail the k-th access (1-based) with an injected fault. The faulting call
  /// is recorded but never forwarded to the inner port.
  pub fn with_fault_at(mut self, k: u64) -> Self {
    self.fault_at = Some(k);
    self
  }

  pub fn accesses(&self) -> &[Access] {
    &self.accesses
  }

  pub fn take_accesses(&mut self) -> Vec<Access> {
    std::mem::take(&mut self.accesses)
  }

  /// Total calls seen, including ones already taken.
  pub fn count(&self) -> u64 {
    self.seq
  }

  pub fn inner(&self) -> &P {
    &self.inner
  }

  pub fn into_inner(self) -> P {
    self.inner
  }

  fn access<T, F>(&mut self, kind: AccessKind, addr: Addr, written: Option<u32>, op: F) -> Result<T, AddressFault>
  where
    T: Copy + Into<u32>,
    F: FnOnce(&mut P) -> Result<T, AddressFault>,
  {
    self.seq += 1;
    let seq = self.seq;

    if self.fault_at == Some(seq) {
      self.accesses.push(Access {
        seq,
        kind,
        addr,
        value: None,
      });
      return Err(AddressFault::new(addr, kind.size(), kind.dir(), FaultReason::Injected));
    }

    let result = op(&mut self.inner);
    let value = match (&result, written) {
      (Err(_), _) => None,
      (Ok(_), Some(w)) => Some(w),
      (Ok(v), None) => Some((*v).into()),
    };
    self.accesses.push(Access { seq, kind, addr, value });
    result
  }
}

impl<P: MemoryPort> MemoryPort for Probe<P> {
  fn read_byte(&mut self, addr: Addr) -> Result<u8, AddressFault> {
    self.access(AccessKind::ReadByte, addr, None, |p| p.read_byte(addr))
  }

  fn read_word(&mut self, addr: Addr) -> Result<u32, AddressFault> {
    self.access(AccessKind::ReadWord, addr, None, |p| p.read_word(addr))
  }

  fn write_byte(&mut self, addr: Addr, value: u8) -> Result<(), AddressFault> {
    self
      .access(AccessKind::WriteByte, addr, Some(value as u32), |p| p.write_byte(addr, value).map(|_| 0u8))
      .map(|_| ())
  }

  fn write_word(&mut self, addr: Addr, value: u32) -> Result<(), AddressFault> {
    self
      .access(AccessKind::WriteWord, addr, Some(value), |p| p.write_word(addr, value).map(|_| 0u32))
      .map(|_| ())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::FlatMemory;

  #[test]
  fn test_probe_records_values() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x0, 8).unwrap();
    let mut probe = Probe::new(mem);

    probe.write_word(0x0, 0xdead_beef).unwrap();
    assert_eq!(probe.read_byte(0x0).unwrap(), 0xef);
    assert!(probe.read_word(0x8).is_err());

    let log = probe.accesses();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].kind, AccessKind::WriteWord);
    assert_eq!(log[0].value, Some(0xdead_beef));
    assert_eq!(log[1].value, Some(0xef));
    assert_eq!(log[2].value, None);
    assert_eq!(probe.count(), 3);
  }

  #[test]
  fn test_injected_fault_is_not_forwarded() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x0, 8).unwrap();
    let mut probe = Probe::new(mem).with_fault_at(2);

    probe.write_byte(0x0, 1).unwrap();
    let fault = probe.write_byte(0x1, 2).unwrap_err();
    assert_eq!(fault.reason, FaultReason::Injected);
    assert_eq!(fault.addr, 0x1);
    probe.write_byte(0x2, 3).unwrap();

    let mem = probe.into_inner();
    assert_eq!(mem.dump_bytes(0x0, 3).unwrap(), vec![1, 0, 3]);
  }
}
