// Host-side address space: named regions of plain bytes

use super::port::{AccessDir, AccessSize, AddressFault, Addr, FaultReason, MemoryPort};
use std::io::{Error, ErrorKind, Result};

#[derive(Debug, Clone)]
pub struct Region {
  pub name: String,
  pub base: Addr,
  pub writable: bool,
  data: Vec<u8>,
}

impl Region {
  pub fn size(&self) -> u64 {
    self.data.len() as u64
  }

  /// Last address plus one. Never overflows, `alloc` rejects such regions.
  pub fn end(&self) -> Addr {
    self.base + self.size()
  }

  fn offset_of(&self, addr: Addr, len: u64) -> Option<usize> {
    if addr < self.base {
      return None;
    }
    let off = addr - self.base;
    match off.checked_add(len) {
      Some(end) if end <= self.size() => Some(off as usize),
      _ => None,
    }
  }
}

#[derive(Debug, Default)]
pub struct FlatMemory {
  regions: Vec<Region>,
  enforce_alignment: bool,
}

impl FlatMemory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Word accesses to addresses that are not 4-aligned will fault.
  pub fn set_enforce_alignment(&mut self, enabled: bool) {
    self.enforce_alignment = enabled;
  }

  pub fn alloc(&mut self, name: &str, base: Addr, size: u64) -> Result<()> {
    self.alloc_region(name, base, size, true)
  }

  pub fn alloc_readonly(&mut self, name: &str, base: Addr, size: u64) -> Result<()> {
    self.alloc_region(name, base, size, false)
  }

  fn alloc_region(&mut self, name: &str, base: Addr, size: u64, writable: bool) -> Result<()> {
    if size == 0 {
      return Err(Error::new(ErrorKind::InvalidInput, format!("region '{}' has zero size", name)));
    }
    let end = base.checked_add(size).ok_or_else(|| {
      Error::new(
        ErrorKind::InvalidInput,
        format!("region '{}' at {:#x} wraps the address space", name, base),
      )
    })?;
    if let Some(other) = self.regions.iter().find(|r| base < r.end() && r.base < end) {
      return Err(Error::new(
        ErrorKind::InvalidInput,
        format!(
          "region '{}' [{:#x}, {:#x}) overlaps '{}' [{:#x}, {:#x})",
          name,
          base,
          end,
          other.name,
          other.base,
          other.end()
        ),
      ));
    }
    if self.region(name).is_some() {
      return Err(Error::new(ErrorKind::InvalidInput, format!("duplicate region name '{}'", name)));
    }

    self.regions.push(Region {
      name: name.to_string(),
      base,
      writable,
      data: vec![0; size as usize],
    });
    self.regions.sort_by_key(|r| r.base);
    Ok(())
  }

  pub fn regions(&self) -> &[Region] {
    &self.regions
  }

  pub fn region(&self, name: &str) -> Option<&Region> {
    self.regions.iter().find(|r| r.name == name)
  }

  fn locate(&self, addr: Addr, len: u64) -> Option<(usize, usize)> {
    self
      .regions
      .iter()
      .enumerate()
      .find_map(|(idx, r)| r.offset_of(addr, len).map(|off| (idx, off)))
  }

  fn check(&self, addr: Addr, size: AccessSize, dir: AccessDir) -> std::result::Result<(usize, usize), AddressFault> {
    if self.enforce_alignment && size == AccessSize::Word && addr % 4 != 0 {
      return Err(AddressFault::new(addr, size, dir, FaultReason::Misaligned));
    }
    let (idx, off) = self
      .locate(addr, size.bytes())
      .ok_or(AddressFault::new(addr, size, dir, FaultReason::Unmapped))?;
    if dir == AccessDir::Write && !self.regions[idx].writable {
      return Err(AddressFault::new(addr, size, dir, FaultReason::ReadOnly));
    }
    Ok((idx, off))
  }

  // --- Loader / debugger helpers ---
  // These bypass protection and alignment; they model the host, not the core.

  fn host_range(&self, addr: Addr, len: u64) -> Result<(usize, usize)> {
    self.locate(addr, len).ok_or_else(|| {
      Error::new(
        ErrorKind::InvalidInput,
        format!("range [{:#x}, +{:#x}) is not inside a single region", addr, len),
      )
    })
  }

  pub fn load_bytes(&mut self, addr: Addr, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
      return Ok(());
    }
    let (idx, off) = self.host_range(addr, bytes.len() as u64)?;
    self.regions[idx].data[off..off + bytes.len()].copy_from_slice(bytes);
    Ok(())
  }

  pub fn load_words(&mut self, addr: Addr, words: &[u32]) -> Result<()> {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    self.load_bytes(addr, &bytes)
  }

  pub fn dump_bytes(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
    if len == 0 {
      return Ok(Vec::new());
    }
    let (idx, off) = self.host_range(addr, len as u64)?;
    Ok(self.regions[idx].data[off..off + len].to_vec())
  }

  pub fn dump_words(&self, addr: Addr, count: usize) -> Result<Vec<u32>> {
    let len = count
      .checked_mul(4)
      .ok_or_else(|| Error::new(ErrorKind::InvalidInput, format!("{} words overflow the address space", count)))?;
    let bytes = self.dump_bytes(addr, len)?;
    Ok(
      bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect(),
    )
  }
}

impl MemoryPort for FlatMemory {
  fn read_byte(&mut self, addr: Addr) -> std::result::Result<u8, AddressFault> {
    let (idx, off) = self.check(addr, AccessSize::Byte, AccessDir::Read)?;
    Ok(self.regions[idx].data[off])
  }

  fn read_word(&mut self, addr: Addr) -> std::result::Result<u32, AddressFault> {
    let (idx, off) = self.check(addr, AccessSize::Word, AccessDir::Read)?;
    let d = &self.regions[idx].data[off..off + 4];
    Ok(u32::from_le_bytes([d[0], d[1], d[2], d[3]]))
  }

  fn write_byte(&mut self, addr: Addr, value: u8) -> std::result::Result<(), AddressFault> {
    let (idx, off) = self.check(addr, AccessSize::Byte, AccessDir::Write)?;
    self.regions[idx].data[off] = value;
    Ok(())
  }

  fn write_word(&mut self, addr: Addr, value: u32) -> std::result::Result<(), AddressFault> {
    let (idx, off) = self.check(addr, AccessSize::Word, AccessDir::Write)?;
    self.regions[idx].data[off..off + 4].copy_from_slice(&value.to_le_bytes());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_word_is_little_endian() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x1000, 16).unwrap();
    mem.write_word(0x1000, 0x1122_3344).unwrap();
    assert_eq!(mem.read_byte(0x1000).unwrap(), 0x44);
    assert_eq!(mem.read_byte(0x1003).unwrap(), 0x11);
    assert_eq!(mem.dump_words(0x1000, 1).unwrap(), vec![0x1122_3344]);
  }

  #[test]
  fn test_unmapped_and_straddling_access_fault() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x1000, 8).unwrap();

    let fault = mem.read_word(0x0ffc).unwrap_err();
    assert_eq!(fault.reason, FaultReason::Unmapped);

    // last word starts inside the region but runs past its end
    let fault = mem.write_word(0x1006, 0).unwrap_err();
    assert_eq!(fault.reason, FaultReason::Unmapped);
    assert_eq!(fault.dir, AccessDir::Write);
    assert_eq!(fault.size, AccessSize::Word);
    assert!(mem.read_word(0x1004).is_ok());
  }

  #[test]
  fn test_dump_rejects_oversized_count() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x1000, 16).unwrap();
    let err = mem.dump_words(0x1000, usize::MAX / 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(mem.dump_bytes(0x1000, usize::MAX).is_err());
  }

  #[test]
  fn test_readonly_region() {
    let mut mem = FlatMemory::new();
    mem.alloc_readonly("rom", 0x0, 4).unwrap();
    mem.load_bytes(0x0, &[7, 8, 9, 10]).unwrap();
    assert_eq!(mem.read_byte(0x2).unwrap(), 9);
    let fault = mem.write_byte(0x2, 0).unwrap_err();
    assert_eq!(fault.reason, FaultReason::ReadOnly);
    assert_eq!(mem.dump_bytes(0x0, 4).unwrap(), vec![7, 8, 9, 10]);
  }

  #[test]
  fn test_alignment_enforcement() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x0, 16).unwrap();
    assert!(mem.read_word(0x2).is_ok());

    mem.set_enforce_alignment(true);
    let fault = mem.read_word(0x2).unwrap_err();
    assert_eq!(fault.reason, FaultReason::Misaligned);
    // bytes are never misaligned
    assert!(mem.read_byte(0x3).is_ok());
  }

  #[test]
  fn test_alloc_rejects_overlap_and_zero_size() {
    let mut mem = FlatMemory::new();
    mem.alloc("a", 0x100, 0x100).unwrap();
    assert!(mem.alloc("b", 0x1ff, 4).is_err());
    assert!(mem.alloc("c", 0x80, 0x81).is_err());
    assert!(mem.alloc("d", 0x400, 0).is_err());
    assert!(mem.alloc("a", 0x800, 4).is_err());
    assert!(mem.alloc("e", u64::MAX - 1, 4).is_err());
    mem.alloc("f", 0x200, 4).unwrap();
    assert_eq!(mem.regions().len(), 2);
  }
}
