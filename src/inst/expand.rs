use super::operand::strided;
use crate::memory::{AddressFault, Addr, MemoryPort};

/// EXPAND: split each of `count` source bytes into two nibble bytes,
/// low nibble first. Writes `2 * count` bytes at `dst`.
pub fn expand<P: MemoryPort + ?Sized>(port: &mut P, dst: Addr, src: Addr, count: u64) -> Result<(), AddressFault> {
  log::debug!("EXPAND: dst={:#x}, src={:#x}, count={}", dst, src, count);

  for i in 0..count {
    let v = port.read_byte(strided(src, i, 1))?;
    let out = strided(dst, i, 2);
    port.write_byte(out, v & 0x0f)?;
    port.write_byte(out.wrapping_add(1), (v >> 4) & 0x0f)?;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::{AccessKind, FlatMemory, Probe};

  #[test]
  fn test_expand_two_bytes() {
    let mut mem = FlatMemory::new();
    mem.alloc("src", 0x0, 2).unwrap();
    mem.alloc("dst", 0x10, 8).unwrap();
    mem.load_bytes(0x0, &[0x21, 0x43]).unwrap();

    expand(&mut mem, 0x10, 0x0, 2).unwrap();

    assert_eq!(mem.dump_bytes(0x10, 8).unwrap(), vec![0x1, 0x2, 0x3, 0x4, 0, 0, 0, 0]);
  }

  #[test]
  fn test_access_order() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x0, 8).unwrap();
    mem.load_bytes(0x0, &[0xf0]).unwrap();
    let mut probe = Probe::new(mem);

    expand(&mut probe, 0x4, 0x0, 1).unwrap();

    let log = probe.accesses();
    assert_eq!(log.len(), 3);
    assert_eq!((log[0].kind, log[0].addr), (AccessKind::ReadByte, 0x0));
    assert_eq!((log[1].kind, log[1].addr, log[1].value), (AccessKind::WriteByte, 0x4, Some(0x0)));
    assert_eq!((log[2].kind, log[2].addr, log[2].value), (AccessKind::WriteByte, 0x5, Some(0xf)));
  }
}
