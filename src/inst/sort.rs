use super::operand::{effective_sort_len, word_addr};
use crate::memory::{AddressFault, Addr, MemoryPort};

/// SORT: sort the first `sort_len` words of an `array_len`-word array in
/// place, ascending.
///
/// All `array_len` words are read, then all are written back in index
/// order; words past the sorted prefix are echoed unchanged. `sort_len` is
/// clamped to `array_len`.
pub fn sort<P: MemoryPort + ?Sized>(port: &mut P, addr: Addr, array_len: u64, sort_len: u64) -> Result<(), AddressFault> {
  let effective = effective_sort_len(sort_len, array_len);
  log::debug!(
    "SORT: addr={:#x}, array_len={}, sort_len={} -> {}",
    addr,
    array_len,
    sort_len,
    effective
  );

  // grows only as reads succeed, an unmapped tail faults before it gets big
  let mut buf = Vec::new();
  for i in 0..array_len {
    buf.push(port.read_word(word_addr(addr, i))?);
  }

  buf[..effective as usize].sort_unstable();

  for (i, &value) in buf.iter().enumerate() {
    port.write_word(word_addr(addr, i as u64), value)?;
  }

  Ok(())
}
