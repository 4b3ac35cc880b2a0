use super::operand::{word_addr, Grain};
use crate::memory::{AddressFault, Addr, MemoryPort};

/// DMA: transpose an NxN word matrix from `src` into `dst`.
///
/// N comes from the grain table. The whole source is read into a local
/// buffer before the first write, so `src` and `dst` may overlap. A fault
/// while reading leaves `dst` untouched; a fault while writing leaves a
/// prefix of `dst` (row-major) already written.
pub fn dma<P: MemoryPort + ?Sized>(port: &mut P, dst: Addr, src: Addr, grain: u64) -> Result<(), AddressFault> {
  let n = Grain::from_code(grain).dim();
  log::debug!("DMA: dst={:#x}, src={:#x}, grain={} -> {}x{}", dst, src, grain, n, n);

  let mut buf = vec![0u32; n * n];
  for i in 0..n {
    for j in 0..n {
      let idx = i * n + j;
      buf[idx] = port.read_word(word_addr(src, idx as u64))?;
    }
  }

  for i in 0..n {
    for j in 0..n {
      let idx = i * n + j;
      port.write_word(word_addr(dst, idx as u64), buf[j * n + i])?;
    }
  }

  Ok(())
}
