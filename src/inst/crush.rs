use super::operand::{crush_pairs, strided};
use crate::memory::{AddressFault, Addr, MemoryPort};

/// CRUSH: pack the low nibbles of `count` source bytes, two per output byte.
///
/// Byte `2i` lands in the low nibble of `dst + i`, byte `2i + 1` in the high
/// nibble. With an odd `count` the last source byte is never read.
pub fn crush<P: MemoryPort + ?Sized>(port: &mut P, dst: Addr, src: Addr, count: u64) -> Result<(), AddressFault> {
  let pairs = crush_pairs(count);
  log::debug!("CRUSH: dst={:#x}, src={:#x}, count={} -> {} bytes", dst, src, count, pairs);

  for i in 0..pairs {
    let lo = port.read_byte(strided(src, i, 2))? & 0x0f;
    let hi = port.read_byte(strided(src, i, 2).wrapping_add(1))? & 0x0f;
    port.write_byte(strided(dst, i, 1), (hi << 4) | lo)?;
  }

  Ok(())
}
