use crate::memory::{Addr, FlatMemory};
use crate::simulator::simulator::RunSummary;
use serde::{Deserialize, Serialize};
use std::io;

const WORDS_PER_LINE: usize = 8;
const BYTES_PER_LINE: usize = 16;

/// How a memory dump is grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
  #[default]
  Word,
  Byte,
}

pub fn format_words(base: Addr, words: &[u32]) -> Vec<String> {
  words
    .chunks(WORDS_PER_LINE)
    .enumerate()
    .map(|(line, chunk)| {
      let cells: Vec<String> = chunk.iter().map(|w| format!("{:08x}", w)).collect();
      format!("{:#010x}: {}", base + (line * WORDS_PER_LINE * 4) as u64, cells.join(" "))
    })
    .collect()
}

pub fn format_bytes(base: Addr, bytes: &[u8]) -> Vec<String> {
  bytes
    .chunks(BYTES_PER_LINE)
    .enumerate()
    .map(|(line, chunk)| {
      let cells: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
      format!("{:#010x}: {}", base + (line * BYTES_PER_LINE) as u64, cells.join(" "))
    })
    .collect()
}

/// Print `count` units starting at `addr`
pub fn print_memory(mem: &FlatMemory, addr: Addr, count: usize, view: View) -> io::Result<()> {
  let lines = match view {
    View::Word => format_words(addr, &mem.dump_words(addr, count)?),
    View::Byte => format_bytes(addr, &mem.dump_bytes(addr, count)?),
  };
  for line in lines {
    println!("  {}", line);
  }
  Ok(())
}

/// Lines for a whole region. In word view a size that is not a multiple of
/// four ends with a byte line for the tail.
pub fn region_lines(mem: &FlatMemory, name: &str, view: View) -> io::Result<Vec<String>> {
  let region = mem
    .region(name)
    .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no region named '{}'", name)))?;
  let size = region.size() as usize;
  match view {
    View::Byte => Ok(format_bytes(region.base, &mem.dump_bytes(region.base, size)?)),
    View::Word => {
      let words = size / 4;
      let mut lines = format_words(region.base, &mem.dump_words(region.base, words)?);
      let tail_addr = region.base + (words * 4) as u64;
      lines.extend(format_bytes(tail_addr, &mem.dump_bytes(tail_addr, size % 4)?));
      Ok(lines)
    }
  }
}

pub fn print_region(mem: &FlatMemory, name: &str, view: View) -> io::Result<()> {
  let lines = region_lines(mem, name, view)?;
  if let Some(region) = mem.region(name) {
    println!("\n[{}] {:#x} ({:?})", region.name, region.base, view);
  }
  for line in lines {
    println!("  {}", line);
  }
  Ok(())
}

pub fn print_summary(summary: &RunSummary) {
  println!("\n--- Run Summary ---");
  println!("  instructions: {}", summary.executed);
  println!("  faults:       {}", summary.faults);
  println!("  accesses:     {}", summary.accesses);
  if summary.halted {
    println!("  halted on fault");
  }
  println!("--- End Summary ---\n");
}
