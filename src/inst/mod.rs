pub mod crush;
pub mod dma;
pub mod expand;
pub mod operand;
pub mod sort;

pub use crush::crush;
pub use dma::dma;
pub use expand::expand;
pub use operand::{Grain, MAX_DIM};
pub use sort::sort;

use crate::memory::{AddressFault, Addr, MemoryPort};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One custom instruction with its operands already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Instruction {
  Dma { dst: Addr, src: Addr, grain: u64 },
  Sort { addr: Addr, array_len: u64, sort_len: u64 },
  Crush { dst: Addr, src: Addr, count: u64 },
  Expand { dst: Addr, src: Addr, count: u64 },
}

impl Instruction {
  pub fn mnemonic(&self) -> &'static str {
    match self {
      Instruction::Dma { .. } => "dma",
      Instruction::Sort { .. } => "sort",
      Instruction::Crush { .. } => "crush",
      Instruction::Expand { .. } => "expand",
    }
  }

  pub fn execute<P: MemoryPort + ?Sized>(&self, port: &mut P) -> Result<(), AddressFault> {
    log::info!("exec {}", self);
    match *self {
      Instruction::Dma { dst, src, grain } => dma(port, dst, src, grain),
      Instruction::Sort {
        addr,
        array_len,
        sort_len,
      } => sort(port, addr, array_len, sort_len),
      Instruction::Crush { dst, src, count } => crush(port, dst, src, count),
      Instruction::Expand { dst, src, count } => expand(port, dst, src, count),
    }
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Instruction::Dma { dst, src, grain } => write!(f, "dma {:#x}, {:#x}, {}", dst, src, grain),
      Instruction::Sort {
        addr,
        array_len,
        sort_len,
      } => write!(f, "sort {:#x}, {}, {}", addr, array_len, sort_len),
      Instruction::Crush { dst, src, count } => write!(f, "crush {:#x}, {:#x}, {}", dst, src, count),
      Instruction::Expand { dst, src, count } => write!(f, "expand {:#x}, {:#x}, {}", dst, src, count),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::FlatMemory;

  #[test]
  fn test_display() {
    let inst = Instruction::Crush {
      dst: 0x200,
      src: 0x100,
      count: 5,
    };
    assert_eq!(inst.to_string(), "crush 0x200, 0x100, 5");
    assert_eq!(inst.mnemonic(), "crush");
  }

  #[test]
  fn test_toml_tagged() {
    #[derive(Deserialize)]
    struct Prog {
      program: Vec<Instruction>,
    }
    let prog: Prog = toml::from_str(
      r#"
      [[program]]
      op = "sort"
      addr = 0x100
      array_len = 5
      sort_len = 3

      [[program]]
      op = "dma"
      dst = 0x2000
      src = 0x1000
      grain = 2
      "#,
    )
    .unwrap();
    assert_eq!(
      prog.program,
      vec![
        Instruction::Sort {
          addr: 0x100,
          array_len: 5,
          sort_len: 3
        },
        Instruction::Dma {
          dst: 0x2000,
          src: 0x1000,
          grain: 2
        },
      ]
    );
  }

  #[test]
  fn test_execute_dispatches() {
    let mut mem = FlatMemory::new();
    mem.alloc("ram", 0x0, 0x10).unwrap();
    mem.load_bytes(0x0, &[0x21]).unwrap();
    Instruction::Expand {
      dst: 0x4,
      src: 0x0,
      count: 1,
    }
    .execute(&mut mem)
    .unwrap();
    assert_eq!(mem.dump_bytes(0x4, 2).unwrap(), vec![0x1, 0x2]);
  }
}
