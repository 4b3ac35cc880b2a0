//! Semantics of the G233 custom RISC-V instructions (DMA transpose, partial
//! SORT, nibble CRUSH and EXPAND) over a pluggable memory port, plus a
//! small workload simulator to drive them.

pub mod inst;
pub mod memory;
pub mod simulator;

pub use inst::{crush, dma, expand, sort, Instruction};
pub use memory::{AddressFault, Addr, FlatMemory, MemoryPort, Probe};
pub use simulator::sim::mode::{SimConfig, StepMode};
pub use simulator::utils::log;
