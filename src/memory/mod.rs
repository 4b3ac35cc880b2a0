pub mod flat;
pub mod port;
pub mod probe;

pub use flat::{FlatMemory, Region};
pub use port::{AccessDir, AccessSize, AddressFault, Addr, FaultReason, MemoryPort};
pub use probe::{Access, AccessKind, Probe};
