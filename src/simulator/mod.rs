pub mod config;
pub mod sim;
pub mod simulator;
pub mod utils;

// provide to g233
pub use simulator::{RunSummary, Simulator};
pub use utils::log;
