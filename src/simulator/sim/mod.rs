pub mod mode;
pub mod shell;

pub use mode::{SimConfig, StepMode};
pub use shell::{parse_command, Command, Shell};
