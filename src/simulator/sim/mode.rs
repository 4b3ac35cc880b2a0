use crate::simulator::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
  Continuous,
  Step,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
  pub quiet: bool,
  pub step_mode: StepMode,
  pub trace_file: Option<String>,
  pub stop_on_fault: bool,
  pub enforce_alignment: bool,
}

impl SimConfig {
  pub fn from_app_config(app_config: &AppConfig) -> Self {
    let sim = &app_config.simulation;
    Self {
      quiet: sim.quiet,
      step_mode: if sim.step_mode {
        StepMode::Step
      } else {
        StepMode::Continuous
      },
      trace_file: if sim.trace_file.is_empty() {
        None
      } else {
        Some(sim.trace_file.clone())
      },
      stop_on_fault: sim.stop_on_fault,
      enforce_alignment: sim.enforce_alignment,
    }
  }
}

impl Default for SimConfig {
  fn default() -> Self {
    Self::from_app_config(&AppConfig::default())
  }
}
