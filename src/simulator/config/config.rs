use crate::inst::Instruction;
use crate::simulator::utils::report::View;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// One mapped region and its initial contents
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionConfig {
  pub name: String,
  pub base: u64,
  pub size: u64,
  #[serde(default = "default_writable")]
  pub writable: bool,
  /// Initial words, stored little-endian from `base`
  #[serde(default)]
  pub words: Vec<u32>,
  /// Initial bytes from `base`
  #[serde(default)]
  pub bytes: Vec<u8>,
  /// Print the region after the run
  #[serde(default)]
  pub dump: bool,
  #[serde(default)]
  pub view: View,
}

fn default_writable() -> bool {
  true
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MemorySection {
  #[serde(default)]
  pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationSection {
  #[serde(default)]
  pub quiet: bool,
  #[serde(default)]
  pub step_mode: bool,
  #[serde(default)]
  pub trace_file: String,
  #[serde(default = "default_stop_on_fault")]
  pub stop_on_fault: bool,
  #[serde(default)]
  pub enforce_alignment: bool,
}

fn default_stop_on_fault() -> bool {
  true
}

impl Default for SimulationSection {
  fn default() -> Self {
    Self {
      quiet: false,
      step_mode: false,
      trace_file: String::new(),
      stop_on_fault: default_stop_on_fault(),
      enforce_alignment: false,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
  #[serde(default)]
  pub simulation: SimulationSection,
  #[serde(default)]
  pub memory: MemorySection,
  #[serde(default)]
  pub program: Vec<Instruction>,
}

/// Built-in defaults, a small demo workload
pub fn load_default_config() -> io::Result<AppConfig> {
  parse_config(DEFAULT_CONFIG)
}

pub fn load_config_file(path: &Path) -> io::Result<AppConfig> {
  let content = fs::read_to_string(path)
    .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("cannot read config file {:?}: {}", path, e)))?;
  parse_config(&content)
}

pub fn parse_config(content: &str) -> io::Result<AppConfig> {
  toml::from_str::<AppConfig>(content)
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("failed to parse TOML config: {}", e)))
}

/// Merge two configs, the second one wins
pub fn merge_config(mut base: AppConfig, override_config: AppConfig) -> AppConfig {
  if !override_config.memory.regions.is_empty() {
    base.memory.regions = override_config.memory.regions;
  }
  if !override_config.program.is_empty() {
    base.program = override_config.program;
  }

  let sim = override_config.simulation;
  if sim.quiet {
    base.simulation.quiet = true;
  }
  if sim.step_mode {
    base.simulation.step_mode = true;
  }
  if !sim.trace_file.is_empty() {
    base.simulation.trace_file = sim.trace_file;
  }
  if !sim.stop_on_fault {
    base.simulation.stop_on_fault = false;
  }
  if sim.enforce_alignment {
    base.simulation.enforce_alignment = true;
  }

  base
}

pub fn apply_cli_overrides(config: &mut AppConfig, quiet: bool, step: bool, trace_file: Option<&str>, no_stop_on_fault: bool) {
  if quiet {
    config.simulation.quiet = true;
  }
  if step {
    config.simulation.step_mode = true;
  }
  if let Some(file) = trace_file {
    config.simulation.trace_file = file.to_string();
  }
  if no_stop_on_fault {
    config.simulation.stop_on_fault = false;
  }
}

pub fn validate_config(config: &AppConfig) -> io::Result<()> {
  let mut names = HashSet::new();
  for region in &config.memory.regions {
    if !names.insert(region.name.as_str()) {
      return Err(invalid(format!("duplicate region name '{}'", region.name)));
    }
    if region.size == 0 {
      return Err(invalid(format!("region '{}' has zero size", region.name)));
    }
    if !region.words.is_empty() && !region.bytes.is_empty() {
      return Err(invalid(format!(
        "region '{}' sets both words and bytes, pick one",
        region.name
      )));
    }
    let init_len = region.words.len() as u64 * 4 + region.bytes.len() as u64;
    if init_len > region.size {
      return Err(invalid(format!(
        "region '{}' initial data ({} bytes) exceeds its size ({} bytes)",
        region.name, init_len, region.size
      )));
    }
  }

  let mut spans: Vec<(u64, u64, &str)> = config
    .memory
    .regions
    .iter()
    .map(|r| (r.base, r.base.saturating_add(r.size), r.name.as_str()))
    .collect();
  spans.sort();
  for pair in spans.windows(2) {
    let (_, prev_end, prev) = pair[0];
    let (next_base, _, next) = pair[1];
    if next_base < prev_end {
      return Err(invalid(format!("regions '{}' and '{}' overlap", prev, next)));
    }
  }

  Ok(())
}

fn invalid(msg: String) -> io::Error {
  io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Load and merge configs
///
/// 1. built-in defaults
/// 2. custom config file, if any
/// 3. CLI overrides
/// 4. validation
pub fn load_and_merge_configs(
  custom_config_path: Option<&Path>,
  quiet: bool,
  step: bool,
  trace_file: Option<&str>,
  no_stop_on_fault: bool,
) -> io::Result<AppConfig> {
  let mut config = load_default_config()?;

  if let Some(path) = custom_config_path {
    let custom_config = load_config_file(path)?;
    config = merge_config(config, custom_config);
  }

  apply_cli_overrides(&mut config, quiet, step, trace_file, no_stop_on_fault);

  validate_config(&config)?;

  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config_is_valid() {
    let config = load_default_config().unwrap();
    validate_config(&config).unwrap();
    assert!(!config.program.is_empty());
    assert!(config.simulation.stop_on_fault);
  }

  #[test]
  fn test_merge_replaces_program_and_regions() {
    let base = load_default_config().unwrap();
    let custom = parse_config(
      r#"
      [simulation]
      stop_on_fault = false
      trace_file = "out.jsonl"

      [[memory.regions]]
      name = "only"
      base = 0x0
      size = 16

      [[program]]
      op = "crush"
      dst = 0x8
      src = 0x0
      count = 4
      "#,
    )
    .unwrap();

    let merged = merge_config(base, custom);
    assert_eq!(merged.memory.regions.len(), 1);
    assert_eq!(merged.program.len(), 1);
    assert!(!merged.simulation.stop_on_fault);
    assert_eq!(merged.simulation.trace_file, "out.jsonl");
    assert!(merged.memory.regions[0].writable);
  }

  #[test]
  fn test_merge_keeps_base_when_override_empty() {
    let base = load_default_config().unwrap();
    let program_len = base.program.len();
    let merged = merge_config(base, AppConfig::default());
    assert_eq!(merged.program.len(), program_len);
    assert!(merged.simulation.stop_on_fault);
  }

  #[test]
  fn test_cli_overrides() {
    let mut config = AppConfig::default();
    apply_cli_overrides(&mut config, true, true, Some("t.jsonl"), true);
    assert!(config.simulation.quiet);
    assert!(config.simulation.step_mode);
    assert_eq!(config.simulation.trace_file, "t.jsonl");
    assert!(!config.simulation.stop_on_fault);
  }

  #[test]
  fn test_validate_rejects_bad_regions() {
    let overlap = parse_config(
      r#"
      [[memory.regions]]
      name = "a"
      base = 0x100
      size = 0x100

      [[memory.regions]]
      name = "b"
      base = 0x1f0
      size = 0x10
      "#,
    )
    .unwrap();
    assert!(validate_config(&overlap).is_err());

    let too_much = parse_config(
      r#"
      [[memory.regions]]
      name = "a"
      base = 0x0
      size = 4
      words = [1, 2]
      "#,
    )
    .unwrap();
    assert!(validate_config(&too_much).is_err());

    let both = parse_config(
      r#"
      [[memory.regions]]
      name = "a"
      base = 0x0
      size = 16
      words = [1]
      bytes = [1]
      "#,
    )
    .unwrap();
    assert!(validate_config(&both).is_err());
  }

  #[test]
  fn test_unknown_view_rejected() {
    let err = parse_config(
      r#"
      [[memory.regions]]
      name = "a"
      base = 0x0
      size = 4
      view = "dword"
      "#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
  }
}
