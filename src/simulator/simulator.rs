use super::config::config::validate_config;
use super::config::{AppConfig, RegionConfig};
use super::sim::mode::{SimConfig, StepMode};
use super::sim::shell::{Command, Shell};
use super::utils::report::{self, View};
use crate::inst::Instruction;
use crate::memory::{FlatMemory, Probe};
use std::fs::File;
use std::io::{BufWriter, Result, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub executed: u64,
  pub faults: u64,
  pub accesses: u64,
  pub halted: bool,
}

struct Dump {
  name: String,
  view: View,
}

/// Runs a workload of custom instructions against a host-side memory.
pub struct Simulator {
  config: SimConfig,
  memory: Probe<FlatMemory>,
  program: Vec<Instruction>,
  dumps: Vec<Dump>,
  pc: usize,
  trace_writer: Option<BufWriter<File>>,
  summary: RunSummary,
}

fn build_memory(regions: &[RegionConfig], enforce_alignment: bool) -> Result<FlatMemory> {
  let mut mem = FlatMemory::new();
  mem.set_enforce_alignment(enforce_alignment);
  for region in regions {
    if region.writable {
      mem.alloc(&region.name, region.base, region.size)?;
    } else {
      mem.alloc_readonly(&region.name, region.base, region.size)?;
    }
    mem.load_words(region.base, &region.words)?;
    mem.load_bytes(region.base, &region.bytes)?;
  }
  Ok(mem)
}

impl Simulator {
  pub fn from_app_config(app_config: &AppConfig) -> Result<Self> {
    validate_config(app_config)?;
    let config = SimConfig::from_app_config(app_config);
    let memory = build_memory(&app_config.memory.regions, config.enforce_alignment)?;

    let trace_writer = match config.trace_file {
      Some(ref path) => Some(BufWriter::new(File::create(path)?)),
      None => None,
    };

    let dumps = app_config
      .memory
      .regions
      .iter()
      .filter(|r| r.dump)
      .map(|r| Dump {
        name: r.name.clone(),
        view: r.view,
      })
      .collect();

    log::info!(
      "g233: {} region(s), {} instruction(s)",
      app_config.memory.regions.len(),
      app_config.program.len()
    );

    Ok(Self {
      config,
      memory: Probe::new(memory),
      program: app_config.program.clone(),
      dumps,
      pc: 0,
      trace_writer,
      summary: RunSummary::default(),
    })
  }

  pub fn memory(&self) -> &FlatMemory {
    self.memory.inner()
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn summary(&self) -> RunSummary {
    self.summary
  }

  pub fn is_finished(&self) -> bool {
    self.summary.halted || self.pc >= self.program.len()
  }

  pub fn run(&mut self) -> Result<RunSummary> {
    match self.config.step_mode {
      StepMode::Continuous => self.run_continuous()?,
      StepMode::Step => self.run_step_mode()?,
    }

    for dump in &self.dumps {
      report::print_region(self.memory.inner(), &dump.name, dump.view)?;
    }
    report::print_summary(&self.summary);

    Ok(self.summary)
  }

  fn run_continuous(&mut self) -> Result<()> {
    while !self.is_finished() {
      self.step()?;
    }
    Ok(())
  }

  fn run_step_mode(&mut self) -> Result<()> {
    let mut shell = Shell::new()?;
    while !self.is_finished() {
      if let Some(inst) = self.program.get(self.pc) {
        println!("next [{}]: {}", self.pc, inst);
      }
      match shell.read_command()? {
        Command::Step(n) => {
          for _ in 0..n {
            if self.is_finished() {
              break;
            }
            self.step()?;
          }
        }
        Command::Continue => self.run_continuous()?,
        Command::Examine { addr, count, view } => {
          if let Err(e) = report::print_memory(self.memory.inner(), addr, count, view) {
            eprintln!("Error: {}", e);
          }
        }
        Command::Quit => break,
      }
    }
    Ok(())
  }

  /// Execute the instruction at `pc`. A fault ends the instruction, and the
  /// whole run too when `stop_on_fault` is set.
  pub fn step(&mut self) -> Result<()> {
    let pc = self.pc;
    let inst = match self.program.get(pc) {
      Some(inst) => *inst,
      None => return Ok(()),
    };

    let result = inst.execute(&mut self.memory);
    self.pc += 1;
    self.summary.executed += 1;

    let accesses = self.memory.take_accesses();
    self.summary.accesses += accesses.len() as u64;

    if let Some(writer) = self.trace_writer.as_mut() {
      for access in &accesses {
        let entry = serde_json::json!({
          "pc": pc,
          "inst": inst.to_string(),
          "seq": access.seq,
          "kind": access.kind,
          "addr": access.addr,
          "value": access.value,
        });
        writeln!(writer, "{}", entry)?;
      }
      writer.flush()?;
    }

    if let Err(fault) = result {
      self.summary.faults += 1;
      log::error!("[{}] {}: {}", pc, inst, fault);
      if self.config.stop_on_fault {
        self.summary.halted = true;
      }
    }

    Ok(())
  }
}
