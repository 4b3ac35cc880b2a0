use clap::Parser;
use g233::simulator::config::load_and_merge_configs;
use g233::simulator::utils::log::init_log;
use g233::simulator::Simulator;
use std::path::PathBuf;

/// g233 - run G233 custom instruction workloads
#[derive(Parser, Debug)]
#[command(name = "g233")]
#[command(version = "0.1.0")]
#[command(about = "Runs DMA/SORT/CRUSH/EXPAND workloads against a simulated memory", long_about = None)]
struct Args {
  /// Workload TOML, merged over the built-in demo
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Enable step mode (interactive stepping)
  #[arg(short, long)]
  step: bool,

  /// Quiet mode (suppress log messages)
  #[arg(short, long)]
  quiet: bool,

  /// Output trace file path (JSON lines, one per memory access)
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// Keep executing after an address fault
  #[arg(long)]
  no_stop_on_fault: bool,
}

fn main() -> std::io::Result<()> {
  let args = Args::parse();

  let app_config = load_and_merge_configs(
    args.config.as_deref(),
    args.quiet,
    args.step,
    args.trace_file.as_deref(),
    args.no_stop_on_fault,
  )?;

  // after the merge so a workload file can ask for quiet too
  init_log(app_config.simulation.quiet);

  let mut simulator = Simulator::from_app_config(&app_config)?;
  let summary = simulator.run()?;

  if summary.halted {
    std::process::exit(1);
  }
  Ok(())
}
