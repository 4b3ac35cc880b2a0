// Global logging configuration

/// Install the env_logger backend. `RUST_LOG` wins over the default level.
pub fn init_log(quiet: bool) {
  let default_level = if quiet { "warn" } else { "info" };
  let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
    .format_timestamp(None)
    .try_init();
}
