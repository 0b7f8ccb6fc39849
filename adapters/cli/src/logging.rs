use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger from `RUST_LOG`.
///
/// Without `RUST_LOG` the filter defaults to `debug` when `verbose` is set and
/// `info` otherwise.
pub(crate) fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // Only fails when a logger is already installed.
    let _ = builder.try_init();
}
