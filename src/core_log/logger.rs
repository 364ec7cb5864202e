use chrono::Local;
use env_logger::{Builder, Env};
use std::io::Write;

/// Installs the global logger: `[timestamp] [LEVEL] message` on stderr.
///
/// `RUST_LOG` wins over the default filter, which is `info` (or `debug`
/// when `verbose` is set).
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let result = Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init();
    if let Err(e) = result {
        eprintln!("Logger already initialised: {}", e);
    }
}
