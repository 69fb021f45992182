pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod report;
pub mod rules;
pub mod tracker;

pub use catalog::{AbilityId, Action, ActionCatalog, ActorId, Catalog, GroupId, Reduction};
pub use engine::Session;
pub use error::{CooldownError, Result};
pub use events::CombatEvent;
pub use report::{AbilityReport, CooldownReport};
pub use tracker::{CooldownState, CooldownTracker, GroupScope, Interval};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Logging — write to a daily-rotated `cooldowns.log` under `log_dir`.
///
/// Keep the returned guard alive for as long as the session runs; dropping
/// it flushes and closes the writer. `RUST_LOG` overrides the default
/// `cooldown_ledger=debug` directive.
///
/// Also installs a panic hook so panics land in the log file instead of only
/// on stderr.
pub fn init_logging(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "cooldowns.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cooldown_ledger=debug"));

    // A host application may already own the global subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false) // log files should not contain ANSI colour codes
        .try_init();

    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        tracing::error!("PANIC at {}: {}", location, message);
    }));

    tracing::info!("Cooldown ledger logging → {}", log_dir.display());
    Ok(guard)
}
