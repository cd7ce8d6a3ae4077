//! Process-wide tracing/logging setup.

/// Tracing configuration (filters, formatting).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing for the process using the format suited to `env`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(env: &str) {
    tracing::init(LogFormat::for_env(env));
}
