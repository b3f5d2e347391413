//! Logging utilities

/// Initialize logging with a default filter, still overridable by `RUST_LOG`
pub fn init_with_default(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
