//! Crate-level error types.
//!
//! [`InstantexError`] unifies every error source (configuration, terminal
//! I/O) behind a single enum so callers can match on the variant they care
//! about while still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InstantexError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum InstantexError {
    /// A configuration value was missing or could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A terminal operation (setup, draw, restore) failed.
    #[error("terminal error: {0}")]
    Io(String),
}
