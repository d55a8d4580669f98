//! Configuration error types
//!
//! The engine itself never fails: malformed ranges, positions and deltas are
//! sanitised in place. Errors only arise when loading a picker configuration.

use thiserror::Error;

/// Picker configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("Failed to parse picker config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written back out
    #[error("Failed to serialize picker config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Fewer than one visible row
    #[error("Invalid visible count {0}: at least one row must be visible")]
    InvalidVisibleCount(usize),

    /// Zero or absurdly long animation duration
    #[error("Invalid duration for {field}: {value} ms (expected 1..={max} ms)")]
    InvalidDuration {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// Negative or non-finite motion threshold
    #[error("Invalid motion setting {field}: {value}")]
    InvalidMotion { field: &'static str, value: f32 },

    /// Negative or non-finite layout metric
    #[error("Invalid layout setting {field}: {value}")]
    InvalidLayout { field: &'static str, value: f32 },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
