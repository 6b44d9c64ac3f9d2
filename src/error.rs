//! Error types for soc-synth.
//!
//! Generation itself cannot fail once a configuration is validated; errors
//! come from configuration loading, file I/O, and the table validators.

use thiserror::Error;

/// Result type alias for soc-synth operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Unified error type for all soc-synth operations.
#[derive(Debug, Error)]
pub enum SynthError {
    // ===== Validation Errors =====
    /// A table handed to a validator lacks required columns.
    #[error("{table}: missing required columns: {}", missing.join(", "))]
    Schema {
        /// Name of the offending table.
        table: String,
        /// Every missing column, in the order they were required.
        missing: Vec<String>,
    },

    /// A table cell could not be interpreted.
    #[error("{table}: invalid value '{value}' in column '{column}' at row {row}")]
    Parse {
        /// Name of the offending table.
        table: String,
        /// Column of the bad cell.
        column: String,
        /// Zero-based data row index (header excluded).
        row: usize,
        /// Raw cell content.
        value: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Field-level validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SynthError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a schema error for `table` listing `missing` columns.
    #[must_use]
    pub fn schema<S: Into<String>>(table: impl Into<String>, missing: impl IntoIterator<Item = S>) -> Self {
        Self::Schema {
            table: table.into(),
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Whether the error reports malformed input tables rather than
    /// environment or configuration problems.
    #[must_use]
    pub const fn is_table_error(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Parse { .. })
    }

    /// Missing columns if this is a schema error.
    #[must_use]
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::Schema { missing, .. } => Some(missing),
            _ => None,
        }
    }
}
