//! Error types for signwire.

use thiserror::Error;

/// Main error type for all signwire operations.
///
/// Markup and payload truncation is never an error: it is reported with a
/// `tracing` warning and compilation or encoding continues.
#[derive(Debug, Error)]
pub enum SignError {
    /// Malformed config line (1-based line number).
    #[error("Syntax error, line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The label pool ran out while compiling.
    #[error(
        "Too many messages in config (ran out of message labels): max {max_labels} labels, \
         cmds cost {cmd_cost} labels each, txts cost 1 label each"
    )]
    Capacity { max_labels: usize, cmd_cost: usize },

    /// External command could not be launched or exited non-zero.
    #[error("Command \"{command}\" failed: {reason}")]
    ExternalCommand { command: String, reason: String },

    /// A send reported fewer bytes than requested.
    #[error("Transport error while sending {context}: sent {sent} of {requested} bytes")]
    Transport {
        context: &'static str,
        requested: usize,
        sent: usize,
    },

    /// The device backend reported an error code.
    #[error("Device error {code}: {message}")]
    Device { code: i32, message: String },

    /// Internal consistency error (e.g. wrong frame kind handed to an encoder).
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error while reading config or profile files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device profile JSON could not be parsed.
    #[error("Profile error: {0}")]
    Profile(#[from] serde_json::Error),
}

impl SignError {
    /// Shorthand for a syntax error at `line`.
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        SignError::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised while compiling a config.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            SignError::Syntax { .. } | SignError::Capacity { .. } | SignError::ExternalCommand { .. }
        )
    }
}

/// Result type alias using SignError.
pub type Result<T> = std::result::Result<T, SignError>;
