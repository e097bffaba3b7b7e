use thiserror::Error;

/// Errors raised by registry and runtime operations.
///
/// Only two kinds exist. Everything else the crate could complain about
/// (re-assigning an already assigned device, setting a name to its current
/// value, a control scheme that finds fewer devices than it wants) is treated
/// as a benign no-op instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    /// The operation requires a user that is currently added to the registry.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// An action, scheme, device, or control identifier could not be resolved.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl UserError {
    pub(crate) fn unknown(what: &str, name: &str) -> Self {
        UserError::InvalidArgument(format!("unknown {what} '{name}'"))
    }
}
