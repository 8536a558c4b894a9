use dhcp_wire::DecodeError;
use thiserror::Error;

/// Errors that can occur while processing a single DHCP exchange or
/// setting up a plugin.
///
/// Exchange-level failures never escape a handler: they are counted under
/// the `error` label and the exchange is dropped.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A relay envelope or message could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// A message is not the kind the server pipeline promised.
    #[error("expected {expected}, got {got}")]
    ShapeMismatch {
        /// Kind of message the handler expected.
        expected: &'static str,
        /// What it received instead.
        got: String,
    },
    /// Plugin arguments could not be parsed.
    #[error("invalid plugin arguments: {0}")]
    Args(#[from] clap::Error),
    /// Plugin arguments parsed but failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}
