use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
/// Error type for the library
pub enum SwitchError {
    /// Requested protocol id is outside the registry. Valid ids are 1-based
    /// and dense.
    #[error("Unknown protocol id {0}")]
    InvalidProtocol(usize),
    /// Code word is malformed: bad symbol, empty, too wide, or an
    /// out-of-range device address
    #[error("Invalid code word: {0}")]
    InvalidCodeWord(String),
    /// Captured pulse train is longer than the decoder can hold
    #[error("Pulse train of {received} level changes exceeds the limit of {limit}")]
    CaptureOverflow {
        /// Level changes in the caller-supplied capture
        received: usize,
        /// Maximum supported level changes
        limit: usize,
    },
}
