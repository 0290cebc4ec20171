use thiserror::Error;

use clash8_core::{framing::FramingError, processor::ProcessorError};

#[derive(Debug, Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("processor error: {0}")]
    Processor(#[from] ProcessorError),

    #[error("login rejected (reason {reason}): {message}")]
    LoginRejected { reason: u32, message: String },

    #[error("connection closed after login rejection")]
    Rejected,

    #[error("connection not established")]
    NotEstablished,
}
