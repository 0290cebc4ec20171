pub mod io;
pub mod messages;
pub mod types;

pub use io::*;
pub use messages::*;
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("truncated buffer")]
    Truncated,

    #[error("malformed field")]
    Malformed,

    #[error("unknown message id: {0}")]
    UnknownMessage(u16),

    #[error("unknown command id: {0}")]
    UnknownCommand(u32),

    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u16),
}


#[cfg(test)]
mod codec_tests;
