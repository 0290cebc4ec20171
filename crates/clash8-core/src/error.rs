use thiserror::Error;

use crate::{
    crypto::CryptoError,
    framing::FramingError,
    processor::ProcessorError,
    protocol::ProtocolError,
    session::SessionError,
};

#[derive(Debug, Error)]
pub enum Clash8Error {
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("processor error: {0}")]
    Processor(#[from] ProcessorError),
}
