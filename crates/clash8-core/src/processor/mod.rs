pub mod client;
pub mod server;

pub use client::{ClientAction, ClientProcessor};
pub use server::{ServerAction, ServerProcessor};

use crate::{crypto::CryptoError, protocol::ProtocolError, session::SessionError};

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("unexpected message id: {got}")]
    UnexpectedMessage { got: u16 },

    #[error("malformed handshake payload")]
    MalformedHandshake,

    #[error("session not established")]
    NotEstablished,

    #[error("handshake already started")]
    AlreadyStarted,
}
