pub mod machine;
pub mod types;

pub use machine::CryptoSession;
pub use types::*;

use crate::crypto::CryptoError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    #[error("message authentication failed")]
    AuthFailure,

    #[error("crypto backend error: {0}")]
    Backend(#[source] CryptoError),
}

#[cfg(test)]
pub(crate) mod test_crypto;
