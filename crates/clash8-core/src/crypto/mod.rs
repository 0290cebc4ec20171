pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("randomness generation failed")]
    RngFailure,

    #[error("keypair generation failed")]
    KeypairFailure,

    #[error("encryption failed")]
    EncryptFailure,

    #[error("decryption failed")]
    DecryptFailure,

    #[error("hash failed")]
    HashFailure,
}
