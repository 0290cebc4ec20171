use async_trait::async_trait;

use crate::crypto::{BoxKeypair, CryptoError, Nonce24, SessionKey};

// Trait boundary for cryptographic primitives.
// The session and processors depend on this trait, never on a concrete
// backend.
// NOTE: async methods are used for maximal backend flexibility (HSMs,
// remote KMS, etc.).
#[async_trait]
pub trait CryptoProvider: Send + Sync + 'static {
    async fn random_bytes(&self, out: &mut [u8]) -> Result<(), CryptoError>;

    async fn box_keypair(&self) -> Result<BoxKeypair, CryptoError>;

    /// Authenticated public-key encryption (crypto_box, combined form).
    /// Output is MAC || ciphertext.
    async fn box_seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce24,
        my_secret: &[u8; 32],
        peer_public: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError>;

    async fn box_open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce24,
        my_secret: &[u8; 32],
        peer_public: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Authenticated secret-key encryption (crypto_secretbox, combined
    /// form). Output is MAC || ciphertext.
    async fn secretbox_seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce24,
        key: &SessionKey,
    ) -> Result<Vec<u8>, CryptoError>;

    async fn secretbox_open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce24,
        key: &SessionKey,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Blake2b with a 24-byte output, used for handshake nonce derivation.
    async fn blake2b_24(&self, data: &[u8]) -> Result<Nonce24, CryptoError>;
}
