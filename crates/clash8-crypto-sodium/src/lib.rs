/*
    clash8-crypto-sodium
      - libsodium-based implementation of clash8-core's CryptoProvider.
      - All `unsafe` is confined to `sodium::ffi`.
*/
mod sodium;

use async_trait::async_trait;
use clash8_core::crypto::{BoxKeypair, CryptoError, CryptoProvider, Nonce24, SessionKey};

/// Crypto provider backed by libsodium.
#[derive(Debug, Default, Clone)]
pub struct SodiumCryptoProvider;

impl SodiumCryptoProvider {
    pub fn new() -> Self {
        sodium::init();
        Self
    }
}

#[async_trait]
impl CryptoProvider for SodiumCryptoProvider {
    async fn random_bytes(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        sodium::safe::random_bytes(out)
    }

    async fn box_keypair(&self) -> Result<BoxKeypair, CryptoError> {
        sodium::safe::box_keypair()
    }

    async fn box_seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce24,
        my_secret: &[u8; 32],
        peer_public: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError> {
        sodium::safe::box_seal(plaintext, nonce, my_secret, peer_public)
    }

    async fn box_open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce24,
        my_secret: &[u8; 32],
        peer_public: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError> {
        sodium::safe::box_open(ciphertext, nonce, my_secret, peer_public)
    }

    async fn secretbox_seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce24,
        key: &SessionKey,
    ) -> Result<Vec<u8>, CryptoError> {
        sodium::safe::secretbox_seal(plaintext, nonce, key)
    }

    async fn secretbox_open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce24,
        key: &SessionKey,
    ) -> Result<Vec<u8>, CryptoError> {
        sodium::safe::secretbox_open(ciphertext, nonce, key)
    }

    async fn blake2b_24(&self, data: &[u8]) -> Result<Nonce24, CryptoError> {
        sodium::safe::blake2b_24(data)
    }
}

#[cfg(test)]
mod tests;
