use async_trait::async_trait;

use crate::crypto::{
    BoxKeypair, CryptoError, CryptoProvider, Nonce24, SessionKey, MAC_LEN, NONCE_LEN,
};

// Deterministic stand-in for the sodium backend. The cipher is a keyed
// xor stream with a 16-byte prefix tag, good enough to exercise every
// session and processor path without real crypto.
#[derive(Debug, Default)]
pub(crate) struct MockCrypto;

pub(crate) fn mock_keypair(seed: u8) -> BoxKeypair {
    let secret = [seed; 32];
    BoxKeypair {
        public: mock_public(&secret),
        secret,
    }
}

// Mock scalarmult_base.
pub(crate) fn mock_public(secret: &[u8; 32]) -> [u8; 32] {
    let mut pk = *secret;
    for b in pk.iter_mut() {
        *b ^= 0x5a;
    }
    pk
}

pub(crate) fn weak_hash32(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, b) in data.iter().enumerate() {
        out[i % 32] ^= b.wrapping_add((i as u8).wrapping_mul(17));
    }
    out
}

// Commutative pair key: own_pk xor peer_pk, so seal(a, pk_b) opens with
// open(b, pk_a).
fn pair_key(my_secret: &[u8; 32], peer_public: &[u8; 32]) -> [u8; 32] {
    let own = mock_public(my_secret);
    let mut out = [0u8; 32];
    for (i, o) in out.iter_mut().enumerate() {
        *o = own[i] ^ peer_public[i];
    }
    out
}

fn stream_byte(key: &[u8; 32], nonce: &[u8; NONCE_LEN], i: usize) -> u8 {
    key[i % 32] ^ nonce[i % NONCE_LEN] ^ (i as u8)
}

fn tag16(key: &[u8; 32], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> [u8; MAC_LEN] {
    let mut buf = Vec::with_capacity(32 + NONCE_LEN + ciphertext.len());
    buf.extend_from_slice(key);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(ciphertext);
    let h = weak_hash32(&buf);
    let mut t = [0u8; MAC_LEN];
    t.copy_from_slice(&h[..MAC_LEN]);
    t
}

// Combined form, tag prefix, matching the provider contract.
fn seal(key: &[u8; 32], nonce: &Nonce24, plaintext: &[u8]) -> Vec<u8> {
    let mut c: Vec<u8> = plaintext
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ stream_byte(key, &nonce.0, i))
        .collect();
    let tag = tag16(key, &nonce.0, &c);
    let mut out = Vec::with_capacity(MAC_LEN + c.len());
    out.extend_from_slice(&tag);
    out.append(&mut c);
    out
}

fn open(key: &[u8; 32], nonce: &Nonce24, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < MAC_LEN {
        return Err(CryptoError::DecryptFailure);
    }
    let (tag, c) = ciphertext.split_at(MAC_LEN);
    if tag != tag16(key, &nonce.0, c) {
        return Err(CryptoError::DecryptFailure);
    }
    Ok(c.iter()
        .enumerate()
        .map(|(i, b)| b ^ stream_byte(key, &nonce.0, i))
        .collect())
}

#[async_trait]
impl CryptoProvider for MockCrypto {
    async fn random_bytes(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        for (i, b) in out.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(31).wrapping_add(7);
        }
        Ok(())
    }

    async fn box_keypair(&self) -> Result<BoxKeypair, CryptoError> {
        Ok(mock_keypair(0x42))
    }

    async fn box_seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce24,
        my_secret: &[u8; 32],
        peer_public: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(seal(&pair_key(my_secret, peer_public), nonce, plaintext))
    }

    async fn box_open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce24,
        my_secret: &[u8; 32],
        peer_public: &[u8; 32],
    ) -> Result<Vec<u8>, CryptoError> {
        open(&pair_key(my_secret, peer_public), nonce, ciphertext)
    }

    async fn secretbox_seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce24,
        key: &SessionKey,
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(seal(&key.0, nonce, plaintext))
    }

    async fn secretbox_open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce24,
        key: &SessionKey,
    ) -> Result<Vec<u8>, CryptoError> {
        open(&key.0, nonce, ciphertext)
    }

    async fn blake2b_24(&self, data: &[u8]) -> Result<Nonce24, CryptoError> {
        let h = weak_hash32(data);
        let mut out = [0u8; NONCE_LEN];
        out.copy_from_slice(&h[..NONCE_LEN]);
        Ok(Nonce24(out))
    }
}
