use std::sync::Arc;

use crate::{
    crypto::{BoxKeypair, CryptoError, CryptoProvider, Nonce24, SessionKey, KEY_LEN, NONCE_LEN},
    session::{Direction, NonceKind, SessionError, SessionState},
};

// Key material by phase. The peer's static public key and the derived
// symmetric key live in different variants, so the dispatcher matches on
// what is actually installed and cannot confuse the two.
enum Phase {
    Idle,
    InitialKey {
        peer: [u8; KEY_LEN],
        blake_nonce: Nonce24,
    },
    BlakeNonce {
        peer: [u8; KEY_LEN],
        blake_nonce: Nonce24,
    },
    // Counter nonces are part of the variant: they exist exactly when the
    // session key does.
    SecondKey {
        key: SessionKey,
        encrypt_nonce: Nonce24,
        decrypt_nonce: Nonce24,
    },
}

/// One directional crypto session for a single protocol connection.
///
/// Sequences the v8 handshake: public-key box under a Blake2b-derived
/// hashing nonce while keys are being exchanged, then secret-key box under
/// per-direction counter nonces once the derived key `k` is installed.
///
/// Not internally synchronized; callers serialize access. Every operation
/// is bounded and performs no I/O.
pub struct CryptoSession {
    direction: Direction,
    keypair: BoxKeypair,
    phase: Phase,
    // Counter nonces staged during the handshake, consumed by the
    // transition into SecondKey.
    pending_encrypt: Option<Nonce24>,
    pending_decrypt: Option<Nonce24>,
    crypto: Arc<dyn CryptoProvider>,
}

impl CryptoSession {
    pub fn new(direction: Direction, keypair: BoxKeypair, crypto: Arc<dyn CryptoProvider>) -> Self {
        Self {
            direction,
            keypair,
            phase: Phase::Idle,
            pending_encrypt: None,
            pending_decrypt: None,
            crypto,
        }
    }

    /// Construct with a freshly generated keypair.
    pub async fn generate(
        direction: Direction,
        crypto: Arc<dyn CryptoProvider>,
    ) -> Result<Self, SessionError> {
        let keypair = crypto.box_keypair().await.map_err(SessionError::Backend)?;
        Ok(Self::new(direction, keypair, crypto))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn public_key(&self) -> &[u8; KEY_LEN] {
        &self.keypair.public
    }

    pub fn state(&self) -> SessionState {
        match &self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::InitialKey { .. } => SessionState::InitialKey,
            Phase::BlakeNonce { .. } => SessionState::BlakeNonce,
            Phase::SecondKey { .. } => SessionState::SecondKey,
        }
    }

    /// The current hashing nonce, present in the handshake states.
    pub fn blake_nonce(&self) -> Option<&Nonce24> {
        match &self.phase {
            Phase::InitialKey { blake_nonce, .. } | Phase::BlakeNonce { blake_nonce, .. } => {
                Some(blake_nonce)
            }
            _ => None,
        }
    }

    /// The outbound counter nonce, once installed.
    pub fn encrypt_nonce(&self) -> Option<&Nonce24> {
        match &self.phase {
            Phase::SecondKey { encrypt_nonce, .. } => Some(encrypt_nonce),
            _ => self.pending_encrypt.as_ref(),
        }
    }

    /// The inbound counter nonce, once installed.
    pub fn decrypt_nonce(&self) -> Option<&Nonce24> {
        match &self.phase {
            Phase::SecondKey { decrypt_nonce, .. } => Some(decrypt_nonce),
            _ => self.pending_decrypt.as_ref(),
        }
    }

    /// Install key material, advancing the state machine.
    ///
    /// In `Idle` the argument is the peer's static public key; the hashing
    /// nonce is derived from both public keys and the session enters
    /// `InitialKey`. In the handshake states the argument is the derived
    /// session key `k`; both counter nonces must already be installed, and
    /// the session enters `SecondKey`. Any later call is illegal.
    pub async fn update_shared_key(&mut self, key: &[u8]) -> Result<(), SessionError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| SessionError::InvalidArgument("shared key must be 32 bytes"))?;

        match self.state() {
            SessionState::Idle => {
                let blake_nonce = self.two_key_nonce(&key).await?;
                self.phase = Phase::InitialKey {
                    peer: key,
                    blake_nonce,
                };
                Ok(())
            }
            SessionState::InitialKey | SessionState::BlakeNonce => {
                if let (Some(encrypt_nonce), Some(decrypt_nonce)) =
                    (self.pending_encrypt, self.pending_decrypt)
                {
                    self.pending_encrypt = None;
                    self.pending_decrypt = None;
                    self.phase = Phase::SecondKey {
                        key: SessionKey(key),
                        encrypt_nonce,
                        decrypt_nonce,
                    };
                    Ok(())
                } else {
                    Err(SessionError::InvalidState(
                        "both counter nonces must be installed before the session key",
                    ))
                }
            }
            SessionState::SecondKey => {
                Err(SessionError::InvalidState("session key already installed"))
            }
        }
    }

    /// Install a nonce, per `kind`.
    ///
    /// `Blake` re-derives the hashing nonce from the server nonce
    /// (legal once, between `InitialKey` and `SecondKey`); `Encrypt` and
    /// `Decrypt` stage the counter nonces for the `SecondKey` transition.
    pub async fn update_nonce(&mut self, nonce: &[u8], kind: NonceKind) -> Result<(), SessionError> {
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| SessionError::InvalidArgument("nonce must be 24 bytes"))?;
        let nonce = Nonce24(nonce);

        match kind {
            NonceKind::Blake => self.rekey_blake_nonce(nonce).await,
            NonceKind::Encrypt => match self.state() {
                SessionState::InitialKey | SessionState::BlakeNonce => {
                    self.pending_encrypt = Some(nonce);
                    Ok(())
                }
                _ => Err(SessionError::InvalidState(
                    "counter nonces are installed during the handshake",
                )),
            },
            NonceKind::Decrypt => match self.state() {
                SessionState::InitialKey | SessionState::BlakeNonce => {
                    self.pending_decrypt = Some(nonce);
                    Ok(())
                }
                _ => Err(SessionError::InvalidState(
                    "counter nonces are installed during the handshake",
                )),
            },
        }
    }

    /// Encrypt one outbound message.
    ///
    /// Handshake states seal with the public-key box under the hashing
    /// nonce. `SecondKey` advances the outbound counter by two, then seals
    /// with the secret-key box.
    pub async fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, SessionError> {
        match &mut self.phase {
            Phase::Idle => Err(SessionError::InvalidState("no shared key installed")),
            Phase::InitialKey { peer, blake_nonce } | Phase::BlakeNonce { peer, blake_nonce } => {
                let peer = *peer;
                let nonce = *blake_nonce;
                self.crypto
                    .box_seal(plaintext, &nonce, &self.keypair.secret, &peer)
                    .await
                    .map_err(SessionError::Backend)
            }
            Phase::SecondKey {
                key, encrypt_nonce, ..
            } => {
                encrypt_nonce.increment_by_two();
                let nonce = *encrypt_nonce;
                let key = key.clone();
                self.crypto
                    .secretbox_seal(plaintext, &nonce, &key)
                    .await
                    .map_err(SessionError::Backend)
            }
        }
    }

    /// Decrypt one inbound message.
    ///
    /// `SecondKey` advances the inbound counter by two before opening; the
    /// counter stays advanced on authentication failure. Reusing it against
    /// a valid ciphertext would be unsafe, so there is no rollback — an
    /// `AuthFailure` session must be discarded.
    pub async fn decrypt(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>, SessionError> {
        match &mut self.phase {
            Phase::Idle => Err(SessionError::InvalidState("no shared key installed")),
            Phase::InitialKey { peer, blake_nonce } | Phase::BlakeNonce { peer, blake_nonce } => {
                let peer = *peer;
                let nonce = *blake_nonce;
                self.crypto
                    .box_open(ciphertext, &nonce, &self.keypair.secret, &peer)
                    .await
                    .map_err(auth_or_backend)
            }
            Phase::SecondKey {
                key, decrypt_nonce, ..
            } => {
                decrypt_nonce.increment_by_two();
                let nonce = *decrypt_nonce;
                let key = key.clone();
                self.crypto
                    .secretbox_open(ciphertext, &nonce, &key)
                    .await
                    .map_err(auth_or_backend)
            }
        }
    }

    async fn rekey_blake_nonce(&mut self, snonce: Nonce24) -> Result<(), SessionError> {
        match &self.phase {
            Phase::InitialKey { peer, .. } => {
                let peer = *peer;
                let blake_nonce = self.three_key_nonce(&snonce, &peer).await?;
                self.phase = Phase::BlakeNonce { peer, blake_nonce };
                Ok(())
            }
            // Already re-derived; nothing to do.
            Phase::BlakeNonce { .. } => Ok(()),
            Phase::Idle | Phase::SecondKey { .. } => Err(SessionError::InvalidState(
                "hashing nonce is derived between the key exchanges",
            )),
        }
    }

    // blake2b_24(client_pk || server_pk)
    async fn two_key_nonce(&self, peer: &[u8; KEY_LEN]) -> Result<Nonce24, SessionError> {
        let (client_pk, server_pk) = self.ordered_keys(peer);
        let mut material = Vec::with_capacity(2 * KEY_LEN);
        material.extend_from_slice(&client_pk);
        material.extend_from_slice(&server_pk);
        self.crypto
            .blake2b_24(&material)
            .await
            .map_err(SessionError::Backend)
    }

    // blake2b_24(snonce || client_pk || server_pk)
    async fn three_key_nonce(
        &self,
        snonce: &Nonce24,
        peer: &[u8; KEY_LEN],
    ) -> Result<Nonce24, SessionError> {
        let (client_pk, server_pk) = self.ordered_keys(peer);
        let mut material = Vec::with_capacity(NONCE_LEN + 2 * KEY_LEN);
        material.extend_from_slice(&snonce.0);
        material.extend_from_slice(&client_pk);
        material.extend_from_slice(&server_pk);
        self.crypto
            .blake2b_24(&material)
            .await
            .map_err(SessionError::Backend)
    }

    // Hash input is always client key first, server key second.
    fn ordered_keys(&self, peer: &[u8; KEY_LEN]) -> ([u8; KEY_LEN], [u8; KEY_LEN]) {
        match self.direction {
            Direction::Client => (self.keypair.public, *peer),
            Direction::Server => (*peer, self.keypair.public),
        }
    }
}

fn auth_or_backend(e: CryptoError) -> SessionError {
    match e {
        CryptoError::DecryptFailure => SessionError::AuthFailure,
        other => SessionError::Backend(other),
    }
}
