/// The role this session plays. Drives key ordering in Blake2b nonce
/// derivation: the hash input is always client key first, server key
/// second, whichever side computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Client,
    Server,
}

/// Which nonce an `update_nonce` call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceKind {
    /// Re-derive the hashing nonce from the server nonce (three-key form).
    Blake,
    /// Install the outbound counter nonce.
    Encrypt,
    /// Install the inbound counter nonce.
    Decrypt,
}

/// Observable session state.
///
/// `Idle` -> `InitialKey` -> (`BlakeNonce` ->)? `SecondKey`, strictly
/// forward. Handshake states encrypt with the public-key box under the
/// hashing nonce; `SecondKey` switches to the secret-key box under the
/// counter nonces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InitialKey,
    BlakeNonce,
    SecondKey,
}
