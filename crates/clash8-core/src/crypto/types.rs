use zeroize::{Zeroize, ZeroizeOnDrop};

/// Curve25519 key length in bytes.
pub const KEY_LEN: usize = 32;

/// XSalsa20 nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Poly1305 authentication tag length in bytes.
pub const MAC_LEN: usize = 16;

/// Curve25519 box keypair. The secret half is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BoxKeypair {
    #[zeroize(skip)]
    pub public: [u8; KEY_LEN],
    pub secret: [u8; KEY_LEN],
}

impl std::fmt::Debug for BoxKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxKeypair")
            .field("public", &self.public)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The derived symmetric key `k`, installed at the final handshake step.
/// Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey(pub [u8; KEY_LEN]);

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

/// 24-byte nonce. Counter nonces treat the bytes as a little-endian
/// unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nonce24(pub [u8; NONCE_LEN]);

impl Nonce24 {
    /// Add one, little-endian, carrying across bytes. Wraps at 2^192.
    pub fn increment(&mut self) {
        for b in self.0.iter_mut() {
            let (v, overflow) = b.overflowing_add(1);
            *b = v;
            if !overflow {
                break;
            }
        }
    }

    /// The bulk-operation step: both directions advance by two, reserving
    /// parity between them.
    pub fn increment_by_two(&mut self) {
        self.increment();
        self.increment();
    }
}
