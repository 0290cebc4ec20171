//! Well-known key material for custom-server interoperation.
//!
//! These are configuration inputs, not part of the session algorithm: a
//! custom server identifies itself with the standard keypair (clients
//! patched for private servers carry its public half), while a proxy
//! talking to the live service needs the real server's public key.

use crate::crypto::BoxKeypair;

/// Public half of the standard custom-server keypair.
pub const STANDARD_PUBLIC_KEY: [u8; 32] = [
    0x72, 0xf1, 0xa4, 0xa4, 0xc4, 0x8e, 0x44, 0xda, 0x0c, 0x42, 0x31, 0x0f, 0x80, 0x0e, 0x96, 0x62,
    0x4b, 0x6d, 0xce, 0x3a, 0x4f, 0x13, 0x01, 0x99, 0xd7, 0xf5, 0x18, 0x3a, 0x19, 0x4c, 0x82, 0x4e,
];

/// Secret half of the standard custom-server keypair.
pub const STANDARD_SECRET_KEY: [u8; 32] = [
    0x18, 0x91, 0xd4, 0x01, 0xfa, 0xdb, 0x51, 0xd2, 0x5d, 0x3a, 0x91, 0x74, 0xd4, 0x72, 0xa9, 0xf6,
    0x91, 0xa4, 0x5b, 0x97, 0x42, 0x85, 0xd4, 0x77, 0x29, 0xc4, 0x5c, 0x65, 0x38, 0x07, 0x05, 0xca,
];

/// Public key of the live v8 service.
pub const SUPERCELL_PUBLIC_KEY: [u8; 32] = [
    0x13, 0x15, 0xd5, 0xba, 0x0a, 0x24, 0x9a, 0xbc, 0x92, 0x11, 0x7d, 0x10, 0xbf, 0x87, 0x6f, 0x7e,
    0x92, 0x62, 0x09, 0x3d, 0x80, 0x6e, 0x09, 0x6b, 0x48, 0x04, 0x2e, 0x31, 0x3b, 0x7e, 0x1c, 0x60,
];

/// The standard custom-server keypair as an owned value.
pub fn standard_keypair() -> BoxKeypair {
    BoxKeypair {
        public: STANDARD_PUBLIC_KEY,
        secret: STANDARD_SECRET_KEY,
    }
}
