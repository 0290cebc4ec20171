/*
    clash8-core
        transport-agnostic core of the v8 game-client protocol:
        crypto session, wire framing, message codecs, and the
        client/server message processors.
 */

pub mod error;

pub mod crypto;
pub mod framing;
pub mod keys;
pub mod processor;
pub mod protocol;
pub mod session;

pub use error::Clash8Error;
