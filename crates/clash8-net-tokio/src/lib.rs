/*
    clash8-net-tokio
        TCP transport for the v8 protocol. Wraps a TcpStream in header
        framing and a message processor; the embedding server only sees
        decoded messages.
*/

mod conn;
mod error;

pub use conn::{accept, connect, ClientConn, ServerConn};
pub use error::NetError;
