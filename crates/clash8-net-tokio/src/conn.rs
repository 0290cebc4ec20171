use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use clash8_core::{
    crypto::{BoxKeypair, CryptoProvider, KEY_LEN},
    framing::{FrameIo, FrameLimits, HeaderFrameIo},
    processor::{
        server::ServerState, ClientAction, ClientProcessor, ServerAction, ServerProcessor,
    },
    protocol::{ClientMessage, Login, LoginOk, ServerMessage},
};

use crate::error::NetError;

// One accepted v8 connection.
// Internally uses:
//   - Header framing on the TCP stream
//   - ServerProcessor to run the login handshake and the crypto session
pub struct ServerConn {
    framer: HeaderFrameIo<TcpStream>,
    processor: ServerProcessor,
    peer: SocketAddr,
}

/// Accept one connection and wrap it in a processor-driven conn.
pub async fn accept(
    listener: &TcpListener,
    keypair: BoxKeypair,
    crypto: Arc<dyn CryptoProvider>,
) -> Result<ServerConn, NetError> {
    let (stream, peer) = listener.accept().await?;
    debug!(%peer, "accepted connection");

    Ok(ServerConn {
        framer: HeaderFrameIo::new(stream, FrameLimits::DEFAULT),
        processor: ServerProcessor::new(keypair, crypto),
        peer,
    })
}

impl ServerConn {
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_established(&self) -> bool {
        self.processor.is_established()
    }

    /// Read frames until a message for the embedding server arrives.
    /// Handshake and keep-alive replies are written automatically.
    pub async fn next_message(&mut self) -> Result<ClientMessage, NetError> {
        loop {
            let frame = self.framer.read_frame().await?;
            match self.processor.on_frame(&frame).await? {
                ServerAction::Reply(reply) => {
                    self.framer.write_frame(&reply).await?;
                    if self.processor.state() == ServerState::Rejected {
                        return Err(NetError::Rejected);
                    }
                }
                ServerAction::Message(msg) => return Ok(msg),
            }
        }
    }

    /// Encrypt and send a server message (e.g. a shutdown notice).
    pub async fn send(&mut self, msg: &ServerMessage) -> Result<(), NetError> {
        let frame = self.processor.seal_message(msg).await?;
        self.framer.write_frame(&frame).await?;
        Ok(())
    }
}

/// One established client connection.
pub struct ClientConn {
    framer: HeaderFrameIo<TcpStream>,
    processor: ClientProcessor,
    login_ok: LoginOk,
}

impl std::fmt::Debug for ClientConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConn").finish_non_exhaustive()
    }
}

/// Connect and run the login handshake to completion.
pub async fn connect(
    addr: &str,
    server_public: &[u8; KEY_LEN],
    login: &Login,
    crypto: Arc<dyn CryptoProvider>,
) -> Result<ClientConn, NetError> {
    let stream = TcpStream::connect(addr).await?;
    let mut framer = HeaderFrameIo::new(stream, FrameLimits::DEFAULT);

    let mut processor = ClientProcessor::generate(crypto).await?;
    let hello = processor.start(server_public, login).await?;
    framer.write_frame(&hello).await?;

    let reply = framer.read_frame().await?;
    match processor.on_frame(&reply).await? {
        ClientAction::Established(login_ok) => {
            info!(account = login_ok.account_id, "logged in");
            Ok(ClientConn {
                framer,
                processor,
                login_ok,
            })
        }
        ClientAction::Rejected(failed) => Err(NetError::LoginRejected {
            reason: failed.reason,
            message: failed.message.unwrap_or_default(),
        }),
        ClientAction::Message(_) => Err(NetError::NotEstablished),
    }
}

impl ClientConn {
    pub fn login_ok(&self) -> &LoginOk {
        &self.login_ok
    }

    /// Encrypt and send a client message.
    pub async fn send(&mut self, msg: &ClientMessage) -> Result<(), NetError> {
        let frame = self.processor.seal_message(msg).await?;
        self.framer.write_frame(&frame).await?;
        Ok(())
    }

    /// Receive and decrypt the next server message.
    pub async fn recv(&mut self) -> Result<ServerMessage, NetError> {
        let frame = self.framer.read_frame().await?;
        match self.processor.on_frame(&frame).await? {
            ClientAction::Message(msg) => Ok(msg),
            _ => Err(NetError::NotEstablished),
        }
    }
}
