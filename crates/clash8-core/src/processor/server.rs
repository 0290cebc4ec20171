use std::sync::Arc;

use crate::{
    crypto::{BoxKeypair, CryptoProvider, KEY_LEN, NONCE_LEN},
    framing::Frame,
    processor::ProcessorError,
    protocol::{
        ClientMessage, Login, LoginFailed, LoginOk, ServerMessage, MSG_LOGIN, MSG_LOGIN_FAILED,
        MSG_LOGIN_OK, PROTOCOL_VERSION_V8,
    },
    session::{CryptoSession, Direction, NonceKind},
};

/// Client major version this server speaks.
pub const SUPPORTED_MAJOR_VERSION: u32 = 8;

// Reason code sent when the client build is not ours.
const REASON_UPDATE_REQUIRED: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    AwaitLogin,
    Established,
    Rejected,
}

// What the connection loop should do with a processed frame.
#[derive(Debug)]
pub enum ServerAction {
    /// Send this frame to the client.
    Reply(Frame),
    /// Deliver this decoded message to the embedding server.
    Message(ClientMessage),
}

/// Server side of one connection: drives the crypto session through the
/// login handshake, then frames established traffic.
pub struct ServerProcessor {
    session: CryptoSession,
    state: ServerState,
    crypto: Arc<dyn CryptoProvider>,
}

impl ServerProcessor {
    pub fn new(keypair: BoxKeypair, crypto: Arc<dyn CryptoProvider>) -> Self {
        Self {
            session: CryptoSession::new(Direction::Server, keypair, crypto.clone()),
            state: ServerState::AwaitLogin,
            crypto,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn is_established(&self) -> bool {
        self.state == ServerState::Established
    }

    pub async fn on_frame(&mut self, frame: &Frame) -> Result<ServerAction, ProcessorError> {
        if frame.version != PROTOCOL_VERSION_V8 {
            return Err(crate::protocol::ProtocolError::UnsupportedVersion(frame.version).into());
        }

        match self.state {
            ServerState::AwaitLogin => match frame.id {
                MSG_LOGIN => self.on_login(&frame.payload).await,
                other => Err(ProcessorError::UnexpectedMessage { got: other }),
            },
            ServerState::Established => self.on_established(frame).await,
            ServerState::Rejected => Err(ProcessorError::NotEstablished),
        }
    }

    /// Encrypt an outbound server message (e.g. a shutdown notice) into a
    /// frame.
    pub async fn seal_message(&mut self, msg: &ServerMessage) -> Result<Frame, ProcessorError> {
        if self.state != ServerState::Established {
            return Err(ProcessorError::NotEstablished);
        }
        let ciphertext = self.session.encrypt(&msg.encode()).await?;
        Ok(Frame::new(msg.id(), ciphertext))
    }

    // 10101: [client_pk 32][pk_box(snonce 24 || login body)].
    async fn on_login(&mut self, payload: &[u8]) -> Result<ServerAction, ProcessorError> {
        if payload.len() < KEY_LEN {
            return Err(ProcessorError::MalformedHandshake);
        }
        let (client_pk, ciphertext) = payload.split_at(KEY_LEN);

        self.session.update_shared_key(client_pk).await?;
        let plaintext = self.session.decrypt(ciphertext).await?;

        if plaintext.len() < NONCE_LEN {
            return Err(ProcessorError::MalformedHandshake);
        }
        let (snonce, body) = plaintext.split_at(NONCE_LEN);

        let login = match ClientMessage::decode(MSG_LOGIN, body)? {
            ClientMessage::Login(login) => login,
            _ => return Err(ProcessorError::MalformedHandshake),
        };

        // Replies are sealed under the re-derived hashing nonce.
        self.session.update_nonce(snonce, NonceKind::Blake).await?;

        if login.major_version != SUPPORTED_MAJOR_VERSION {
            return self.reject_login(&login).await;
        }

        // Fresh server nonce and derived key for this connection.
        let mut rnonce = [0u8; NONCE_LEN];
        self.crypto.random_bytes(&mut rnonce).await?;
        let mut key = [0u8; KEY_LEN];
        self.crypto.random_bytes(&mut key).await?;

        let login_ok = ServerMessage::LoginOk(LoginOk {
            account_id: login.account_id,
            home_id: login.account_id,
            pass_token: login.pass_token.clone(),
            server_environment: Some("dev".into()),
            session_count: 1,
        });

        // 20104: pk_box(rnonce 24 || k 32 || login-ok body).
        let body = login_ok.encode();
        let mut plaintext = Vec::with_capacity(NONCE_LEN + KEY_LEN + body.len());
        plaintext.extend_from_slice(&rnonce);
        plaintext.extend_from_slice(&key);
        plaintext.extend_from_slice(&body);
        let ciphertext = self.session.encrypt(&plaintext).await?;

        // Switch to bulk keys: our outbound counter is rnonce, inbound is
        // the client's snonce.
        self.session.update_nonce(&rnonce, NonceKind::Encrypt).await?;
        self.session.update_nonce(snonce, NonceKind::Decrypt).await?;
        self.session.update_shared_key(&key).await?;

        self.state = ServerState::Established;
        Ok(ServerAction::Reply(Frame::new(MSG_LOGIN_OK, ciphertext)))
    }

    async fn reject_login(&mut self, login: &Login) -> Result<ServerAction, ProcessorError> {
        let failed = ServerMessage::LoginFailed(LoginFailed {
            reason: REASON_UPDATE_REQUIRED,
            message: Some(format!(
                "unsupported client version {}.{}",
                login.major_version, login.minor_version
            )),
        });
        // Still inside the handshake: sealed with the public-key box.
        let ciphertext = self.session.encrypt(&failed.encode()).await?;
        self.state = ServerState::Rejected;
        Ok(ServerAction::Reply(Frame::new(MSG_LOGIN_FAILED, ciphertext)))
    }

    async fn on_established(&mut self, frame: &Frame) -> Result<ServerAction, ProcessorError> {
        let body = self.session.decrypt(&frame.payload).await?;
        match ClientMessage::decode(frame.id, &body)? {
            ClientMessage::Login(_) => Err(ProcessorError::UnexpectedMessage { got: frame.id }),
            ClientMessage::KeepAlive => {
                let reply = self.seal_message(&ServerMessage::KeepAliveOk).await?;
                Ok(ServerAction::Reply(reply))
            }
            other => Ok(ServerAction::Message(other)),
        }
    }
}
