use std::sync::Arc;

use crate::{
    crypto::{BoxKeypair, CryptoProvider, Nonce24, KEY_LEN, NONCE_LEN},
    framing::Frame,
    processor::ProcessorError,
    protocol::{
        ClientMessage, Login, LoginFailed, LoginOk, ServerMessage, MSG_LOGIN, MSG_LOGIN_FAILED,
        MSG_LOGIN_OK, PROTOCOL_VERSION_V8,
    },
    session::{CryptoSession, Direction, NonceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientState {
    Init,
    AwaitLoginOk { snonce: Nonce24 },
    Established,
    Failed,
}

#[derive(Debug)]
pub enum ClientAction {
    /// Handshake complete; bulk traffic may flow.
    Established(LoginOk),
    /// The server turned the login down; the connection is dead.
    Rejected(LoginFailed),
    /// A decoded established-phase message.
    Message(ServerMessage),
}

/// Client side of one connection.
pub struct ClientProcessor {
    session: CryptoSession,
    state: ClientState,
    crypto: Arc<dyn CryptoProvider>,
}

impl ClientProcessor {
    pub fn new(keypair: BoxKeypair, crypto: Arc<dyn CryptoProvider>) -> Self {
        Self {
            session: CryptoSession::new(Direction::Client, keypair, crypto.clone()),
            state: ClientState::Init,
            crypto,
        }
    }

    /// Construct with a freshly generated keypair, the usual client mode.
    pub async fn generate(crypto: Arc<dyn CryptoProvider>) -> Result<Self, ProcessorError> {
        let session = CryptoSession::generate(Direction::Client, crypto.clone()).await?;
        Ok(Self {
            session,
            state: ClientState::Init,
            crypto,
        })
    }

    pub fn is_established(&self) -> bool {
        self.state == ClientState::Established
    }

    /// Build the login frame: 10101 as
    /// `[client_pk 32][pk_box(snonce 24 || login body)]`.
    pub async fn start(
        &mut self,
        server_public: &[u8; KEY_LEN],
        login: &Login,
    ) -> Result<Frame, ProcessorError> {
        if self.state != ClientState::Init {
            return Err(ProcessorError::AlreadyStarted);
        }

        self.session.update_shared_key(server_public).await?;

        let mut snonce = [0u8; NONCE_LEN];
        self.crypto.random_bytes(&mut snonce).await?;

        let body = ClientMessage::Login(login.clone()).encode();
        let mut plaintext = Vec::with_capacity(NONCE_LEN + body.len());
        plaintext.extend_from_slice(&snonce);
        plaintext.extend_from_slice(&body);
        let ciphertext = self.session.encrypt(&plaintext).await?;

        let mut payload = Vec::with_capacity(KEY_LEN + ciphertext.len());
        payload.extend_from_slice(self.session.public_key());
        payload.extend_from_slice(&ciphertext);

        self.state = ClientState::AwaitLoginOk {
            snonce: Nonce24(snonce),
        };
        Ok(Frame::new(MSG_LOGIN, payload))
    }

    pub async fn on_frame(&mut self, frame: &Frame) -> Result<ClientAction, ProcessorError> {
        if frame.version != PROTOCOL_VERSION_V8 {
            return Err(crate::protocol::ProtocolError::UnsupportedVersion(frame.version).into());
        }

        match self.state {
            ClientState::AwaitLoginOk { snonce } => self.on_handshake_reply(frame, snonce).await,
            ClientState::Established => self.on_established(frame).await,
            ClientState::Init => Err(ProcessorError::UnexpectedMessage { got: frame.id }),
            ClientState::Failed => Err(ProcessorError::NotEstablished),
        }
    }

    /// Encrypt an outbound client message into a frame.
    pub async fn seal_message(&mut self, msg: &ClientMessage) -> Result<Frame, ProcessorError> {
        if self.state != ClientState::Established {
            return Err(ProcessorError::NotEstablished);
        }
        let ciphertext = self.session.encrypt(&msg.encode()).await?;
        Ok(Frame::new(msg.id(), ciphertext))
    }

    async fn on_handshake_reply(
        &mut self,
        frame: &Frame,
        snonce: Nonce24,
    ) -> Result<ClientAction, ProcessorError> {
        // Both handshake replies are sealed under the three-key hashing
        // nonce derived from our session nonce.
        self.session.update_nonce(&snonce.0, NonceKind::Blake).await?;

        match frame.id {
            MSG_LOGIN_OK => {
                // 20104: pk_box(rnonce 24 || k 32 || login-ok body).
                let plaintext = self.session.decrypt(&frame.payload).await?;
                if plaintext.len() < NONCE_LEN + KEY_LEN {
                    return Err(ProcessorError::MalformedHandshake);
                }
                let (rnonce, rest) = plaintext.split_at(NONCE_LEN);
                let (key, body) = rest.split_at(KEY_LEN);

                let login_ok = match ServerMessage::decode(MSG_LOGIN_OK, body)? {
                    ServerMessage::LoginOk(m) => m,
                    _ => return Err(ProcessorError::MalformedHandshake),
                };

                // Our outbound counter is snonce, inbound is the server's
                // rnonce; then k completes the handshake.
                self.session.update_nonce(&snonce.0, NonceKind::Encrypt).await?;
                self.session.update_nonce(rnonce, NonceKind::Decrypt).await?;
                self.session.update_shared_key(key).await?;

                self.state = ClientState::Established;
                Ok(ClientAction::Established(login_ok))
            }
            MSG_LOGIN_FAILED => {
                let plaintext = self.session.decrypt(&frame.payload).await?;
                let failed = match ServerMessage::decode(MSG_LOGIN_FAILED, &plaintext)? {
                    ServerMessage::LoginFailed(m) => m,
                    _ => return Err(ProcessorError::MalformedHandshake),
                };
                self.state = ClientState::Failed;
                Ok(ClientAction::Rejected(failed))
            }
            other => Err(ProcessorError::UnexpectedMessage { got: other }),
        }
    }

    async fn on_established(&mut self, frame: &Frame) -> Result<ClientAction, ProcessorError> {
        let body = self.session.decrypt(&frame.payload).await?;
        match ServerMessage::decode(frame.id, &body)? {
            ServerMessage::LoginOk(_) | ServerMessage::LoginFailed(_) => {
                Err(ProcessorError::UnexpectedMessage { got: frame.id })
            }
            other => Ok(ClientAction::Message(other)),
        }
    }
}
