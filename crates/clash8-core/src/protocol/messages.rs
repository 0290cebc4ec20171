use crate::protocol::{
    ByteReader, ByteWriter, ProtocolError, CMD_SPEED_UP_HERO, MSG_END_CLIENT_TURN, MSG_KEEP_ALIVE,
    MSG_KEEP_ALIVE_OK, MSG_LOGIN, MSG_LOGIN_FAILED, MSG_LOGIN_OK, MSG_SHUTDOWN_INFO,
};

/// 10101. First message of a connection; its payload additionally carries
/// the handshake material (see the processors).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Login {
    pub account_id: i64,
    pub pass_token: Option<String>,
    pub major_version: u32,
    pub minor_version: u32,
    pub build_version: u32,
    pub resource_sha: Option<String>,
    pub device: Option<String>,
    pub locale: Option<String>,
}

impl Login {
    fn write(&self, w: &mut ByteWriter) {
        w.write_i64(self.account_id);
        w.write_string(self.pass_token.as_deref());
        w.write_u32(self.major_version);
        w.write_u32(self.minor_version);
        w.write_u32(self.build_version);
        w.write_string(self.resource_sha.as_deref());
        w.write_string(self.device.as_deref());
        w.write_string(self.locale.as_deref());
    }

    fn read(r: &mut ByteReader) -> Result<Self, ProtocolError> {
        Ok(Self {
            account_id: r.read_i64()?,
            pass_token: r.read_string()?,
            major_version: r.read_u32()?,
            minor_version: r.read_u32()?,
            build_version: r.read_u32()?,
            resource_sha: r.read_string()?,
            device: r.read_string()?,
            locale: r.read_string()?,
        })
    }
}

/// 14102. The client's batched turn: simulation position plus the commands
/// executed since the previous turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndClientTurn {
    pub subtick: u32,
    pub checksum: u32,
    pub commands: Vec<Command>,
}

/// A single player command inside `EndClientTurn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 521. Finish a hero upgrade immediately.
    SpeedUpHero { hero_id: i32 },
}

impl Command {
    pub fn id(&self) -> u32 {
        match self {
            Command::SpeedUpHero { .. } => CMD_SPEED_UP_HERO,
        }
    }

    fn write(&self, w: &mut ByteWriter) {
        w.write_u32(self.id());
        match self {
            Command::SpeedUpHero { hero_id } => w.write_i32(*hero_id),
        }
    }

    fn read(r: &mut ByteReader) -> Result<Self, ProtocolError> {
        let id = r.read_u32()?;
        match id {
            CMD_SPEED_UP_HERO => Ok(Command::SpeedUpHero {
                hero_id: r.read_i32()?,
            }),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}

impl EndClientTurn {
    fn write(&self, w: &mut ByteWriter) {
        w.write_u32(self.subtick);
        w.write_u32(self.checksum);
        w.write_u32(self.commands.len() as u32);
        for cmd in &self.commands {
            cmd.write(w);
        }
    }

    fn read(r: &mut ByteReader) -> Result<Self, ProtocolError> {
        let subtick = r.read_u32()?;
        let checksum = r.read_u32()?;
        let count = r.read_u32()?;
        // Each command is at least a u32 id.
        if count as usize > r.remaining() / 4 {
            return Err(ProtocolError::Truncated);
        }
        let mut commands = Vec::with_capacity(count as usize);
        for _ in 0..count {
            commands.push(Command::read(r)?);
        }
        Ok(Self {
            subtick,
            checksum,
            commands,
        })
    }
}

/// 20103.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFailed {
    pub reason: u32,
    pub message: Option<String>,
}

/// 20104. Completes the handshake; its payload additionally carries the
/// derived key material (see the processors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOk {
    pub account_id: i64,
    pub home_id: i64,
    pub pass_token: Option<String>,
    pub server_environment: Option<String>,
    pub session_count: u32,
}

/// 20161. Announced when the server is about to go down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownInfo {
    pub seconds_remaining: i32,
}

/// Messages the client sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Login(Login),
    KeepAlive,
    EndClientTurn(EndClientTurn),
}

impl ClientMessage {
    pub fn id(&self) -> u16 {
        match self {
            ClientMessage::Login(_) => MSG_LOGIN,
            ClientMessage::KeepAlive => MSG_KEEP_ALIVE,
            ClientMessage::EndClientTurn(_) => MSG_END_CLIENT_TURN,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        match self {
            ClientMessage::Login(m) => m.write(&mut w),
            ClientMessage::KeepAlive => {}
            ClientMessage::EndClientTurn(m) => m.write(&mut w),
        }
        w.into_inner()
    }

    pub fn decode(id: u16, body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = ByteReader::new(body);
        match id {
            MSG_LOGIN => Ok(ClientMessage::Login(Login::read(&mut r)?)),
            MSG_KEEP_ALIVE => Ok(ClientMessage::KeepAlive),
            MSG_END_CLIENT_TURN => Ok(ClientMessage::EndClientTurn(EndClientTurn::read(&mut r)?)),
            other => Err(ProtocolError::UnknownMessage(other)),
        }
    }
}

/// Messages the server sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    LoginFailed(LoginFailed),
    LoginOk(LoginOk),
    KeepAliveOk,
    ShutdownInfo(ShutdownInfo),
}

impl ServerMessage {
    pub fn id(&self) -> u16 {
        match self {
            ServerMessage::LoginFailed(_) => MSG_LOGIN_FAILED,
            ServerMessage::LoginOk(_) => MSG_LOGIN_OK,
            ServerMessage::KeepAliveOk => MSG_KEEP_ALIVE_OK,
            ServerMessage::ShutdownInfo(_) => MSG_SHUTDOWN_INFO,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        match self {
            ServerMessage::LoginFailed(m) => {
                w.write_u32(m.reason);
                w.write_string(m.message.as_deref());
            }
            ServerMessage::LoginOk(m) => {
                w.write_i64(m.account_id);
                w.write_i64(m.home_id);
                w.write_string(m.pass_token.as_deref());
                w.write_string(m.server_environment.as_deref());
                w.write_u32(m.session_count);
            }
            ServerMessage::KeepAliveOk => {}
            ServerMessage::ShutdownInfo(m) => {
                w.write_i32(m.seconds_remaining);
            }
        }
        w.into_inner()
    }

    pub fn decode(id: u16, body: &[u8]) -> Result<Self, ProtocolError> {
        let mut r = ByteReader::new(body);
        match id {
            MSG_LOGIN_FAILED => Ok(ServerMessage::LoginFailed(LoginFailed {
                reason: r.read_u32()?,
                message: r.read_string()?,
            })),
            MSG_LOGIN_OK => Ok(ServerMessage::LoginOk(LoginOk {
                account_id: r.read_i64()?,
                home_id: r.read_i64()?,
                pass_token: r.read_string()?,
                server_environment: r.read_string()?,
                session_count: r.read_u32()?,
            })),
            MSG_KEEP_ALIVE_OK => Ok(ServerMessage::KeepAliveOk),
            MSG_SHUTDOWN_INFO => Ok(ServerMessage::ShutdownInfo(ShutdownInfo {
                seconds_remaining: r.read_i32()?,
            })),
            other => Err(ProtocolError::UnknownMessage(other)),
        }
    }
}
