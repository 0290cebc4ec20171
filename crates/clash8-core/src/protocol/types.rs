/// Header version field value for the 8.x protocol.
pub const PROTOCOL_VERSION_V8: u16 = 8;

// Client -> server message ids.
pub const MSG_LOGIN: u16 = 10101;
pub const MSG_KEEP_ALIVE: u16 = 10108;
pub const MSG_END_CLIENT_TURN: u16 = 14102;

// Server -> client message ids.
pub const MSG_LOGIN_FAILED: u16 = 20103;
pub const MSG_LOGIN_OK: u16 = 20104;
pub const MSG_KEEP_ALIVE_OK: u16 = 20108;
pub const MSG_SHUTDOWN_INFO: u16 = 20161;

// Command ids carried inside EndClientTurn.
pub const CMD_SPEED_UP_HERO: u32 = 521;
