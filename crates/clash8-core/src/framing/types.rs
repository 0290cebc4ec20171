use crate::framing::FramingError;
use crate::protocol::PROTOCOL_VERSION_V8;

/// Wire frame header length: message id (2) + payload length (3) +
/// version (2), all big-endian.
pub const HEADER_LEN: usize = 7;

/// One wire frame: header fields plus the (usually encrypted) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: u16,
    pub version: u16,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(id: u16, payload: Vec<u8>) -> Self {
        Self {
            id,
            version: PROTOCOL_VERSION_V8,
            payload,
        }
    }
}

/// Largest length the u24 header field can carry.
pub const MAX_WIRE_PAYLOAD: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, Copy)]
pub struct FrameLimits {
    pub max_payload_len: u32,
}

impl FrameLimits {
    pub const DEFAULT: FrameLimits = FrameLimits {
        max_payload_len: 1_048_576, // 1 MiB
    };

    pub fn validate_len(&self, len: u32) -> Result<(), FramingError> {
        let max = self.max_payload_len.min(MAX_WIRE_PAYLOAD);
        if len > max {
            return Err(FramingError::PayloadTooLarge { len, max });
        }
        Ok(())
    }
}
