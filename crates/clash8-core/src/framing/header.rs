use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::framing::{Frame, FrameIo, FrameLimits, FramingError, HEADER_LEN};

/// v8 header framing over an async byte stream.
///
/// Frame format:
///   [u16 message id][u24 payload length][u16 version][payload bytes...]
pub struct HeaderFrameIo<RW> {
    io: RW,
    limits: FrameLimits,
}

impl<RW> HeaderFrameIo<RW> {
    pub fn new(io: RW, limits: FrameLimits) -> Self {
        Self { io, limits }
    }

    pub fn into_inner(self) -> RW {
        self.io
    }
}

/// Map std::io errors into the framing error taxonomy.
fn map_io_err(e: std::io::Error) -> FramingError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        FramingError::UnexpectedEof
    } else {
        FramingError::Io(e.to_string())
    }
}

fn encode_header(frame: &Frame, len: u32) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[..2].copy_from_slice(&frame.id.to_be_bytes());
    out[2..5].copy_from_slice(&len.to_be_bytes()[1..]);
    out[5..].copy_from_slice(&frame.version.to_be_bytes());
    out
}

#[async_trait]
impl<RW> FrameIo for HeaderFrameIo<RW>
where
    RW: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_frame(&mut self) -> Result<Frame, FramingError> {
        let mut header = [0u8; HEADER_LEN];
        self.io.read_exact(&mut header).await.map_err(map_io_err)?;

        let id = u16::from_be_bytes([header[0], header[1]]);
        let len = u32::from_be_bytes([0, header[2], header[3], header[4]]);
        let version = u16::from_be_bytes([header[5], header[6]]);

        self.limits.validate_len(len)?;

        let mut payload = vec![0u8; len as usize];
        self.io.read_exact(&mut payload).await.map_err(map_io_err)?;

        Ok(Frame {
            id,
            version,
            payload,
        })
    }

    async fn write_frame(&mut self, frame: &Frame) -> Result<(), FramingError> {
        let len: u32 = frame
            .payload
            .len()
            .try_into()
            .map_err(|_| FramingError::PayloadTooLarge {
                len: u32::MAX,
                max: self.limits.max_payload_len,
            })?;

        self.limits.validate_len(len)?;

        let header = encode_header(frame, len);
        self.io.write_all(&header).await.map_err(map_io_err)?;
        self.io.write_all(&frame.payload).await.map_err(map_io_err)?;
        self.io.flush().await.map_err(map_io_err)?;

        Ok(())
    }
}
