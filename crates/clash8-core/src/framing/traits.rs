use async_trait::async_trait;

use crate::framing::{Frame, FramingError};

// Frame transport interface, implemented over any async byte stream.
#[async_trait]
pub trait FrameIo: Send {
    async fn read_frame(&mut self) -> Result<Frame, FramingError>;
    async fn write_frame(&mut self, frame: &Frame) -> Result<(), FramingError>;
}
