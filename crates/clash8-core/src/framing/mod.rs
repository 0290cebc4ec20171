pub mod header;
pub mod traits;
pub mod types;

pub use header::*;
pub use traits::*;
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("payload too large: {len} > {max}")]
    PayloadTooLarge { len: u32, max: u32 },
}
