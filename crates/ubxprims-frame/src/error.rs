use crate::codec::Identity;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer does not start with the 0xB5 0x62 sync marker.
    #[error("invalid frame sync (expected 0xB5 0x62)")]
    InvalidSync,

    /// Fewer bytes are available than the header declares.
    #[error("frame truncated ({available} bytes available, {needed} needed)")]
    Truncated { needed: usize, available: usize },

    /// The trailing checksum does not match the computed one.
    #[error(
        "checksum invalid for {identity} (computed {computed:02x?}, found {found:02x?})"
    )]
    ChecksumInvalid {
        identity: Identity,
        computed: [u8; 2],
        found: [u8; 2],
    },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying link failed.
    #[error("transport error: {0}")]
    Transport(#[from] ubxprims_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
