/// Errors that can occur on a receiver link.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the specified device.
    #[error("failed to open {device}: {message}")]
    Open { device: String, message: String },

    /// The link does not support changing its line speed.
    #[error("line speed change to {0} baud is not supported by this transport")]
    SpeedUnsupported(u32),

    /// Failed to apply a new line speed.
    #[error("failed to set line speed to {rate} baud: {message}")]
    Speed { rate: u32, message: String },

    /// An I/O error occurred on the link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device went away (EOF on a live link).
    #[error("device disconnected")]
    Disconnected,
}

impl TransportError {
    /// True for errors that only mean "no data right now".
    ///
    /// Non-blocking and timed reads surface these; callers treat them as a
    /// zero-byte read instead of a failure.
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            TransportError::Io(err) if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
