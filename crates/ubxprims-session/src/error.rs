use ubxprims_frame::Identity;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error. Terminates the pending exchange immediately.
    #[error("transport error: {0}")]
    Transport(#[from] ubxprims_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] ubxprims_frame::FrameError),

    /// Message encoding or decoding error.
    #[error("message error: {0}")]
    Message(#[from] ubxprims_message::MessageError),

    /// Every attempt of a poll or configuration exchange timed out.
    #[error("no response to {request} after {attempts} attempt(s)")]
    NoResponse { request: String, attempts: u32 },

    /// The receiver answered with ACK-NACK.
    #[error("{request} rejected by receiver (NACK for {acknowledged})")]
    Rejected {
        request: String,
        acknowledged: Identity,
    },

    /// No candidate line speed produced a confirmed switch to the target.
    #[error("baud negotiation to {target} failed (tried {tried:?})")]
    BaudNegotiationFailed { target: u32, tried: Vec<u32> },
}

impl SessionError {
    /// True when the error only means the receiver stayed silent.
    pub fn is_no_response(&self) -> bool {
        matches!(self, SessionError::NoResponse { .. })
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
