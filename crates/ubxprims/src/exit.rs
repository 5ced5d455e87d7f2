use std::fmt;
use std::io;

use ubxprims_frame::FrameError;
use ubxprims_message::MessageError;
use ubxprims_session::SessionError;
use ubxprims_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::SpeedUnsupported(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::PayloadTooLarge { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::UnknownName(_)
        | MessageError::InvalidChoice { .. }
        | MessageError::MissingField { .. }
        | MessageError::ValueOutOfRange { .. }
        | MessageError::NoMatchingFormat { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        MessageError::InvalidDescriptor { .. } => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::Frame(err) => frame_error(context, err),
        SessionError::Message(err) => message_error(context, err),
        SessionError::NoResponse { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        SessionError::Rejected { .. } | SessionError::BaudNegotiationFailed { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubxprims_frame::Identity;

    #[test]
    fn session_errors_map_to_exit_codes() {
        let timeout = session_error(
            "poll",
            SessionError::NoResponse {
                request: "MON-VER".into(),
                attempts: 20,
            },
        );
        assert_eq!(timeout.code, TIMEOUT);
        assert!(timeout.message.starts_with("poll: no response to MON-VER"));

        let rejected = session_error(
            "configure",
            SessionError::Rejected {
                request: "CFG-PRT".into(),
                acknowledged: Identity::new(0x06, 0x00),
            },
        );
        assert_eq!(rejected.code, FAILURE);

        let gone = session_error("poll", TransportError::Disconnected.into());
        assert_eq!(gone.code, TRANSPORT_ERROR);
    }

    #[test]
    fn decode_errors_are_data_invalid() {
        let err = message_error(
            "parse",
            MessageError::UnknownMessage {
                identity: Identity::new(0x01, 0x99),
                length: 3,
            },
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = message_error("poll", MessageError::UnknownName("NAV-XYZ".into()));
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn device_open_failure_is_a_transport_error() {
        let err = transport_error(
            "open failed",
            TransportError::Open {
                device: "/dev/ttyACM9".into(),
                message: "No such file or directory".into(),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("/dev/ttyACM9"));

        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }
}
