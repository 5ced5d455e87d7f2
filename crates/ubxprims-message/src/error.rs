use ubxprims_frame::Identity;

/// Errors that can occur while describing, decoding or encoding messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// A repeating payload does not divide into whole blocks.
    #[error(
        "malformed {name}: {length} bytes after a {header}-byte header is not a multiple of {block}"
    )]
    MalformedMessage {
        name: &'static str,
        length: usize,
        header: usize,
        block: usize,
    },

    /// No format is registered for the identity and length.
    #[error("unknown message {identity} with length {length}")]
    UnknownMessage { identity: Identity, length: usize },

    /// No message carries the given name.
    #[error("unknown message name: {0}")]
    UnknownName(String),

    /// A descriptor failed validation while building the registry.
    #[error("invalid format for {name}: {reason}")]
    InvalidDescriptor { name: &'static str, reason: String },

    /// A field required for encoding is absent from the record.
    #[error("{message}: missing field {field}")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },

    /// A value does not fit the primitive type of its field.
    #[error("{message}.{field}: value {value} does not fit {expected}")]
    ValueOutOfRange {
        message: &'static str,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// No registered layout matches the supplied fields.
    #[error("{message}: no format accepts fields [{fields}]")]
    NoMatchingFormat {
        message: &'static str,
        fields: String,
    },

    /// A typed view was requested from the wrong message.
    #[error("expected {expected}, got {found}")]
    UnexpectedMessage {
        expected: &'static str,
        found: &'static str,
    },

    /// A name is not present in a bit or value table.
    #[error("{name} is not valid; expected one of: {choices}")]
    InvalidChoice { name: String, choices: String },
}

pub type Result<T> = std::result::Result<T, MessageError>;
