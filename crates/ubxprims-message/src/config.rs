/// Controls registry lookup behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, a zero-length payload for a known message with no
    /// zero-length format returns `MessageError::UnknownMessage`. When false
    /// it decodes to an empty body.
    pub strict_zero_length: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_zero_length: false,
        }
    }
}
