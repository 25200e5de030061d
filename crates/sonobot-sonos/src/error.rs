use sonobot_core::error::SonobotError;
use thiserror::Error;

/// Errors that can occur during SOAP operations with a Sonos speaker.
#[derive(Debug, Error)]
pub enum SoapError {
    /// HTTP request to the speaker failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Speaker returned a non-success HTTP status without a SOAP fault.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// Speaker returned a SOAP fault response.
    #[error("SOAP fault: {0}")]
    Fault(String),

    /// Response did not contain what the action promises.
    #[error("failed to parse {0} response")]
    Parse(&'static str),
}

/// Convenient Result alias for SOAP operations.
pub type SoapResult<T> = Result<T, SoapError>;

impl SoapError {
    /// UPnP error 701: the transport cannot make the requested transition
    /// (e.g. `Pause` while stopped, `Next` on the last track).
    pub fn is_transition_unavailable(&self) -> bool {
        match self {
            SoapError::Fault(msg) => msg.contains("701"),
            _ => false,
        }
    }
}

impl From<SoapError> for SonobotError {
    fn from(e: SoapError) -> Self {
        SonobotError::Device(e.to_string())
    }
}
