pub mod audio;
pub mod remote;
pub mod session;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ScribbleError {
    #[error("Empty prompt")]
    EmptyPrompt,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Microphone error: {0}")]
    MicrophoneError(String),

    #[error("Audio encoding error: {0}")]
    AudioEncodeError(String),

    #[error("No result available")]
    NoResult,

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ScribbleError {
    fn from(e: std::io::Error) -> Self {
        ScribbleError::IOError(e.to_string())
    }
}

impl ScribbleError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can simply try again with a real prompt
            ScribbleError::EmptyPrompt => true,
            // Remote failures are typically transient
            ScribbleError::ServiceError(_) => true,
            ScribbleError::TransportError(_) => true,
            // Device errors may require user intervention
            ScribbleError::MicrophoneError(_) => false,
            ScribbleError::AudioEncodeError(_) => true,
            ScribbleError::NoResult => true,
            ScribbleError::IOError(_) => false,
            ScribbleError::ChannelError(_) => false,
            ScribbleError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ScribbleError::EmptyPrompt => {
                "Please enter an idea or click an example!".to_string()
            }
            // Messages reported by the generation service are shown verbatim
            ScribbleError::ServiceError(message) => message.clone(),
            ScribbleError::TransportError(_) => {
                "Oops! Something went wrong. Please try again.".to_string()
            }
            ScribbleError::MicrophoneError(_) => {
                "Could not access microphone. Please check permissions.".to_string()
            }
            ScribbleError::AudioEncodeError(_) => {
                "Could not understand the audio. Please try again or type your idea.".to_string()
            }
            ScribbleError::NoResult => {
                "Nothing to download yet. Create a coloring page first!".to_string()
            }
            ScribbleError::IOError(_) => {
                "File system error occurred.".to_string()
            }
            ScribbleError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ScribbleError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScribbleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_message_is_verbatim() {
        let err = ScribbleError::ServiceError("rate limited".to_string());
        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn test_transport_error_uses_generic_message() {
        let err = ScribbleError::TransportError("connection refused".to_string());
        assert_eq!(
            err.user_message(),
            "Oops! Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ScribbleError = io.into();
        assert!(matches!(err, ScribbleError::IOError(_)));
        assert!(!err.is_recoverable());
    }
}
