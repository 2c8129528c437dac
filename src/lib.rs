pub mod audio;
pub mod call;
pub mod config;
pub mod records;
pub mod session;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReceptionistError {
    #[error("Session start error: {0}")]
    SessionStart(String),

    #[error("Microphone access error: {0}")]
    MicrophoneAccess(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("IO error: {0}")]
    IO(String),
}

impl From<std::io::Error> for ReceptionistError {
    fn from(e: std::io::Error) -> Self {
        ReceptionistError::IO(e.to_string())
    }
}

impl ReceptionistError {
    /// Check if this error leaves an active call usable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Setup failures abort the call
            ReceptionistError::SessionStart(_) => false,
            ReceptionistError::MicrophoneAccess(_) => false,
            ReceptionistError::Transport(_) => false,
            // Dropped per message, the session keeps running
            ReceptionistError::MalformedMessage(_) => true,
            ReceptionistError::AudioDevice(_) => false,
            ReceptionistError::AudioProcessing(_) => true,
            ReceptionistError::Config(_) => false,
            ReceptionistError::Channel(_) => false,
            ReceptionistError::IO(_) => false,
        }
    }

    /// The message carried by the error, without its category prefix
    pub fn detail(&self) -> &str {
        match self {
            ReceptionistError::SessionStart(msg)
            | ReceptionistError::MicrophoneAccess(msg)
            | ReceptionistError::Transport(msg)
            | ReceptionistError::MalformedMessage(msg)
            | ReceptionistError::AudioDevice(msg)
            | ReceptionistError::AudioProcessing(msg)
            | ReceptionistError::Config(msg)
            | ReceptionistError::Channel(msg)
            | ReceptionistError::IO(msg) => msg,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ReceptionistError::SessionStart(_) => {
                "Could not reach the voice receptionist. Please try again.".to_string()
            }
            ReceptionistError::MicrophoneAccess(_) => {
                "Microphone unavailable. Please check permissions and devices.".to_string()
            }
            ReceptionistError::Transport(_) => "The call connection was lost.".to_string(),
            ReceptionistError::MalformedMessage(_) => {
                "Received an unreadable message from the receptionist.".to_string()
            }
            ReceptionistError::AudioDevice(_) => {
                "Audio device error. Please check your microphone/speakers.".to_string()
            }
            ReceptionistError::AudioProcessing(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            ReceptionistError::Config(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            ReceptionistError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ReceptionistError::IO(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReceptionistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_messages_are_recoverable() {
        assert!(ReceptionistError::MalformedMessage("bad json".into()).is_recoverable());
        assert!(!ReceptionistError::SessionStart("503".into()).is_recoverable());
        assert!(!ReceptionistError::Transport("reset".into()).is_recoverable());
    }

    #[test]
    fn display_carries_detail() {
        let err = ReceptionistError::SessionStart("No WebSocket URL received".into());
        assert_eq!(err.to_string(), "Session start error: No WebSocket URL received");
        assert_eq!(err.detail(), "No WebSocket URL received");
    }
}
