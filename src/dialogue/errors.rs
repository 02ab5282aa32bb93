//! Error types surfaced by the chat backend connection.
use std::fmt;

/// Failure categories for a chat request.
#[derive(Debug, Clone)]
pub enum ChatError {
    /// The WebSocket connection could not be established.
    Connect { message: String },
    /// The socket dropped mid-request.
    SocketClosed,
    /// A frame arrived that could not be parsed.
    Protocol { message: String },
    /// The backend reported an error frame.
    Backend { message: String },
}

impl ChatError {
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { message } => write!(f, "Connection failed: {}", message),
            Self::SocketClosed => write!(f, "Socket closed mid-request"),
            Self::Protocol { message } => write!(f, "Protocol error: {}", message),
            Self::Backend { message } => write!(f, "Backend error: {}", message),
        }
    }
}

impl std::error::Error for ChatError {}
