use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmtpVerifyError {
    #[error("no socket address resolved for {host}")]
    NoAddresses { host: String },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SmtpVerifyError {
    pub(crate) fn io(source: io::Error) -> Self {
        Self::Io { source }
    }

    pub(crate) fn timeout(message: &str) -> Self {
        Self::Io {
            source: io::Error::new(io::ErrorKind::TimedOut, message.to_string()),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Whether the server stopped answering within the command timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connect { source, .. } | Self::Io { source } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

impl From<io::Error> for SmtpVerifyError {
    fn from(source: io::Error) -> Self {
        Self::io(source)
    }
}
