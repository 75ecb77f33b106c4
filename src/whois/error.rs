use std::io;

use thiserror::Error;

/// Why a WHOIS lookup produced nothing usable. Never fatal for a verdict.
#[derive(Debug, Error)]
pub enum WhoisError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("connection to {server} failed: {source}")]
    Connect {
        server: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error talking to {server}: {source}")]
    Io {
        server: String,
        #[source]
        source: io::Error,
    },
    #[error("timed out waiting for {server}")]
    Timeout { server: String },
    #[error("no WHOIS server known for .{tld}")]
    NoServer { tld: String },
    #[error("{domain} is not registered according to {server}")]
    NotFound { domain: String, server: String },
    #[error("response from {server} has no registration data")]
    Malformed { server: String },
}

impl WhoisError {
    pub(crate) fn io(server: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout {
                server: server.to_string(),
            },
            _ => Self::Io {
                server: server.to_string(),
                source,
            },
        }
    }

    pub(crate) fn connect(server: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::TimedOut => Self::Timeout {
                server: server.to_string(),
            },
            _ => Self::Connect {
                server: server.to_string(),
                source,
            },
        }
    }
}
