use std::fmt;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    Connect,
    Greeting,
    Ehlo,
    Helo,
    MailFrom,
    RcptTo,
    Rset,
    Quit,
}

impl fmt::Display for AttemptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Ehlo => "EHLO",
            Self::Helo => "HELO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Rset => "RSET",
            Self::Quit => "QUIT",
        })
    }
}

/// A raw SMTP reply, preserving the numeric status code and message text.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// A recorded SMTP transcript event used for diagnostics.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpEvent {
    Sent {
        stage: AttemptStage,
        command: String,
    },
    Received {
        stage: AttemptStage,
        reply: SmtpReply,
    },
    Error {
        stage: AttemptStage,
        message: String,
    },
}

impl fmt::Display for SmtpEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { command, .. } => write!(f, "C: {command}"),
            Self::Received { reply, .. } => write!(f, "S: {} {}", reply.code, reply.message),
            Self::Error { stage, message } => write!(f, "!  {stage}: {message}"),
        }
    }
}

/// Outcome of the handshake against a single MX host.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// `RCPT TO` answered 2xx.
    Accepted { reply: SmtpReply },
    /// `RCPT TO` answered 5xx.
    Rejected { reply: SmtpReply },
    /// 4xx on `MAIL FROM` or `RCPT TO` (greylisting, rate limits).
    TemporaryFailure { reply: SmtpReply },
    /// The envelope sender was refused, so the recipient was never asked.
    SenderRefused { reply: SmtpReply },
    Unreachable { message: String },
    ProtocolError { message: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Whether trying the next MX host cannot change the answer.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Accepted { .. } | Self::Rejected { .. })
    }

    pub fn as_reply(&self) -> Option<&SmtpReply> {
        match self {
            Self::Accepted { reply }
            | Self::Rejected { reply }
            | Self::TemporaryFailure { reply }
            | Self::SenderRefused { reply } => Some(reply),
            _ => None,
        }
    }
}

/// Detailed report for a single SMTP server interrogation.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAttempt {
    pub exchange: String,
    pub address: Option<String>,
    pub events: Vec<SmtpEvent>,
    pub outcome: AttemptOutcome,
}

impl ServerAttempt {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            address: None,
            events: Vec::new(),
            outcome: AttemptOutcome::Unreachable {
                message: "not attempted".to_string(),
            },
        }
    }
}

/// Categorisation of the mailbox after probing every attempted host.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Accepted,
    Rejected { code: u16, message: String },
    TemporaryFailure { code: u16, message: String },
    Unreachable,
    Inconclusive,
    NoMailServer,
}

impl ProbeVerdict {
    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected { .. } => "rejected",
            Self::TemporaryFailure { .. } => "temporary_failure",
            Self::Unreachable => "unreachable",
            Self::Inconclusive => "inconclusive",
            Self::NoMailServer => "no_mail_server",
        }
    }
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("recipient accepted"),
            Self::Rejected { code, message } => write!(f, "rejected ({code} {message})"),
            Self::TemporaryFailure { code, message } => {
                write!(f, "temporary failure ({code} {message})")
            }
            Self::Unreachable => f.write_str("all servers unreachable"),
            Self::Inconclusive => f.write_str("verification inconclusive"),
            Self::NoMailServer => f.write_str("no MX host to probe"),
        }
    }
}

/// Aggregated result of probing one mailbox.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub verdict: ProbeVerdict,
    pub attempts: Vec<ServerAttempt>,
}

impl ProbeReport {
    pub fn accepted(&self) -> bool {
        matches!(self.verdict, ProbeVerdict::Accepted)
    }
}
