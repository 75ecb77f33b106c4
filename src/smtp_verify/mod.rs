//! SMTP mailbox probing.
//!
//! [`probe_mailbox`] runs a minimal SMTP dialogue (greeting, `EHLO`,
//! `MAIL FROM`, `RCPT TO`, `RSET`, `QUIT`) against already resolved MX hosts
//! and classifies what the servers said into a [`ProbeVerdict`]. Accept-all
//! servers and hosts that block probing make this best-effort: a positive
//! answer is evidence, not proof.

mod error;
mod options;
mod probe;
mod session;
mod types;

pub use error::SmtpVerifyError;
pub use options::SmtpProbeOptions;
pub use probe::{MailboxProbe, ProbeTarget, SmtpProber, probe_mailbox};
pub use types::{
    AttemptOutcome, AttemptStage, ProbeReport, ProbeVerdict, ServerAttempt, SmtpEvent, SmtpReply,
};
