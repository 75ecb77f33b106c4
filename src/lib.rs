#![forbid(unsafe_code)]
//! mailverdict_lib: email deliverability verdicts.
//!
//! A [`Verifier`] checks an address in stages: syntax, MX records, an SMTP
//! `RCPT TO` probe, disposable-provider detection, domain typo suggestions and
//! a best-effort WHOIS lookup, then folds them into one
//! [`VerificationResult`]. Every stage is also usable on its own.

#[macro_use]
mod log;

mod lists;

pub mod disposable;
pub mod mx;
pub mod pipeline;
pub mod smtp_verify;
pub mod suggest;
pub mod validator;
pub mod whois;

#[cfg(feature = "with-csv")]
pub mod bulk;

#[cfg(test)]
mod testutil;

pub use disposable::{DisposableDomains, is_disposable};
pub use lists::ListError;
pub use mx::{
    Error as MxError, LookupHost, LookupMx, MxDiagnostic, MxOptions, MxRecord, MxStatus,
    SystemResolver, check_mx,
};
pub use pipeline::{
    DomainLookup, PipelineError, SharedHosts, VerificationResult, VerificationStatus, Verifier,
    VerifierBuilder, VerifierOptions,
};
pub use smtp_verify::{MailboxProbe, ProbeReport, ProbeVerdict, SmtpProbeOptions, SmtpProber};
pub use suggest::{ReferenceDomains, SuggestOptions, suggest, suggest_domains};
pub use validator::{
    EmailParts, ValidationMode, ValidationReport, is_valid_email, split_address, validate_email,
};
pub use whois::{DomainInfo, WhoisClient, WhoisError, WhoisLookup, WhoisOptions};
