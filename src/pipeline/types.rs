use std::fmt;

use crate::mx::MxDiagnostic;
use crate::suggest::SuggestOptions;
use crate::validator::ValidationMode;
use crate::whois::DomainInfo;

/// Serialized in place of [`DomainInfo`] when the WHOIS lookup failed.
pub const DOMAIN_INFO_UNAVAILABLE: &str = "Could not retrieve domain information";

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Valid,
    Invalid,
    Error,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the WHOIS stage. A failure only ever shows up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainLookup {
    Found(DomainInfo),
    Failed { reason: String },
}

impl DomainLookup {
    pub fn info(&self) -> Option<&DomainInfo> {
        match self {
            Self::Found(info) => Some(info),
            Self::Failed { .. } => None,
        }
    }
}

#[cfg(feature = "with-serde")]
impl serde::Serialize for DomainLookup {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Found(info) => serde::Serialize::serialize(info, serializer),
            Self::Failed { .. } => serializer.serialize_str(DOMAIN_INFO_UNAVAILABLE),
        }
    }
}

/// Detail behind the collapsed booleans. Never consulted for `status`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub mx: Option<MxDiagnostic>,
    /// Label of the probe verdict (`accepted`, `rejected`, `unreachable`...).
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub smtp: Option<String>,
    /// Why WHOIS produced nothing.
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub whois: Option<String>,
}

/// Verdict for one address. `None` fields belong to stages that did not run.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub email: String,
    #[cfg_attr(feature = "with-serde", serde(rename = "syntaxValidation"))]
    pub syntax_valid: bool,
    #[cfg_attr(
        feature = "with-serde",
        serde(rename = "MXRecord", skip_serializing_if = "Option::is_none")
    )]
    pub has_mx_record: Option<bool>,
    #[cfg_attr(
        feature = "with-serde",
        serde(rename = "smtpConnection", skip_serializing_if = "Option::is_none")
    )]
    pub smtp_accepted: Option<bool>,
    #[cfg_attr(
        feature = "with-serde",
        serde(rename = "isTemporary", skip_serializing_if = "Option::is_none")
    )]
    pub is_disposable: Option<bool>,
    #[cfg_attr(
        feature = "with-serde",
        serde(rename = "suggestedDomains", skip_serializing_if = "Option::is_none")
    )]
    pub suggested_domains: Option<Vec<String>>,
    #[cfg_attr(
        feature = "with-serde",
        serde(rename = "domainInfo", skip_serializing_if = "Option::is_none")
    )]
    pub domain_info: Option<DomainLookup>,
    pub status: VerificationStatus,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub diagnostics: Option<Diagnostics>,
}

impl VerificationResult {
    pub(crate) fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            syntax_valid: false,
            has_mx_record: None,
            smtp_accepted: None,
            is_disposable: None,
            suggested_domains: None,
            domain_info: None,
            status: VerificationStatus::Invalid,
            error: None,
            diagnostics: None,
        }
    }

    /// Result of a run that never completed.
    pub(crate) fn errored(email: &str, message: &str) -> Self {
        Self {
            status: VerificationStatus::Error,
            error: Some(message.to_string()),
            ..Self::new(email)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == VerificationStatus::Valid
    }

    /// Valid iff every stage that ran agrees: syntax, MX, SMTP (when probed)
    /// and not disposable.
    pub(crate) fn finalize(&mut self) {
        let valid = self.syntax_valid
            && self.has_mx_record == Some(true)
            && self.smtp_accepted != Some(false)
            && self.is_disposable == Some(false);
        self.status = if valid {
            VerificationStatus::Valid
        } else {
            VerificationStatus::Invalid
        };
    }

    pub(crate) fn diagnostics_mut(&mut self) -> Option<&mut Diagnostics> {
        self.diagnostics.as_mut()
    }
}

/// Pipeline behaviour shared by every verification run by one [`Verifier`].
///
/// [`Verifier`]: super::Verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierOptions {
    pub mode: ValidationMode,
    /// Run the SMTP probe. When off, `smtpConnection` is omitted and does not
    /// count against the verdict.
    pub smtp_probe: bool,
    /// Run the WHOIS enrichment. When off, `domainInfo` is omitted.
    pub whois: bool,
    /// Attach [`Diagnostics`] to every result.
    pub diagnostics: bool,
    pub suggest: SuggestOptions,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Strict,
            smtp_probe: true,
            whois: true,
            diagnostics: false,
            suggest: SuggestOptions::default(),
        }
    }
}
