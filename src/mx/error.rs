use thiserror::Error;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

/// Why an MX lookup produced no answer. "No records" is not an error; see
/// [`MxStatus::NoRecords`](super::MxStatus::NoRecords).
#[derive(Debug, Error)]
pub enum MxError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("'{domain}' cannot be converted to ASCII")]
    IdnaConversion {
        domain: String,
        #[source]
        source: idna::Errors,
    },
    #[error("cannot read system resolver configuration: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("MX lookup for {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: ResolveError,
    },
}

impl MxError {
    /// DNS could not be asked (resolver setup, timeout, transport). The input
    /// itself was fine.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::Lookup { .. } | Self::ResolverInit { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Lookup { source, .. } if matches!(source.kind(), ResolveErrorKind::Timeout)
        )
    }

    pub(crate) fn idna(domain: &str, source: idna::Errors) -> Self {
        Self::IdnaConversion {
            domain: domain.to_string(),
            source,
        }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn lookup(domain: &str, source: ResolveError) -> Self {
        Self::Lookup {
            domain: domain.to_string(),
            source,
        }
    }
}
