use std::time::Duration;

/// Registration metadata for a domain. Each field is whatever the servers
/// published; any of them may be missing.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainInfo {
    pub registrar: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(rename = "server"))]
    pub whois_server: Option<String>,
    pub country: Option<String>,
}

impl DomainInfo {
    pub fn is_empty(&self) -> bool {
        self.registrar.is_none() && self.whois_server.is_none() && self.country.is_none()
    }

    /// Fills the fields still missing from `other`.
    pub(crate) fn merge(&mut self, other: DomainInfo) {
        if self.registrar.is_none() {
            self.registrar = other.registrar;
        }
        if self.whois_server.is_none() {
            self.whois_server = other.whois_server;
        }
        if self.country.is_none() {
            self.country = other.country;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisOptions {
    /// Server asked for the TLD referral.
    pub bootstrap_server: String,
    pub port: u16,
    /// Timeout of one connect/read.
    pub query_timeout: Duration,
    /// Budget for the whole lookup, referrals included.
    pub total_timeout: Duration,
    /// Registrar referrals followed after the registry answer.
    pub max_referrals: usize,
}

impl Default for WhoisOptions {
    fn default() -> Self {
        Self {
            bootstrap_server: "whois.iana.org".to_string(),
            port: 43,
            query_timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(8),
            max_referrals: 2,
        }
    }
}
