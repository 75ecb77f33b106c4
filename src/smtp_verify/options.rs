use std::borrow::Cow;
use std::time::Duration;

/// Controls how the SMTP probe interrogates mail exchangers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub port: u16,
    pub helo_domain: String,
    pub envelope_sender: Option<String>,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
    /// Upper bound on MX hosts tried, one attempt each.
    pub max_servers: usize,
    pub allow_ipv6: bool,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: "localhost".to_string(),
            envelope_sender: None,
            connect_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(5),
            max_servers: 3,
            allow_ipv6: false,
        }
    }
}

impl SmtpProbeOptions {
    /// Hostname announced in `EHLO`/`HELO`.
    pub fn helo_name(&self) -> Cow<'_, str> {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() {
            Cow::Borrowed("localhost")
        } else {
            Cow::Borrowed(trimmed)
        }
    }

    /// Returns the envelope sender used in the `MAIL FROM` command. When unspecified
    /// a `postmaster@domain` placeholder is synthesised.
    pub fn envelope_sender(&self, ascii_domain: &str) -> String {
        self.envelope_sender
            .as_ref()
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("postmaster@{ascii_domain}"))
    }
}
