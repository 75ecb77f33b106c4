use std::io::BufRead;
use std::path::Path;

use crate::lists::{self, ListError};

/// Popular mailbox providers, most common first. Order matters: it breaks
/// ties between equally close suggestions.
const POPULAR_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "live.com",
    "msn.com",
    "me.com",
    "mac.com",
    "googlemail.com",
    "protonmail.com",
    "proton.me",
    "zoho.com",
    "yandex.com",
    "yandex.ru",
    "mail.com",
    "gmx.com",
    "gmx.de",
    "gmx.net",
    "web.de",
    "mail.ru",
    "inbox.ru",
    "bk.ru",
    "list.ru",
    "qq.com",
    "163.com",
    "126.com",
    "sina.com",
    "naver.com",
    "daum.net",
    "hanmail.net",
    "rediffmail.com",
    "comcast.net",
    "verizon.net",
    "att.net",
    "sbcglobal.net",
    "bellsouth.net",
    "charter.net",
    "cox.net",
    "earthlink.net",
    "optonline.net",
    "yahoo.co.uk",
    "yahoo.fr",
    "yahoo.de",
    "yahoo.co.in",
    "yahoo.co.jp",
    "yahoo.com.br",
    "hotmail.co.uk",
    "hotmail.fr",
    "hotmail.de",
    "hotmail.it",
    "outlook.fr",
    "live.co.uk",
    "live.fr",
    "btinternet.com",
    "virginmedia.com",
    "sky.com",
    "orange.fr",
    "wanadoo.fr",
    "free.fr",
    "sfr.fr",
    "laposte.net",
    "libero.it",
    "virgilio.it",
    "t-online.de",
    "freenet.de",
    "seznam.cz",
    "wp.pl",
    "o2.pl",
    "interia.pl",
    "uol.com.br",
    "bol.com.br",
    "terra.com.br",
    "shaw.ca",
    "rogers.com",
    "sympatico.ca",
    "bigpond.com",
    "optusnet.com.au",
    "fastmail.com",
    "hey.com",
    "tutanota.com",
    "hushmail.com",
];

/// Ordered, read-only reference list used by the suggestion engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDomains {
    domains: Vec<String>,
}

impl ReferenceDomains {
    pub fn builtin() -> Self {
        Self::from_domains(POPULAR_DOMAINS.iter().copied())
    }

    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for entry in domains {
            if let Some(domain) = lists::normalize_entry(entry.as_ref()) {
                if !out.contains(&domain) {
                    out.push(domain);
                }
            }
        }
        Self { domains: out }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ListError> {
        let domains = lists::read_domains(reader)?;
        if domains.is_empty() {
            return Err(ListError::Empty);
        }
        Ok(Self { domains })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ListError> {
        Self::from_reader(lists::open(path.as_ref())?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl Default for ReferenceDomains {
    fn default() -> Self {
        Self::builtin()
    }
}
