//! Disposable-domain classification.
//!
//! [`DisposableDomains`] is built once at startup (built-in set, optionally
//! extended or replaced from a file) and only read afterwards; share it behind
//! an `Arc`.

mod builtin;

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use crate::lists::{self, ListError};

#[derive(Debug, Clone, Default)]
pub struct DisposableDomains {
    use_builtin: bool,
    extra: HashSet<String>,
}

impl DisposableDomains {
    /// The set shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            use_builtin: true,
            extra: HashSet::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Exactly `domains`, without the built-in set.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = domains
            .into_iter()
            .filter_map(|domain| lists::normalize_entry(domain.as_ref()))
            .collect();
        Self {
            use_builtin: false,
            extra,
        }
    }

    /// Replaces the built-in set with the entries of `reader`.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ListError> {
        let domains = lists::read_domains(reader)?;
        if domains.is_empty() {
            return Err(ListError::Empty);
        }
        Ok(Self::from_domains(domains))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ListError> {
        Self::from_reader(lists::open(path.as_ref())?)
    }

    /// Adds the entries of `reader` on top of the current set. Returns how
    /// many new domains were added.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, ListError> {
        let before = self.extra.len();
        for domain in lists::read_domains(reader)? {
            if !(self.use_builtin && builtin::DISPOSABLE_DOMAINS.contains(domain.as_str())) {
                self.extra.insert(domain);
            }
        }
        Ok(self.extra.len() - before)
    }

    pub fn extend_from_path(&mut self, path: impl AsRef<Path>) -> Result<usize, ListError> {
        self.extend_from_reader(lists::open(path.as_ref())?)
    }

    /// Case-insensitive exact match; a trailing dot is ignored.
    pub fn contains(&self, domain: &str) -> bool {
        let Some(needle) = lists::normalize_entry(domain) else {
            return false;
        };
        (self.use_builtin && builtin::DISPOSABLE_DOMAINS.contains(needle.as_str()))
            || self.extra.contains(&needle)
    }

    pub fn len(&self) -> usize {
        let builtin = if self.use_builtin {
            builtin::DISPOSABLE_DOMAINS.len()
        } else {
            0
        };
        builtin + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `is_disposable(domain)` against the built-in set.
pub fn is_disposable(domain: &str) -> bool {
    DisposableDomains::builtin().contains(domain)
}
