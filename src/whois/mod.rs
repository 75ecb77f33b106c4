//! Domain registration lookup over WHOIS (port 43).
//!
//! [`WhoisClient`] asks the bootstrap server for the registry of the TLD,
//! queries it and follows the registrar referral. Results are best-effort:
//! any missing field stays `None`.

mod client;
mod error;
mod parse;
mod types;

pub use client::{TcpTransport, WhoisClient, WhoisLookup, WhoisTransport};
pub use error::WhoisError;
pub use types::{DomainInfo, WhoisOptions};
