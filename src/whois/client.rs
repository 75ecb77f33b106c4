use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::mx::{LookupHost, resolve_host};

use super::error::WhoisError;
use super::parse::{is_not_found, parse_domain_info, referral_server};
use super::types::{DomainInfo, WhoisOptions};

/// Largest response kept from one server.
const MAX_RESPONSE_BYTES: usize = 256 * 1024;
const READ_CHUNK: usize = 4096;

/// Registration lookup for a domain.
pub trait WhoisLookup {
    fn lookup(&self, domain: &str) -> Result<DomainInfo, WhoisError>;
}

/// One request/response exchange with a WHOIS server.
///
/// `timeout` bounds the whole exchange, not each socket call.
pub trait WhoisTransport {
    fn query(&self, server: &str, query: &str, timeout: Duration) -> Result<String, WhoisError>;
}

/// Plain-text WHOIS over TCP (`<query>\r\n`, read until the server closes).
#[derive(Clone)]
pub struct TcpTransport {
    port: u16,
    hosts: Arc<dyn LookupHost + Send + Sync>,
}

impl TcpTransport {
    pub fn new(port: u16, hosts: Arc<dyn LookupHost + Send + Sync>) -> Self {
        Self { port, hosts }
    }

    fn open(&self, server: &str, deadline: Instant) -> Result<TcpStream, WhoisError> {
        let ips = resolve_host(&*self.hosts, server).map_err(|err| {
            WhoisError::connect(server, io::Error::new(io::ErrorKind::NotFound, err))
        })?;
        let mut last_err = None;
        for ip in ips {
            let left = remaining(server, deadline)?;
            match TcpStream::connect_timeout(&SocketAddr::new(ip, self.port), left) {
                Ok(stream) => return Ok(stream),
                Err(err) => last_err = Some(err),
            }
        }
        Err(WhoisError::connect(
            server,
            last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses")),
        ))
    }
}

impl fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpTransport")
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl WhoisTransport for TcpTransport {
    fn query(&self, server: &str, query: &str, timeout: Duration) -> Result<String, WhoisError> {
        let deadline = Instant::now() + timeout;
        let mut stream = self.open(server, deadline)?;

        stream
            .set_write_timeout(Some(remaining(server, deadline)?))
            .map_err(|e| WhoisError::io(server, e))?;
        stream
            .write_all(format!("{query}\r\n").as_bytes())
            .map_err(|e| WhoisError::io(server, e))?;

        let mut buf = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        while buf.len() < MAX_RESPONSE_BYTES {
            stream
                .set_read_timeout(Some(remaining(server, deadline)?))
                .map_err(|e| WhoisError::io(server, e))?;
            let n = stream
                .read(&mut chunk)
                .map_err(|e| WhoisError::io(server, e))?;
            if n == 0 {
                break;
            }
            let keep = n.min(MAX_RESPONSE_BYTES - buf.len());
            buf.extend_from_slice(&chunk[..keep]);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Time left before `deadline`, or a timeout once it has passed.
fn remaining(server: &str, deadline: Instant) -> Result<Duration, WhoisError> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(WhoisError::Timeout {
            server: server.to_string(),
        });
    }
    Ok(left)
}

/// Resolves registration data the way the `whois` command does: ask the
/// bootstrap server which registry owns the TLD, query that registry, then
/// follow the registrar referral when one is published.
#[derive(Debug, Clone)]
pub struct WhoisClient<T = TcpTransport> {
    transport: T,
    options: WhoisOptions,
}

impl WhoisClient<TcpTransport> {
    /// Client over TCP; server names are resolved through `hosts`.
    pub fn new(options: WhoisOptions, hosts: Arc<dyn LookupHost + Send + Sync>) -> Self {
        let transport = TcpTransport::new(options.port, hosts);
        Self { transport, options }
    }
}

impl<T: WhoisTransport> WhoisClient<T> {
    pub fn with_transport(transport: T, options: WhoisOptions) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &WhoisOptions {
        &self.options
    }

    fn ask(&self, server: &str, query: &str, deadline: Instant) -> Result<String, WhoisError> {
        let left = remaining(server, deadline)?;
        log_debug!("whois -h {} {}", server, query);
        self.transport
            .query(server, query, left.min(self.options.query_timeout))
    }
}

impl<T: WhoisTransport> WhoisLookup for WhoisClient<T> {
    fn lookup(&self, domain: &str) -> Result<DomainInfo, WhoisError> {
        let domain = domain.trim().trim_end_matches('.').to_lowercase();
        if domain.is_empty() {
            return Err(WhoisError::EmptyDomain);
        }
        let ascii = idna::domain_to_ascii(&domain)
            .map_err(|source| WhoisError::IdnaConversion { source })?;
        let tld = ascii.rsplit('.').next().unwrap_or_default().to_string();

        let deadline = Instant::now() + self.options.total_timeout;

        let bootstrap = &self.options.bootstrap_server;
        let tld_reply = self.ask(bootstrap, &tld, deadline)?;
        let registry = referral_server(&tld_reply).ok_or(WhoisError::NoServer { tld })?;

        let reply = self.ask(&registry, &ascii, deadline)?;
        if is_not_found(&reply) {
            return Err(WhoisError::NotFound {
                domain: ascii,
                server: registry,
            });
        }
        let mut info = parse_domain_info(&reply);

        let mut current = registry.clone();
        for _ in 0..self.options.max_referrals {
            let next = match info.whois_server.as_deref() {
                Some(next) if next != current => next.to_string(),
                _ => break,
            };
            match self.ask(&next, &ascii, deadline) {
                Ok(reply) if !is_not_found(&reply) => {
                    let mut detail = parse_domain_info(&reply);
                    let referred = detail.whois_server.take();
                    detail.whois_server = Some(next.clone());
                    detail.merge(info);
                    info = detail;
                    match referred {
                        Some(further) if further != next => {
                            current = next;
                            info.whois_server = Some(further);
                        }
                        _ => break,
                    }
                }
                Ok(_) => break,
                Err(err) => {
                    // registry data is still good
                    log_debug!("whois referral to {} failed: {}", next, err);
                    break;
                }
            }
        }

        if info.is_empty() {
            return Err(WhoisError::Malformed { server: registry });
        }
        Ok(info)
    }
}
