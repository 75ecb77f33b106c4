use std::net::IpAddr;

use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
    system_conf::read_system_conf,
};

use super::{Error, MxOptions, MxRecord, MxStatus};

/// Lookup MX records for `domain` using the system resolver and the default
/// [`MxOptions`].
///
/// The domain is normalized via IDNA before querying DNS. The resulting
/// [`MxStatus`] contains the sorted list of records (ascending preference).
pub fn check_mx(domain: &str) -> Result<MxStatus, Error> {
    check_mx_with_options(domain, &MxOptions::default())
}

pub fn check_mx_with_options(domain: &str, options: &MxOptions) -> Result<MxStatus, Error> {
    let ascii = normalize_domain(domain)?;
    let resolver = SystemResolver::new(options)?;
    resolve_with(&resolver, &ascii)
}

pub(crate) fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> Result<MxStatus, Error>
where
    R: LookupMx + ?Sized,
{
    let mut records = resolver
        .lookup_mx(ascii_domain)
        .map_err(|err| Error::lookup(ascii_domain, err))?;

    records.sort();
    records.dedup();

    if records.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        Ok(MxStatus::Records(records))
    }
}

pub fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(|err| Error::idna(trimmed, err))
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// Source of MX records. `NXDOMAIN` and empty answers are reported as an empty
/// list; only transport-level failures are errors.
pub trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;
}

/// Address records of a host (MX exchange, WHOIS server). Goes through the
/// same bounded resolver as MX lookups so no stage waits on `getaddrinfo`.
pub trait LookupHost {
    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

/// Literal IPs short-circuit DNS.
pub fn resolve_host<R>(resolver: &R, host: &str) -> Result<Vec<IpAddr>, ResolveError>
where
    R: LookupHost + ?Sized,
{
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    match host.parse::<IpAddr>() {
        Ok(ip) => Ok(vec![ip]),
        Err(_) => resolver.lookup_host(host),
    }
}

/// System resolver configured with the timeout and attempt count of
/// [`MxOptions`].
pub struct SystemResolver {
    inner: Resolver,
}

impl SystemResolver {
    pub fn new(options: &MxOptions) -> Result<Self, Error> {
        let (config, mut opts) = read_system_conf().map_err(Error::resolver_init)?;
        opts.timeout = options.timeout;
        opts.attempts = options.attempts.max(1);
        let inner = Resolver::new(config, opts).map_err(Error::resolver_init)?;
        log_debug!("system resolver ready, lookup budget {:?}", options.budget());
        Ok(Self { inner })
    }
}

impl LookupMx for SystemResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = match self.inner.mx_lookup(domain) {
            Ok(lookup) => lookup,
            Err(err) if is_no_records(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            // "." is a null MX (RFC 7505): the domain accepts no mail.
            if exchange.is_empty() {
                continue;
            }
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }
}

impl LookupHost for SystemResolver {
    fn lookup_host(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        // absolute name: no search-domain expansion
        let fqdn = if host.ends_with('.') {
            host.to_string()
        } else {
            format!("{host}.")
        };
        match self.inner.lookup_ip(fqdn.as_str()) {
            Ok(lookup) => Ok(lookup.iter().collect()),
            Err(err) if is_no_records(&err) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }
}

fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
