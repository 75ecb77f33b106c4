//! Verification orchestrator.
//!
//! [`Verifier::verify`] runs the stages in order: syntax, then MX, then the
//! SMTP probe when MX hosts exist. The disposable check, domain suggestions and
//! WHOIS enrichment run once the domain is known, WHOIS on its own scoped
//! thread alongside the network stages. Every input yields a well-formed
//! [`VerificationResult`]; unexpected failures and panics become
//! `status = Error` with the fields computed so far.

mod error;
mod types;

pub use error::PipelineError;
pub use types::{
    DOMAIN_INFO_UNAVAILABLE, Diagnostics, DomainLookup, VerificationResult, VerificationStatus,
    VerifierOptions,
};

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crate::disposable::DisposableDomains;
use crate::mx::{LookupHost, LookupMx, MxDiagnostic, MxOptions, SystemResolver, resolve_with};
use crate::smtp_verify::{MailboxProbe, ProbeTarget, SmtpProbeOptions, SmtpProber};
use crate::suggest::{ReferenceDomains, SuggestOptions, suggest};
use crate::validator::{EmailParts, ValidationMode, split_address, validate_email};
use crate::whois::{WhoisClient, WhoisLookup, WhoisOptions};

use error::panic_message;

pub type SharedResolver = Arc<dyn LookupMx + Send + Sync>;
pub type SharedHosts = Arc<dyn LookupHost + Send + Sync>;
pub type SharedProbe = Arc<dyn MailboxProbe + Send + Sync>;
pub type SharedWhois = Arc<dyn WhoisLookup + Send + Sync>;

/// Runs the verification pipeline. Build once, share across threads.
#[derive(Clone)]
pub struct Verifier {
    resolver: SharedResolver,
    prober: SharedProbe,
    whois: SharedWhois,
    disposable: Arc<DisposableDomains>,
    reference: Arc<ReferenceDomains>,
    options: VerifierOptions,
}

impl Verifier {
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::default()
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    pub fn verify(&self, email: &str) -> VerificationResult {
        let mut result = VerificationResult::new(email);
        let run = panic::catch_unwind(AssertUnwindSafe(|| self.run(email, &mut result)));
        let failure = match run {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err),
            Err(payload) => Some(PipelineError::panicked(&*payload)),
        };
        match failure {
            Some(err) => {
                log_warn!("verification of {} failed: {}", email, err);
                result.status = VerificationStatus::Error;
                result.error = Some(err.to_string());
            }
            None => result.finalize(),
        }
        log_info!("{} -> {}", email, result.status);
        result
    }

    fn run(&self, email: &str, result: &mut VerificationResult) -> Result<(), PipelineError> {
        let report = validate_email(email, self.options.mode);
        result.syntax_valid = report.ok;
        if !report.ok {
            log_debug!("{} rejected by syntax check: {:?}", email, report.reasons);
            return Ok(());
        }

        let parts = split_address(email)
            .filter(|parts| !parts.ascii_domain.is_empty())
            .ok_or_else(|| PipelineError::decompose(email))?;
        if self.options.diagnostics {
            result.diagnostics = Some(Diagnostics::default());
        }

        thread::scope(|scope| {
            let whois = self.options.whois.then(|| {
                let client = &self.whois;
                let domain = parts.domain.as_str();
                scope.spawn(move || client.lookup(domain))
            });

            let delivery = self.check_delivery(&parts, result);

            result.is_disposable = Some(self.disposable.contains(&parts.domain));
            result.suggested_domains = Some(suggest(
                &parts.domain,
                &self.reference,
                &self.options.suggest,
            ));

            if let Some(handle) = whois {
                let lookup = match handle.join() {
                    Ok(Ok(info)) => DomainLookup::Found(info),
                    Ok(Err(err)) => {
                        log_warn!("whois lookup for {} failed: {}", parts.domain, err);
                        DomainLookup::Failed {
                            reason: err.to_string(),
                        }
                    }
                    Err(payload) => {
                        let reason =
                            format!("whois lookup panicked: {}", panic_message(&*payload));
                        log_warn!("{} ({})", reason, parts.domain);
                        DomainLookup::Failed { reason }
                    }
                };
                if let (DomainLookup::Failed { reason }, Some(diag)) =
                    (&lookup, result.diagnostics_mut())
                {
                    diag.whois = Some(reason.clone());
                }
                result.domain_info = Some(lookup);
            }

            delivery
        })
    }

    /// MX lookup, then the SMTP probe when hosts were found.
    fn check_delivery(
        &self,
        parts: &EmailParts,
        result: &mut VerificationResult,
    ) -> Result<(), PipelineError> {
        let (status, diagnostic) = match resolve_with(&*self.resolver, &parts.ascii_domain) {
            Ok(status) => {
                let diagnostic = MxDiagnostic::from(&status);
                (Some(status), diagnostic)
            }
            Err(err) if err.is_timeout() => {
                log_warn!("MX lookup for {} timed out: {}", parts.ascii_domain, err);
                (None, MxDiagnostic::LookupFailed)
            }
            Err(err) if err.is_lookup_failure() => {
                log_warn!("MX lookup for {} failed: {}", parts.ascii_domain, err);
                (None, MxDiagnostic::LookupFailed)
            }
            Err(err) => return Err(err.into()),
        };
        let records = status.as_ref().map(|s| s.records()).unwrap_or_default();
        result.has_mx_record = Some(!records.is_empty());
        if let Some(diag) = result.diagnostics_mut() {
            diag.mx = Some(diagnostic);
        }

        if !self.options.smtp_probe {
            return Ok(());
        }
        if records.is_empty() {
            result.smtp_accepted = Some(false);
            return Ok(());
        }

        let target = ProbeTarget {
            local: &parts.local,
            ascii_domain: &parts.ascii_domain,
        };
        let report = self.prober.probe(&target, records);
        log_debug!("smtp probe for {}: {}", target.address(), report.verdict);
        result.smtp_accepted = Some(report.accepted());
        if let Some(diag) = result.diagnostics_mut() {
            diag.smtp = Some(report.verdict.label().to_string());
        }
        Ok(())
    }
}

/// Assembles a [`Verifier`]. Capabilities left unset fall back to the live
/// implementations (system resolver, SMTP on port 25, WHOIS on port 43) and
/// the built-in reference sets. The live SMTP and WHOIS clients resolve host
/// names through `hosts`, or through the same system resolver as MX lookups.
#[derive(Default)]
pub struct VerifierBuilder {
    resolver: Option<SharedResolver>,
    hosts: Option<SharedHosts>,
    prober: Option<SharedProbe>,
    whois: Option<SharedWhois>,
    disposable: Option<Arc<DisposableDomains>>,
    reference: Option<Arc<ReferenceDomains>>,
    mx_options: MxOptions,
    smtp_options: SmtpProbeOptions,
    whois_options: WhoisOptions,
    options: VerifierOptions,
}

impl VerifierBuilder {
    pub fn resolver(mut self, resolver: impl LookupMx + Send + Sync + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Address lookups for the live SMTP and WHOIS clients.
    pub fn hosts(mut self, hosts: impl LookupHost + Send + Sync + 'static) -> Self {
        self.hosts = Some(Arc::new(hosts));
        self
    }

    pub fn prober(mut self, prober: impl MailboxProbe + Send + Sync + 'static) -> Self {
        self.prober = Some(Arc::new(prober));
        self
    }

    pub fn whois(mut self, whois: impl WhoisLookup + Send + Sync + 'static) -> Self {
        self.whois = Some(Arc::new(whois));
        self
    }

    pub fn disposable(mut self, domains: DisposableDomains) -> Self {
        self.disposable = Some(Arc::new(domains));
        self
    }

    pub fn reference(mut self, domains: ReferenceDomains) -> Self {
        self.reference = Some(Arc::new(domains));
        self
    }

    pub fn mx_options(mut self, options: MxOptions) -> Self {
        self.mx_options = options;
        self
    }

    pub fn smtp_options(mut self, options: SmtpProbeOptions) -> Self {
        self.smtp_options = options;
        self
    }

    pub fn whois_options(mut self, options: WhoisOptions) -> Self {
        self.whois_options = options;
        self
    }

    pub fn options(mut self, options: VerifierOptions) -> Self {
        self.options = options;
        self
    }

    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.options.mode = mode;
        self
    }

    pub fn suggest_options(mut self, options: SuggestOptions) -> Self {
        self.options.suggest = options;
        self
    }

    pub fn smtp_probe(mut self, enabled: bool) -> Self {
        self.options.smtp_probe = enabled;
        self
    }

    pub fn whois_enabled(mut self, enabled: bool) -> Self {
        self.options.whois = enabled;
        self
    }

    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.options.diagnostics = enabled;
        self
    }

    /// Fails only when the system resolver is needed and cannot be read.
    pub fn build(self) -> Result<Verifier, PipelineError> {
        let mx_options = self.mx_options;
        let mut system: Option<Arc<SystemResolver>> = None;
        let mut system_resolver = || -> Result<Arc<SystemResolver>, PipelineError> {
            if let Some(existing) = &system {
                return Ok(Arc::clone(existing));
            }
            let created = Arc::new(SystemResolver::new(&mx_options)?);
            system = Some(Arc::clone(&created));
            Ok(created)
        };

        let resolver: SharedResolver = match self.resolver {
            Some(resolver) => resolver,
            None => system_resolver()?,
        };
        let given_hosts = self.hosts;
        let mut hosts = || -> Result<SharedHosts, PipelineError> {
            match &given_hosts {
                Some(hosts) => Ok(Arc::clone(hosts)),
                None => {
                    let system: SharedHosts = system_resolver()?;
                    Ok(system)
                }
            }
        };
        let prober: SharedProbe = match self.prober {
            Some(prober) => prober,
            None => Arc::new(SmtpProber::new(self.smtp_options, hosts()?)),
        };
        let whois: SharedWhois = match self.whois {
            Some(whois) => whois,
            None => Arc::new(WhoisClient::new(self.whois_options, hosts()?)),
        };
        Ok(Verifier {
            resolver,
            prober,
            whois,
            disposable: self
                .disposable
                .unwrap_or_else(|| Arc::new(DisposableDomains::builtin())),
            reference: self
                .reference
                .unwrap_or_else(|| Arc::new(ReferenceDomains::builtin())),
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests;
