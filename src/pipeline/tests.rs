use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use super::*;
use crate::mx::MxRecord;
use crate::mx::tests::StubResolver;
use crate::smtp_verify::{ProbeReport, ProbeVerdict};
use crate::testutil::spawn_trickle_server;
use crate::whois::{DomainInfo, WhoisError};

struct StubProbe {
    verdict: ProbeVerdict,
    calls: Arc<AtomicUsize>,
}

impl StubProbe {
    fn new(verdict: ProbeVerdict) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = Self {
            verdict,
            calls: Arc::clone(&calls),
        };
        (probe, calls)
    }
}

impl MailboxProbe for StubProbe {
    fn probe(&self, _: &ProbeTarget<'_>, records: &[MxRecord]) -> ProbeReport {
        assert!(!records.is_empty(), "probe called without MX hosts");
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProbeReport {
            verdict: self.verdict.clone(),
            attempts: Vec::new(),
        }
    }
}

enum StubWhois {
    Found,
    Fails,
    Panics,
}

impl WhoisLookup for StubWhois {
    fn lookup(&self, domain: &str) -> Result<DomainInfo, WhoisError> {
        match self {
            Self::Found => Ok(DomainInfo {
                registrar: Some("Example Registrar, LLC".into()),
                whois_server: Some("whois.example-registrar.test".into()),
                country: Some("US".into()),
            }),
            Self::Fails => Err(WhoisError::NotFound {
                domain: domain.to_string(),
                server: "whois.registry.test".into(),
            }),
            Self::Panics => panic!("whois parser blew up"),
        }
    }
}

fn one_mx() -> StubResolver {
    StubResolver::with_records(vec![MxRecord::new(10, "mx.example.com")])
}

fn verifier(resolver: StubResolver, probe: StubProbe, whois: StubWhois) -> Verifier {
    Verifier::builder()
        .resolver(resolver)
        .prober(probe)
        .whois(whois)
        .build()
        .expect("stubbed verifier")
}

fn accepting() -> StubProbe {
    StubProbe::new(ProbeVerdict::Accepted).0
}

#[test]
fn deliverable_address_is_valid() {
    let v = verifier(one_mx(), accepting(), StubWhois::Found);
    let r = v.verify("user@example.com");
    assert!(r.syntax_valid);
    assert_eq!(r.has_mx_record, Some(true));
    assert_eq!(r.smtp_accepted, Some(true));
    assert_eq!(r.is_disposable, Some(false));
    assert!(r.suggested_domains.is_some());
    let info = r.domain_info.as_ref().and_then(DomainLookup::info);
    assert_eq!(
        info.and_then(|i| i.registrar.as_deref()),
        Some("Example Registrar, LLC")
    );
    assert_eq!(r.status, VerificationStatus::Valid);
    assert!(r.error.is_none());
}

#[test]
fn bad_syntax_stops_everything() {
    let (probe, calls) = StubProbe::new(ProbeVerdict::Accepted);
    let v = verifier(one_mx(), probe, StubWhois::Panics);
    let r = v.verify("not-an-email");
    assert!(!r.syntax_valid);
    assert_eq!(r.status, VerificationStatus::Invalid);
    assert_eq!(r.has_mx_record, None);
    assert_eq!(r.smtp_accepted, None);
    assert_eq!(r.is_disposable, None);
    assert_eq!(r.suggested_domains, None);
    assert_eq!(r.domain_info, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn no_mx_skips_probe() {
    let (probe, calls) = StubProbe::new(ProbeVerdict::Accepted);
    let v = verifier(StubResolver::with_records(vec![]), probe, StubWhois::Found);
    let r = v.verify("user@example.com");
    assert_eq!(r.has_mx_record, Some(false));
    assert_eq!(r.smtp_accepted, Some(false));
    assert_eq!(r.status, VerificationStatus::Invalid);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn resolver_failure_collapses_to_no_mx() {
    let (probe, calls) = StubProbe::new(ProbeVerdict::Accepted);
    let v = Verifier::builder()
        .resolver(StubResolver::failing())
        .prober(probe)
        .whois(StubWhois::Found)
        .diagnostics(true)
        .build()
        .expect("verifier");
    let r = v.verify("user@example.com");
    assert_eq!(r.has_mx_record, Some(false));
    assert_eq!(r.smtp_accepted, Some(false));
    assert_eq!(r.status, VerificationStatus::Invalid);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let diag = r.diagnostics.expect("diagnostics requested");
    assert_eq!(diag.mx, Some(MxDiagnostic::LookupFailed));
}

#[test]
fn rejected_recipient_is_invalid() {
    let probe = StubProbe::new(ProbeVerdict::Rejected {
        code: 550,
        message: "no such user".into(),
    })
    .0;
    let v = Verifier::builder()
        .resolver(one_mx())
        .prober(probe)
        .whois(StubWhois::Found)
        .diagnostics(true)
        .build()
        .expect("verifier");
    let r = v.verify("ghost@example.com");
    assert_eq!(r.smtp_accepted, Some(false));
    assert_eq!(r.status, VerificationStatus::Invalid);
    let diag = r.diagnostics.expect("diagnostics requested");
    assert_eq!(diag.mx, Some(MxDiagnostic::Found));
    assert_eq!(diag.smtp.as_deref(), Some("rejected"));
}

#[test]
fn disposable_domain_is_invalid_even_when_deliverable() {
    let v = verifier(one_mx(), accepting(), StubWhois::Found);
    let r = v.verify("user@mailinator.com");
    assert_eq!(r.has_mx_record, Some(true));
    assert_eq!(r.smtp_accepted, Some(true));
    assert_eq!(r.is_disposable, Some(true));
    assert_eq!(r.status, VerificationStatus::Invalid);
}

#[test]
fn custom_disposable_set_is_used() {
    let v = Verifier::builder()
        .resolver(one_mx())
        .prober(accepting())
        .whois(StubWhois::Found)
        .disposable(DisposableDomains::from_domains(["throwaway.test"]))
        .build()
        .expect("verifier");
    assert_eq!(v.verify("a@throwaway.test").is_disposable, Some(true));
    assert_eq!(v.verify("a@mailinator.com").is_disposable, Some(false));
}

#[test]
fn whois_failure_does_not_change_status() {
    let ok = verifier(one_mx(), accepting(), StubWhois::Found).verify("user@example.com");
    let failed = verifier(one_mx(), accepting(), StubWhois::Fails).verify("user@example.com");
    assert_eq!(ok.status, failed.status);
    assert!(matches!(failed.domain_info, Some(DomainLookup::Failed { .. })));
}

#[test]
fn whois_panic_is_contained() {
    let r = verifier(one_mx(), accepting(), StubWhois::Panics).verify("user@example.com");
    assert_eq!(r.status, VerificationStatus::Valid);
    match r.domain_info {
        Some(DomainLookup::Failed { reason }) => assert!(reason.contains("panicked")),
        other => panic!("expected failure marker, got {other:?}"),
    }
}

#[test]
fn panicking_stage_yields_error_status() {
    struct ExplodingProbe;
    impl MailboxProbe for ExplodingProbe {
        fn probe(&self, _: &ProbeTarget<'_>, _: &[MxRecord]) -> ProbeReport {
            panic!("socket layer exploded");
        }
    }
    let v = Verifier::builder()
        .resolver(one_mx())
        .prober(ExplodingProbe)
        .whois(StubWhois::Found)
        .build()
        .expect("verifier");
    let r = v.verify("user@example.com");
    assert_eq!(r.status, VerificationStatus::Error);
    assert!(r.error.as_deref().unwrap_or_default().contains("socket layer exploded"));
    assert!(r.syntax_valid);
    assert_eq!(r.has_mx_record, Some(true));
}

#[test]
fn typo_domain_gets_suggestions() {
    let v = verifier(one_mx(), accepting(), StubWhois::Found);
    let r = v.verify("user@gmial.com");
    let suggestions = r.suggested_domains.expect("suggestions");
    assert_eq!(suggestions.first().map(String::as_str), Some("gmail.com"));
    assert!(!suggestions.iter().any(|d| d == "gmial.com"));
}

#[test]
fn repeated_runs_agree() {
    let v = verifier(one_mx(), accepting(), StubWhois::Found);
    let first = v.verify("user@mailinator.com");
    let second = v.verify("user@mailinator.com");
    assert_eq!(first.status, second.status);
    assert_eq!(first.syntax_valid, second.syntax_valid);
    assert_eq!(first.is_disposable, second.is_disposable);
}

#[test]
fn disabled_stages_are_omitted() {
    let (probe, calls) = StubProbe::new(ProbeVerdict::Accepted);
    let v = Verifier::builder()
        .resolver(one_mx())
        .prober(probe)
        .whois(StubWhois::Panics)
        .smtp_probe(false)
        .whois_enabled(false)
        .build()
        .expect("verifier");
    let r = v.verify("user@example.com");
    assert_eq!(r.smtp_accepted, None);
    assert_eq!(r.domain_info, None);
    assert_eq!(r.status, VerificationStatus::Valid);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn verifier_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Verifier>();
}

#[test]
fn resolver_timeout_collapses_to_no_mx() {
    let v = Verifier::builder()
        .resolver(StubResolver::new(|_| {
            Err(ResolveError::from(ResolveErrorKind::Timeout))
        }))
        .prober(accepting())
        .whois(StubWhois::Found)
        .diagnostics(true)
        .build()
        .expect("verifier");
    let r = v.verify("user@example.com");
    assert_eq!(r.has_mx_record, Some(false));
    assert_eq!(r.status, VerificationStatus::Invalid);
    let diag = r.diagnostics.expect("diagnostics requested");
    assert_eq!(diag.mx, Some(MxDiagnostic::LookupFailed));
}

#[test]
fn slow_whois_server_is_bounded_by_total_timeout() {
    let port = spawn_trickle_server(
        b"refer: whois.registry.test\n\nwhois: whois.registry.test\n",
        Duration::from_millis(200),
    );
    let whois = WhoisClient::new(
        WhoisOptions {
            bootstrap_server: "127.0.0.1".to_string(),
            port,
            query_timeout: Duration::from_millis(800),
            total_timeout: Duration::from_secs(1),
            ..WhoisOptions::default()
        },
        Arc::new(StubResolver::failing()),
    );
    let v = Verifier::builder()
        .resolver(one_mx())
        .prober(accepting())
        .whois(whois)
        .build()
        .expect("verifier");

    let started = Instant::now();
    let r = v.verify("user@example.com");
    let elapsed = started.elapsed();

    assert!(
        matches!(r.domain_info, Some(DomainLookup::Failed { .. })),
        "{:?}",
        r.domain_info
    );
    assert_eq!(r.status, VerificationStatus::Valid);
    assert!(elapsed < Duration::from_millis(1500), "took {elapsed:?}");
}

#[test]
fn slow_smtp_server_is_bounded_by_command_timeout() {
    let port = spawn_trickle_server(
        b"220 slow.smtp.test ESMTP\r\n",
        Duration::from_millis(200),
    );
    let prober = SmtpProber::new(
        SmtpProbeOptions {
            port,
            connect_timeout: Duration::from_secs(1),
            command_timeout: Duration::from_millis(600),
            max_servers: 1,
            ..SmtpProbeOptions::default()
        },
        Arc::new(StubResolver::failing()),
    );
    let v = Verifier::builder()
        .resolver(StubResolver::with_records(vec![MxRecord::new(
            10,
            "127.0.0.1",
        )]))
        .prober(prober)
        .whois(StubWhois::Found)
        .build()
        .expect("verifier");

    let started = Instant::now();
    let r = v.verify("user@example.com");
    let elapsed = started.elapsed();

    assert_eq!(r.has_mx_record, Some(true));
    assert_eq!(r.smtp_accepted, Some(false));
    assert_eq!(r.status, VerificationStatus::Invalid);
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[cfg(feature = "with-serde")]
mod wire {
    use super::*;

    #[test]
    fn invalid_syntax_serializes_three_keys() {
        let v = verifier(one_mx(), accepting(), StubWhois::Found);
        insta::assert_json_snapshot!(v.verify("not-an-email"), @r###"
        {
          "email": "not-an-email",
          "syntaxValidation": false,
          "status": "Invalid"
        }
        "###);
    }

    #[test]
    fn full_result_uses_wire_key_names() {
        let v = verifier(one_mx(), accepting(), StubWhois::Found);
        let json = serde_json::to_value(v.verify("user@example.com")).expect("json");
        let mut keys: Vec<&str> = json
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "MXRecord",
                "domainInfo",
                "email",
                "isTemporary",
                "smtpConnection",
                "status",
                "suggestedDomains",
                "syntaxValidation",
            ]
        );
        assert_eq!(json["status"], "Valid");
        assert_eq!(json["domainInfo"]["server"], "whois.example-registrar.test");
    }

    #[test]
    fn failed_whois_serializes_sentinel() {
        let v = verifier(one_mx(), accepting(), StubWhois::Fails);
        let json = serde_json::to_value(v.verify("user@example.com")).expect("json");
        assert_eq!(json["domainInfo"], DOMAIN_INFO_UNAVAILABLE);
    }

    #[test]
    fn error_status_carries_message() {
        let r = VerificationResult {
            status: VerificationStatus::Error,
            error: Some("boom".into()),
            ..VerificationResult::new("x@example.com")
        };
        let json = serde_json::to_value(&r).expect("json");
        assert_eq!(json["status"], "Error");
        assert_eq!(json["error"], "boom");
    }
}
