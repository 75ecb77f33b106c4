use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use trust_dns_resolver::error::ResolveError;

use crate::mx::{LookupHost, MxRecord, resolve_host};

use super::error::SmtpVerifyError;
use super::options::SmtpProbeOptions;
use super::session::SmtpSession;
use super::types::AttemptOutcome::{
    Accepted, ProtocolError, Rejected, SenderRefused, TemporaryFailure, Unreachable,
};
use super::types::{
    AttemptOutcome, AttemptStage as Stage, ProbeReport, ProbeVerdict, ServerAttempt,
    SmtpEvent as Event, SmtpReply,
};

/// The mailbox a probe asks about.
#[derive(Debug, Clone, Copy)]
pub struct ProbeTarget<'a> {
    pub local: &'a str,
    pub ascii_domain: &'a str,
}

impl ProbeTarget<'_> {
    pub fn address(&self) -> String {
        format!("{}@{}", self.local, self.ascii_domain)
    }
}

/// Asks the mail exchangers of a domain whether they would accept a recipient.
pub trait MailboxProbe {
    fn probe(&self, target: &ProbeTarget<'_>, records: &[MxRecord]) -> ProbeReport;
}

/// Live probe over plain SMTP on port 25 (by default).
///
/// Exchange host names are resolved through `hosts`, so address lookups share
/// the DNS timeout of the MX stage.
#[derive(Clone)]
pub struct SmtpProber {
    options: SmtpProbeOptions,
    hosts: Arc<dyn LookupHost + Send + Sync>,
}

impl SmtpProber {
    pub fn new(options: SmtpProbeOptions, hosts: Arc<dyn LookupHost + Send + Sync>) -> Self {
        Self { options, hosts }
    }

    pub fn options(&self) -> &SmtpProbeOptions {
        &self.options
    }
}

impl fmt::Debug for SmtpProber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpProber")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MailboxProbe for SmtpProber {
    fn probe(&self, target: &ProbeTarget<'_>, records: &[MxRecord]) -> ProbeReport {
        probe_mailbox(target, records, &self.options, &*self.hosts)
    }
}

/// Runs the `EHLO` / `MAIL FROM` / `RCPT TO` handshake against the preferred
/// hosts in `records`, one attempt per host, and never sends `DATA`.
///
/// Every failure (refusal, timeout, greylisting, garbage replies) is folded
/// into the returned [`ProbeReport`]; this function does not fail.
pub fn probe_mailbox(
    target: &ProbeTarget<'_>,
    records: &[MxRecord],
    options: &SmtpProbeOptions,
    hosts: &dyn LookupHost,
) -> ProbeReport {
    let mut attempts = Vec::new();
    for record in records.iter().take(options.max_servers.max(1)) {
        let attempt = probe_server(target, options, hosts, record);
        log_debug!(
            "smtp probe {} via {}: {:?}",
            target.address(),
            attempt.exchange,
            attempt.outcome
        );
        for event in &attempt.events {
            log_debug!("  [{}] {}", attempt.exchange, event);
        }
        let done = attempt.outcome.is_final();
        attempts.push(attempt);
        if done {
            break;
        }
    }

    let verdict = if attempts.is_empty() {
        ProbeVerdict::NoMailServer
    } else {
        aggregate_verdict(&attempts)
    };
    ProbeReport { verdict, attempts }
}

fn probe_server(
    target: &ProbeTarget<'_>,
    options: &SmtpProbeOptions,
    hosts: &dyn LookupHost,
    record: &MxRecord,
) -> ServerAttempt {
    let mut attempt = ServerAttempt::new(record.exchange.clone());

    let addrs = match resolve_socket_addrs(hosts, &record.exchange, options.port, options.allow_ipv6)
    {
        Ok(addrs) if !addrs.is_empty() => addrs,
        Ok(_) => {
            attempt.outcome = Unreachable {
                message: "no socket addresses resolved".to_string(),
            };
            return attempt;
        }
        Err(err) => {
            attempt.events.push(Event::Error {
                stage: Stage::Connect,
                message: err.to_string(),
            });
            attempt.outcome = Unreachable {
                message: "failed to resolve socket address".to_string(),
            };
            return attempt;
        }
    };

    let mut session = match SmtpSession::connect(
        &record.exchange,
        &addrs,
        options.connect_timeout,
        options.command_timeout,
    ) {
        Ok(session) => session,
        Err(err) => {
            attempt.events.push(Event::Error {
                stage: Stage::Connect,
                message: err.to_string(),
            });
            attempt.outcome = Unreachable {
                message: "connection attempt failed".to_string(),
            };
            return attempt;
        }
    };
    attempt.address = Some(session.peer().to_string());

    attempt.outcome = match run_dialogue(&mut session, &mut attempt.events, target, options) {
        Ok(outcome) => outcome,
        Err(err) if err.is_timeout() => Unreachable {
            message: "server stopped answering".to_string(),
        },
        Err(err) => ProtocolError {
            message: err.to_string(),
        },
    };

    // a server that stopped answering would only burn another timeout on QUIT
    if matches!(attempt.outcome, Unreachable { .. }) {
        return attempt;
    }
    // best effort: the verdict is already known
    if !matches!(attempt.outcome, ProtocolError { .. }) {
        let _ = command(&mut session, &mut attempt.events, Stage::Rset, "RSET");
    }
    let _ = command(&mut session, &mut attempt.events, Stage::Quit, "QUIT");
    attempt
}

fn run_dialogue(
    session: &mut SmtpSession,
    events: &mut Vec<Event>,
    target: &ProbeTarget<'_>,
    options: &SmtpProbeOptions,
) -> Result<AttemptOutcome, SmtpVerifyError> {
    let greeting = read(session, events, Stage::Greeting)?;
    if !greeting.is_positive_completion() {
        return Ok(ProtocolError {
            message: format!("unexpected greeting: {}", greeting.code),
        });
    }

    let helo = options.helo_name();
    let ehlo = command(session, events, Stage::Ehlo, &format!("EHLO {helo}"))?;
    if !ehlo.is_positive_completion() {
        let fallback = command(session, events, Stage::Helo, &format!("HELO {helo}"))?;
        if !fallback.is_positive_completion() {
            return Ok(ProtocolError {
                message: format!("HELO rejected: {}", fallback.code),
            });
        }
    }

    let mail_from = format!(
        "MAIL FROM:<{}>",
        options.envelope_sender(target.ascii_domain)
    );
    let mail_reply = command(session, events, Stage::MailFrom, &mail_from)?;
    if mail_reply.is_transient_failure() {
        return Ok(TemporaryFailure { reply: mail_reply });
    }
    if !mail_reply.is_positive_completion() {
        return Ok(SenderRefused { reply: mail_reply });
    }

    let rcpt_cmd = format!("RCPT TO:<{}>", target.address());
    let rcpt_reply = command(session, events, Stage::RcptTo, &rcpt_cmd)?;
    Ok(classify_rcpt(rcpt_reply))
}

fn classify_rcpt(reply: SmtpReply) -> AttemptOutcome {
    if reply.is_positive_completion() {
        Accepted { reply }
    } else if reply.is_transient_failure() {
        TemporaryFailure { reply }
    } else if reply.is_permanent_failure() {
        Rejected { reply }
    } else {
        ProtocolError {
            message: format!("unexpected RCPT TO reply: {}", reply.code),
        }
    }
}

fn read(
    session: &mut SmtpSession,
    events: &mut Vec<Event>,
    stage: Stage,
) -> Result<SmtpReply, SmtpVerifyError> {
    match session.read_reply() {
        Ok(reply) => {
            events.push(Event::Received {
                stage,
                reply: reply.clone(),
            });
            Ok(reply)
        }
        Err(err) => {
            events.push(Event::Error {
                stage,
                message: err.to_string(),
            });
            Err(err)
        }
    }
}

fn command(
    session: &mut SmtpSession,
    events: &mut Vec<Event>,
    stage: Stage,
    line: &str,
) -> Result<SmtpReply, SmtpVerifyError> {
    events.push(Event::Sent {
        stage,
        command: line.to_string(),
    });
    if let Err(err) = session.send_command(line) {
        events.push(Event::Error {
            stage,
            message: err.to_string(),
        });
        return Err(err);
    }
    read(session, events, stage)
}

fn resolve_socket_addrs(
    hosts: &dyn LookupHost,
    exchange: &str,
    port: u16,
    allow_ipv6: bool,
) -> Result<Vec<SocketAddr>, ResolveError> {
    let ips = resolve_host(hosts, exchange)?;
    Ok(ips
        .into_iter()
        .filter(|ip| allow_ipv6 || ip.is_ipv4())
        .map(|ip| SocketAddr::new(ip, port))
        .collect())
}

fn aggregate_verdict(attempts: &[ServerAttempt]) -> ProbeVerdict {
    if attempts.iter().any(|attempt| attempt.outcome.is_success()) {
        return ProbeVerdict::Accepted;
    }

    if let Some(rejected) = attempts.iter().find_map(|a| match &a.outcome {
        Rejected { reply } => Some(reply),
        _ => None,
    }) {
        return ProbeVerdict::Rejected {
            code: rejected.code,
            message: rejected.message.clone(),
        };
    }

    if let Some(temp) = attempts.iter().find_map(|a| match &a.outcome {
        TemporaryFailure { reply } => Some(reply),
        _ => None,
    }) {
        return ProbeVerdict::TemporaryFailure {
            code: temp.code,
            message: temp.message.clone(),
        };
    }

    if attempts
        .iter()
        .all(|a| matches!(a.outcome, Unreachable { .. }))
    {
        return ProbeVerdict::Unreachable;
    }

    ProbeVerdict::Inconclusive
}
