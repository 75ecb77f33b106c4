use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use mailverdict_lib::{
    DisposableDomains, MxOptions, ReferenceDomains, SmtpProbeOptions, SuggestOptions,
    ValidationMode, Verifier, WhoisOptions,
};

#[derive(Parser)]
#[command(
    name = "mailverdict-cli",
    version,
    about = "Checks whether email addresses are likely deliverable"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// read addresses from stdin (one per line)
    #[arg(long, global = true)]
    pub stdin: bool,

    /// write the report to a file (json/ndjson/csv)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// syntax mode: strict|relaxed
    #[arg(long, global = true, default_value = "strict")]
    pub mode: String,

    /// name announced in EHLO/HELO
    #[arg(long, global = true, env = "MAILVERDICT_HELO", default_value = "localhost")]
    pub helo: String,

    /// envelope sender for MAIL FROM (default postmaster@<domain>)
    #[arg(long = "from", global = true, env = "MAILVERDICT_FROM")]
    pub mail_from: Option<String>,

    #[arg(long = "smtp-port", global = true, default_value_t = 25)]
    pub smtp_port: u16,

    #[arg(long = "connect-timeout-ms", global = true, default_value_t = 5_000)]
    pub connect_timeout_ms: u64,

    #[arg(long = "command-timeout-ms", global = true, default_value_t = 5_000)]
    pub command_timeout_ms: u64,

    /// MX hosts probed per address
    #[arg(long = "max-mx", global = true, default_value_t = 3)]
    pub max_mx: usize,

    /// also probe IPv6 addresses of MX hosts
    #[arg(long, global = true)]
    pub ipv6: bool,

    #[arg(long = "dns-timeout-ms", global = true, default_value_t = 5_000)]
    pub dns_timeout_ms: u64,

    #[arg(long = "whois-timeout-ms", global = true, default_value_t = 8_000)]
    pub whois_timeout_ms: u64,

    /// skip the WHOIS lookup
    #[arg(long = "no-whois", global = true)]
    pub no_whois: bool,

    /// skip the SMTP probe (the verdict then ignores it)
    #[arg(long = "no-smtp", global = true)]
    pub no_smtp: bool,

    /// extra disposable domains, one per line
    #[arg(long = "disposable-list", global = true)]
    pub disposable_list: Option<PathBuf>,

    /// use only --disposable-list, not the built-in set
    #[arg(long = "replace-disposable", global = true, requires = "disposable_list")]
    pub replace_disposable: bool,

    /// popular domains used for typo suggestions, one per line
    #[arg(long = "domains-list", global = true)]
    pub domains_list: Option<PathBuf>,

    /// number of suggested domains
    #[arg(long, global = true, default_value_t = 3)]
    pub suggestions: usize,

    /// concurrent verifications in bulk and stdin mode
    #[arg(long, global = true, default_value_t = 4)]
    pub jobs: usize,

    /// include MX/SMTP/WHOIS diagnostics in the report
    #[arg(long, global = true)]
    pub diagnostics: bool,

    /// -v info, -vv debug (RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// verify one address
    Check { email: String },
    /// verify every address of a .csv or .txt file
    Bulk { file: PathBuf },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn parsed_mode(&self) -> Result<ValidationMode> {
        mode_from_str(&self.mode)
    }

    pub fn build_verifier(&self) -> Result<Verifier> {
        let smtp = SmtpProbeOptions {
            port: self.smtp_port,
            helo_domain: self.helo.clone(),
            envelope_sender: self.mail_from.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            command_timeout: Duration::from_millis(self.command_timeout_ms),
            max_servers: self.max_mx.max(1),
            allow_ipv6: self.ipv6,
        };
        let mx = MxOptions::default().with_timeout(Duration::from_millis(self.dns_timeout_ms));
        let total = Duration::from_millis(self.whois_timeout_ms);
        let whois = WhoisOptions {
            query_timeout: total,
            total_timeout: total,
            ..WhoisOptions::default()
        };
        let suggest = SuggestOptions {
            limit: self.suggestions,
            ..SuggestOptions::default()
        };

        let verifier = Verifier::builder()
            .mode(self.parsed_mode()?)
            .mx_options(mx)
            .smtp_options(smtp)
            .whois_options(whois)
            .suggest_options(suggest)
            .smtp_probe(!self.no_smtp)
            .whois_enabled(!self.no_whois)
            .diagnostics(self.diagnostics)
            .disposable(self.disposable_domains()?)
            .reference(self.reference_domains()?)
            .build()
            .context("initialise verifier")?;
        Ok(verifier)
    }

    fn disposable_domains(&self) -> Result<DisposableDomains> {
        let Some(path) = &self.disposable_list else {
            return Ok(DisposableDomains::builtin());
        };
        if self.replace_disposable {
            return DisposableDomains::from_path(path)
                .with_context(|| format!("load {}", path.display()));
        }
        let mut domains = DisposableDomains::builtin();
        let added = domains
            .extend_from_path(path)
            .with_context(|| format!("load {}", path.display()))?;
        #[cfg(feature = "with-tracing")]
        tracing::debug!("{added} disposable domains added from {}", path.display());
        #[cfg(not(feature = "with-tracing"))]
        let _ = added;
        Ok(domains)
    }

    fn reference_domains(&self) -> Result<ReferenceDomains> {
        match &self.domains_list {
            Some(path) => ReferenceDomains::from_path(path)
                .with_context(|| format!("load {}", path.display())),
            None => Ok(ReferenceDomains::builtin()),
        }
    }
}

pub fn mode_from_str(s: &str) -> Result<ValidationMode> {
    match s {
        "strict" => Ok(ValidationMode::Strict),
        "relaxed" => Ok(ValidationMode::Relaxed),
        other => bail!("unknown --mode '{other}', use: strict|relaxed"),
    }
}
