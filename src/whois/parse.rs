use std::sync::LazyLock;

use regex::Regex;

use super::types::DomainInfo;

static RE_REFER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:refer|whois)\s*:\s*(\S+)\s*$").expect("valid refer regex")
});
static RE_REGISTRAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:registrar|sponsoring registrar|registrar name)\s*:\s*(\S.*?)\s*$")
        .expect("valid registrar regex")
});
static RE_WHOIS_SERVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:registrar whois server|whois server)\s*:\s*(\S+)\s*$")
        .expect("valid whois server regex")
});
static RE_COUNTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:registrant country|registrant country code|country)\s*:\s*(\S.*?)\s*$")
        .expect("valid country regex")
});
static RE_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^\s*(?:%+\s*)?(?:no match for|not found|no data found|no entries found|domain not found|no object found|status:\s*free)\b",
    )
    .expect("valid not-found regex")
});

/// Server named by a `refer:`/`whois:` line (IANA style).
pub(crate) fn referral_server(response: &str) -> Option<String> {
    RE_REFER
        .captures(response)
        .and_then(|c| c.get(1))
        .and_then(|m| clean_server(m.as_str()))
}

pub(crate) fn is_not_found(response: &str) -> bool {
    RE_NOT_FOUND.is_match(response)
}

pub(crate) fn parse_domain_info(response: &str) -> DomainInfo {
    DomainInfo {
        registrar: first_value(&RE_REGISTRAR, response),
        whois_server: RE_WHOIS_SERVER
            .captures(response)
            .and_then(|c| c.get(1))
            .and_then(|m| clean_server(m.as_str())),
        country: first_value(&RE_COUNTRY, response),
    }
}

fn first_value(re: &Regex, response: &str) -> Option<String> {
    re.captures_iter(response)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Lower-cases a server name and strips `whois://` or `rwhois://` prefixes,
/// ports and trailing slashes.
pub(crate) fn clean_server(raw: &str) -> Option<String> {
    let mut server = raw.trim().to_ascii_lowercase();
    if let Some(idx) = server.find("://") {
        server = server[idx + 3..].to_string();
    }
    let server = server
        .trim_end_matches('/')
        .split(':')
        .next()
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_string();
    let plausible = server.contains('.')
        && server
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    plausible.then_some(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IANA_COM: &str = "\
% IANA WHOIS server
% for more information on IANA, visit http://www.iana.org

refer:        whois.verisign-grs.com

domain:       COM

organisation: VeriSign Global Registry Services
whois:        whois.verisign-grs.com
";

    const VERISIGN_EXAMPLE: &str = "\
   Domain Name: EXAMPLE.COM
   Registry Domain ID: 2336799_DOMAIN_COM-VRSN
   Registrar WHOIS Server: whois.iana.org
   Registrar URL: http://res-dom.iana.org
   Updated Date: 2024-08-14T07:01:34Z
   Registrar: RESERVED-Internet Assigned Numbers Authority
   Registrar IANA ID: 376
";

    const REGISTRAR_REPLY: &str = "\
Domain Name: example.com
Registrar WHOIS Server: whois.markmonitor.com
Registrar: MarkMonitor, Inc.
Registrant Organization: Example Org
Registrant State/Province: CA
Registrant Country: US
";

    #[test]
    fn iana_referral() {
        assert_eq!(
            referral_server(IANA_COM).as_deref(),
            Some("whois.verisign-grs.com")
        );
    }

    #[test]
    fn registry_fields() {
        let info = parse_domain_info(VERISIGN_EXAMPLE);
        assert_eq!(
            info.registrar.as_deref(),
            Some("RESERVED-Internet Assigned Numbers Authority")
        );
        assert_eq!(info.whois_server.as_deref(), Some("whois.iana.org"));
        assert_eq!(info.country, None);
    }

    #[test]
    fn registrar_fields() {
        let info = parse_domain_info(REGISTRAR_REPLY);
        assert_eq!(info.registrar.as_deref(), Some("MarkMonitor, Inc."));
        assert_eq!(info.whois_server.as_deref(), Some("whois.markmonitor.com"));
        assert_eq!(info.country.as_deref(), Some("US"));
    }

    #[test]
    fn registrar_line_does_not_swallow_other_keys() {
        let info = parse_domain_info("Registrar URL: http://x.test\nRegistrar IANA ID: 1\n");
        assert!(info.registrar.is_none());
    }

    #[test]
    fn not_found_markers() {
        assert!(is_not_found("No match for \"NOPE-NOPE.COM\".\r\n>>> Last update"));
        assert!(is_not_found("% No entries found for the selected source(s)."));
        assert!(is_not_found("Domain not found.\n"));
        assert!(!is_not_found(VERISIGN_EXAMPLE));
    }

    #[test]
    fn clean_server_variants() {
        assert_eq!(
            clean_server("whois://Whois.Example.NET/").as_deref(),
            Some("whois.example.net")
        );
        assert_eq!(
            clean_server("rwhois.example.net:4321").as_deref(),
            Some("rwhois.example.net")
        );
        assert_eq!(clean_server("N/A"), None);
        assert_eq!(clean_server(""), None);
    }
}
