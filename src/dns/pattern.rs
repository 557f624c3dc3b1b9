//! Classification of query names into response actions.
//!
//! A query name is first checked against the owned domain, then the prefix left after removing
//! the domain is run through [`PREFIX_RULES`] in order. The first rule that matches decides the
//! action, anything unmatched falls back to the default address.

use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;
use trust_dns_proto::rr::RecordType;

/// What a single query asks the server to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The query is for the owned domain itself.
    AnswerSelf,
    /// The query isn't for the owned domain or one of its subdomains.
    OutOfZone,
    /// An in-zone query for something other than an `A` record.
    NonAddressType,
    /// The prefix embeds a dotted-decimal IPv4 address.
    LiteralIp(Ipv4Addr),
    /// The prefix embeds a dotted-decimal group that isn't a valid IPv4 address.
    InvalidAddress(String),
    /// The prefix is a `localhost` alias.
    Localhost,
    /// The prefix asks for a CNAME to the captured, dot-terminated, host.
    Redirect(String),
    /// The prefix asks for the address stored under a rebind key.
    RebindLookup(String),
    /// The prefix asks to store `address` under the key derived from `secret`.
    RebindPublish { address: String, secret: String },
    /// Nothing matched.
    Fallback,
}

type PrefixRule = fn(&str) -> Option<Action>;

/// Prefix rules in precedence order.
pub const PREFIX_RULES: [(&str, PrefixRule); 5] = [
    ("literal-ip", literal_ip as PrefixRule),
    ("localhost", localhost as PrefixRule),
    ("goto", redirect as PrefixRule),
    ("switch-get", rebind_lookup as PrefixRule),
    ("switch-set", rebind_publish as PrefixRule),
];

lazy_static! {
    static ref LITERAL_IP: Regex = Regex::new(concat!(
        r"^(?:[a-z0-9-]+\.)*",
        r"([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})",
        r"(?:\.[a-z0-9-]+)*$",
    ))
    .unwrap();
    static ref LOCALHOST: Regex =
        Regex::new(r"^(?:[a-z0-9-]+\.)*localhost(?:-[a-z0-9-]+)?$").unwrap();
    static ref REDIRECT: Regex =
        Regex::new(r"^((?:[a-z0-9-]+\.)+)goto(?:-[a-z0-9-]+)?$").unwrap();
    static ref REBIND_GET: Regex = Regex::new(r"^([0-9a-f]{40})\.switch$").unwrap();
    static ref REBIND_SET: Regex = Regex::new(concat!(
        r"^([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})",
        r"\.([0-9a-f]{40})\.switch$",
    ))
    .unwrap();
}

/// Classify a lowercase, dot-terminated query name against the owned `domain` (also lowercase
/// and dot-terminated).
#[must_use]
pub fn classify(name: &str, query_type: RecordType, domain: &str) -> Action {
    if name == domain {
        return Action::AnswerSelf;
    }
    let Some(prefix) = name
        .strip_suffix(domain)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return Action::OutOfZone;
    };
    if query_type != RecordType::A {
        return Action::NonAddressType;
    }
    classify_prefix(prefix)
}

/// Classify the in-zone prefix of a query name, e.g. `foo.1.2.3.4` for
/// `foo.1.2.3.4.rebind.example.com.`.
#[must_use]
pub fn classify_prefix(prefix: &str) -> Action {
    PREFIX_RULES
        .iter()
        .find_map(|(_, rule)| rule(prefix))
        .unwrap_or(Action::Fallback)
}

fn literal_ip(prefix: &str) -> Option<Action> {
    // Rebind publishes also embed an address; leave that exact shape to its own rule.
    if REBIND_SET.is_match(prefix) {
        return None;
    }
    let text = LITERAL_IP.captures(prefix)?.get(1)?.as_str();
    Some(match text.parse() {
        Ok(ip) => Action::LiteralIp(ip),
        Err(_) => Action::InvalidAddress(text.to_string()),
    })
}

fn localhost(prefix: &str) -> Option<Action> {
    LOCALHOST.is_match(prefix).then_some(Action::Localhost)
}

fn redirect(prefix: &str) -> Option<Action> {
    let target = REDIRECT.captures(prefix)?.get(1)?.as_str();
    Some(Action::Redirect(target.to_string()))
}

fn rebind_lookup(prefix: &str) -> Option<Action> {
    let key = REBIND_GET.captures(prefix)?.get(1)?.as_str();
    Some(Action::RebindLookup(key.to_string()))
}

fn rebind_publish(prefix: &str) -> Option<Action> {
    let captures = REBIND_SET.captures(prefix)?;
    Some(Action::RebindPublish {
        address: captures.get(1)?.as_str().to_string(),
        secret: captures.get(2)?.as_str().to_string(),
    })
}
