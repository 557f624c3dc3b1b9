//! Response shapes produced by the dispatcher, independent of how they are sent.

use std::fmt;
use std::net::Ipv4Addr;
use trust_dns_proto::op::ResponseCode;
use trust_dns_proto::rr::rdata::TXT;
use trust_dns_proto::rr::{Name, RData, Record};

/// One outbound answer for one inbound query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A single `A` record.
    Address { name: Name, ip: Ipv4Addr, ttl: u32 },
    /// A single `CNAME` record.
    Alias { name: Name, target: Name, ttl: u32 },
    /// A single `TXT` record holding one character-string.
    Text { name: Name, content: String, ttl: u32 },
    /// `NOERROR` without answers.
    Empty { name: Name },
    /// A failure response code without answers. `name` is absent when the query didn't carry
    /// exactly one question.
    Error {
        name: Option<Name>,
        code: ResponseCode,
    },
}

impl Reply {
    pub(crate) fn server_failure(name: Option<Name>) -> Self {
        Reply::Error {
            name,
            code: ResponseCode::ServFail,
        }
    }

    pub(crate) fn name_error(name: Name) -> Self {
        Reply::Error {
            name: Some(name),
            code: ResponseCode::NXDomain,
        }
    }

    #[must_use]
    pub fn response_code(&self) -> ResponseCode {
        match self {
            Reply::Error { code, .. } => *code,
            _ => ResponseCode::NoError,
        }
    }

    /// Server failures aren't authoritative, everything else is answered as the zone owner.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.response_code() != ResponseCode::ServFail
    }

    /// Records for the answer section.
    #[must_use]
    pub fn answers(&self) -> Vec<Record> {
        let (name, ttl, rdata) = match self {
            Reply::Address { name, ip, ttl } => (name, *ttl, RData::A(*ip)),
            Reply::Alias { name, target, ttl } => (name, *ttl, RData::CNAME(target.clone())),
            Reply::Text { name, content, ttl } => {
                (name, *ttl, RData::TXT(TXT::new(vec![content.clone()])))
            }
            Reply::Empty { .. } | Reply::Error { .. } => return Vec::new(),
        };
        vec![Record::from_rdata(name.clone(), ttl, rdata)]
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Address { name, ip, ttl } => {
                write!(f, "A record: question={name} answer={ip} ttl={ttl}")
            }
            Reply::Alias { name, target, .. } => {
                write!(f, "CNAME record: question={name} answer={target}")
            }
            Reply::Text { name, .. } => write!(f, "TXT record: question={name}"),
            Reply::Empty { name } => write!(f, "empty record: question={name}"),
            Reply::Error {
                name: Some(name),
                code,
            } => write!(f, "error record: question={name} rcode={code}"),
            Reply::Error { name: None, code } => write!(f, "error record: question=? rcode={code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trust_dns_proto::rr::RecordType;

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    #[test]
    fn address_answer() {
        let reply = Reply::Address {
            name: name("1.2.3.4.rebind.test."),
            ip: Ipv4Addr::new(1, 2, 3, 4),
            ttl: 1800,
        };
        let answers = reply.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].record_type(), RecordType::A);
        assert_eq!(answers[0].ttl(), 1800);
        assert_eq!(answers[0].name(), &name("1.2.3.4.rebind.test."));
        assert_eq!(reply.response_code(), ResponseCode::NoError);
        assert!(reply.is_authoritative());
    }

    #[test]
    fn alias_answer() {
        let reply = Reply::Alias {
            name: name("a.b.goto.rebind.test."),
            target: name("a.b."),
            ttl: 60,
        };
        let answers = reply.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].record_type(), RecordType::CNAME);
        assert_eq!(answers[0].ttl(), 60);
    }

    #[test]
    fn text_answer() {
        let reply = Reply::Text {
            name: name("anything.example."),
            content: "hello".to_string(),
            ttl: 5,
        };
        let answers = reply.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].record_type(), RecordType::TXT);
    }

    #[test]
    fn empty_and_error_have_no_answers() {
        let empty = Reply::Empty {
            name: name("x.rebind.test."),
        };
        assert!(empty.answers().is_empty());
        assert_eq!(empty.response_code(), ResponseCode::NoError);

        let nxdomain = Reply::name_error(name("x.rebind.test."));
        assert!(nxdomain.answers().is_empty());
        assert_eq!(nxdomain.response_code(), ResponseCode::NXDomain);
        assert!(nxdomain.is_authoritative());

        let servfail = Reply::server_failure(None);
        assert!(servfail.answers().is_empty());
        assert_eq!(servfail.response_code(), ResponseCode::ServFail);
        assert!(!servfail.is_authoritative());
        assert_eq!(servfail.to_string(), format!("error record: question=? rcode={}", ResponseCode::ServFail));
    }
}
