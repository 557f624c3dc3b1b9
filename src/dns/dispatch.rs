//! Per-query entry point: question validation, name normalization, and the mapping from a
//! classified [`Action`] to a [`Reply`].

use crate::config::SharedConfig;
use crate::dns::pattern::{self, Action};
use crate::dns::reply::Reply;
use crate::error::Error;
use crate::rebind_store::DynRebindStore;
use std::net::Ipv4Addr;
use tracing::{debug, info};
use trust_dns_proto::rr::{Name, RecordType};

/// TTL of answers resolved from the rebind store, so resolvers ask again every time.
pub const REBIND_TTL: u32 = 0;

/// A question as received, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub query_type: RecordType,
}

/// Maps inbound questions to replies. Holds the only mutable state shared between queries,
/// the rebind store.
#[derive(Clone)]
pub struct Dispatcher {
    config: SharedConfig,
    rebind_store: DynRebindStore,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: SharedConfig, rebind_store: DynRebindStore) -> Self {
        Dispatcher {
            config,
            rebind_store,
        }
    }

    /// Answer one query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DNSError`] if a name in the reply can't be built. The caller is expected
    /// to drop the query.
    pub fn dispatch(&self, questions: &[Question]) -> Result<Reply, Error> {
        let [question] = questions else {
            debug!("got {} questions, expected 1", questions.len());
            return Ok(Reply::server_failure(None));
        };

        let mut name = question.name.to_ascii_lowercase();
        if !name.ends_with('.') {
            name.push('.');
        }
        let owner = Name::from_ascii(&name)?;

        if question.query_type == RecordType::TXT {
            return Ok(self.text_reply(owner));
        }

        let action = pattern::classify(&name, question.query_type, &self.config.domain);
        debug!(question = %name, ?action, "classified");
        self.synthesize(action, owner)
    }

    fn text_reply(&self, name: Name) -> Reply {
        match &self.config.txt {
            Some(content) => Reply::Text {
                name,
                content: content.clone(),
                ttl: self.config.ttl,
            },
            None => Reply::Empty { name },
        }
    }

    fn synthesize(&self, action: Action, name: Name) -> Result<Reply, Error> {
        let ttl = self.config.ttl;
        Ok(match action {
            Action::AnswerSelf | Action::Fallback => Reply::Address {
                name,
                ip: self.config.address,
                ttl,
            },
            Action::OutOfZone => Reply::server_failure(Some(name)),
            Action::NonAddressType => Reply::Empty { name },
            Action::LiteralIp(ip) => Reply::Address { name, ip, ttl },
            Action::InvalidAddress(text) => {
                debug!(question = %name, address = %text, "embedded address doesn't parse");
                Reply::name_error(name)
            }
            Action::Localhost => Reply::Address {
                name,
                ip: Ipv4Addr::LOCALHOST,
                ttl,
            },
            Action::Redirect(target) => Reply::Alias {
                name,
                target: Name::from_ascii(&target)?,
                ttl,
            },
            Action::RebindLookup(key) => {
                let ip = self.rebind_store.lookup(&key);
                info!(key = %key, ?ip, "rebind get");
                match ip {
                    Some(ip) => Reply::Address {
                        name,
                        ip,
                        ttl: REBIND_TTL,
                    },
                    None => Reply::name_error(name),
                }
            }
            Action::RebindPublish { address, secret } => {
                info!(key = %secret, ip = %address, "rebind set");
                self.rebind_store.publish(&secret, &address);
                Reply::name_error(name)
            }
        })
    }
}
