//! Switch DNS
//!
//! An authoritative DNS server for a single domain that answers from patterns in the queried
//! name rather than from a zone file. Useful for testing: embed an IP in a hostname and get it
//! back, alias `localhost`, redirect with a `CNAME`, or flip a name between addresses for
//! [DNS rebinding] experiments.
//!
//! See [`dns`] for the supported name patterns.
//!
//! [DNS rebinding]: https://en.wikipedia.org/wiki/DNS_rebinding
//!
#![warn(clippy::pedantic)]

pub mod config;
pub mod dns;
pub mod error;
pub mod rebind_store;

pub use config::{Config, SharedConfig};
pub use dns::new as new_dns;
pub use rebind_store::{DynRebindStore, InMemoryRebindStore, RebindStore};
