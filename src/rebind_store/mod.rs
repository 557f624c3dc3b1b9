//! Rebind key/address storage.
//!
//! Supports a generic interface for publishing an IPv4 address under a key derived from a
//! client-chosen secret, and for resolving that key back to the published address from any
//! other query.
//!
//! Keys are the lowercase hex encoding of the SHA-1 digest of the secret, see [`rebind_key`].
//! Publishing always hashes; looking up never does. A client that publishes with secret `S`
//! therefore reads the address back at `hex(sha1(S))`, which nobody can forge without `S`.
//!
//! One implementation is provided, [`memory::InMemoryRebindStore`]. It isn't durable across
//! restarts, entries are short-lived testing aids.

use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::net::Ipv4Addr;
use std::sync::Arc;

pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryRebindStore;

/// `DynRebindStore` is a type alias for a [`RebindStore`] shared between every concurrently
/// handled query. Implementations do their own locking, hence the `Send + Sync` supertraits.
#[allow(clippy::module_name_repetitions)]
pub type DynRebindStore = Arc<dyn RebindStore>;

/// Length in characters of a hex encoded rebind key.
pub const KEY_LEN: usize = 40;

/// Whether lookups honour the expiration recorded on each entry.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Entries are absent once their expiration has passed.
    #[default]
    Enforce,
    /// Entries resolve for the life of the process.
    Ignore,
}

/// A trait describing the shared table behind `switch` queries.
///
/// Operations never block for longer than one table mutation and never perform IO, so they
/// are safe to call straight from a query handler.
pub trait RebindStore: Send + Sync {
    /// Publish `address` under [`rebind_key(secret)`][rebind_key], replacing any prior entry.
    ///
    /// An `address` that doesn't parse as IPv4 is stored as absent rather than failing, so a
    /// later lookup of that key reports nothing.
    fn publish(&self, secret: &str, address: &str);

    /// Get the address stored under the exact `key` (if any).
    fn lookup(&self, key: &str) -> Option<Ipv4Addr>;
}

/// Derive the 40 character rebind key for a secret.
#[must_use]
pub fn rebind_key(secret: &str) -> String {
    hex::encode(Sha1::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebind_key_is_lowercase_sha1_hex() {
        assert_eq!(rebind_key(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(rebind_key("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(rebind_key("anything").len(), KEY_LEN);
    }
}
