use crate::rebind_store::{rebind_key, ExpiryPolicy, RebindStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use time::{Duration, OffsetDateTime};

/// How long a published entry stays resolvable under [`ExpiryPolicy::Enforce`].
pub const ENTRY_LIFETIME: Duration = Duration::hours(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RebindEntry {
    address: Option<Ipv4Addr>,
    expiration: OffsetDateTime,
}

/// A process-local implementation of the rebind table.
///
/// Any number of lookups proceed together, a publish holds the write lock only for its single
/// map insert.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct InMemoryRebindStore {
    entries: RwLock<HashMap<String, RebindEntry>>,
    policy: ExpiryPolicy,
}

impl InMemoryRebindStore {
    #[must_use]
    pub fn new(policy: ExpiryPolicy) -> Self {
        InMemoryRebindStore {
            entries: RwLock::default(),
            policy,
        }
    }

    /// Like [`RebindStore::publish`], stamping the entry relative to `now`.
    pub fn publish_at(&self, secret: &str, address: &str, now: OffsetDateTime) {
        let key = rebind_key(secret);
        let entry = RebindEntry {
            address: address.parse().ok(),
            expiration: now + ENTRY_LIFETIME,
        };
        self.entries.write().insert(key, entry);
    }

    /// Like [`RebindStore::lookup`], judging expiry relative to `now`.
    pub fn lookup_at(&self, key: &str, now: OffsetDateTime) -> Option<Ipv4Addr> {
        let entry = *self.entries.read().get(key)?;
        if self.policy == ExpiryPolicy::Enforce && now >= entry.expiration {
            return None;
        }
        entry.address
    }

    /// Number of entries held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RebindStore for InMemoryRebindStore {
    fn publish(&self, secret: &str, address: &str) {
        self.publish_at(secret, address, OffsetDateTime::now_utc());
    }

    fn lookup(&self, key: &str) -> Option<Ipv4Addr> {
        self.lookup_at(key, OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    const SECRET: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn publish_then_lookup_by_hashed_key() {
        let store = InMemoryRebindStore::default();
        store.publish(SECRET, "1.2.3.4");

        assert_eq!(
            store.lookup(&rebind_key(SECRET)),
            Some(Ipv4Addr::new(1, 2, 3, 4))
        );
        // The secret itself isn't a key.
        assert_eq!(store.lookup(SECRET), None);
    }

    #[test]
    fn unknown_key_is_absent() {
        let store = InMemoryRebindStore::default();
        assert!(store.is_empty());
        assert_eq!(store.lookup(&rebind_key("never published")), None);
    }

    #[test]
    fn publish_overwrites() {
        let store = InMemoryRebindStore::default();
        store.publish(SECRET, "1.2.3.4");
        store.publish(SECRET, "5.6.7.8");

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.lookup(&rebind_key(SECRET)),
            Some(Ipv4Addr::new(5, 6, 7, 8))
        );
    }

    #[test]
    fn unparseable_address_is_stored_as_absent() {
        let store = InMemoryRebindStore::default();
        store.publish(SECRET, "1.2.3.4");
        store.publish(SECRET, "999.2.3.4");

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup(&rebind_key(SECRET)), None);
    }

    #[test]
    fn enforced_expiry() {
        let store = InMemoryRebindStore::new(ExpiryPolicy::Enforce);
        let published = OffsetDateTime::now_utc();
        let key = rebind_key(SECRET);
        store.publish_at(SECRET, "1.2.3.4", published);

        let just_before = published + ENTRY_LIFETIME - Duration::seconds(1);
        assert_eq!(
            store.lookup_at(&key, just_before),
            Some(Ipv4Addr::new(1, 2, 3, 4))
        );
        assert_eq!(store.lookup_at(&key, published + ENTRY_LIFETIME), None);

        // Republishing revives the key.
        let later = published + ENTRY_LIFETIME + Duration::hours(1);
        store.publish_at(SECRET, "1.2.3.4", later);
        assert_eq!(
            store.lookup_at(&key, later + Duration::hours(1)),
            Some(Ipv4Addr::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn ignored_expiry() {
        let store = InMemoryRebindStore::new(ExpiryPolicy::Ignore);
        let published = OffsetDateTime::now_utc();
        store.publish_at(SECRET, "1.2.3.4", published);

        assert_eq!(
            store.lookup_at(&rebind_key(SECRET), published + Duration::days(30)),
            Some(Ipv4Addr::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn concurrent_publishers_and_readers() {
        const PUBLISHERS: usize = 8;
        const READERS: usize = 4;
        const ROUNDS: u8 = 200;

        let store = InMemoryRebindStore::default();
        let watched_secret = "watched";
        let watched_key = rebind_key(watched_secret);
        let watched_addrs = [Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)];
        store.publish(watched_secret, "10.0.0.1");

        let start = Barrier::new(PUBLISHERS + READERS + 1);
        thread::scope(|s| {
            for p in 0..PUBLISHERS {
                let (store, start) = (&store, &start);
                s.spawn(move || {
                    start.wait();
                    for round in 0..ROUNDS {
                        store.publish(&format!("publisher-{p}"), &format!("192.0.2.{round}"));
                    }
                });
            }
            for _ in 0..READERS {
                let (store, start, watched_key) = (&store, &start, &watched_key);
                s.spawn(move || {
                    start.wait();
                    for _ in 0..ROUNDS {
                        let seen = store.lookup(watched_key);
                        assert!(
                            seen.map_or(false, |ip| watched_addrs.contains(&ip)),
                            "reader saw {seen:?}"
                        );
                    }
                });
            }
            let (store, start) = (&store, &start);
            s.spawn(move || {
                start.wait();
                for round in 0..ROUNDS {
                    let last = if round % 2 == 0 { "10.0.0.2" } else { "10.0.0.1" };
                    store.publish(watched_secret, last);
                }
            });
        });

        assert_eq!(store.len(), PUBLISHERS + 1);
        for p in 0..PUBLISHERS {
            assert_eq!(
                store.lookup(&rebind_key(&format!("publisher-{p}"))),
                Some(Ipv4Addr::new(192, 0, 2, ROUNDS - 1))
            );
        }
    }
}
