//! Pattern driven authoritative DNS server.
//!
//! Switch DNS answers for one owned domain (e.g. `rebind.example.com`) and all of its
//! subdomains. Answers aren't looked up in a zone, they are derived from the shape of the
//! queried name. Queries outside the owned domain get `SERVFAIL`.
//!
//! The examples below assume the config:
//! ```json
//! {
//!   "domain": "rebind.example.com",
//!   "ip": "192.0.2.1",
//!   "ttl": 1800,
//!   "txt": "hello"
//! }
//! ```
//!
//! # TXT
//!
//! Any `TXT` query, in the owned domain or not, is answered with the configured `txt` content.
//! Without `txt` the answer is empty.
//!
//! # A
//!
//! Only `A` queries are resolved by pattern, other record types in the owned domain get an
//! empty `NOERROR` answer. The owned domain itself resolves to the configured `ip`.
//!
//! ## Literal IPs
//!
//! A name embedding a dotted-decimal IPv4 address resolves to it:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 +short www.10.1.2.3.rebind.example.com
//! 10.1.2.3
//! ```
//!
//! An embedded group that isn't a valid address (`1.2.3.456`) gets `NXDOMAIN`.
//!
//! ## Localhost
//!
//! `localhost`, optionally preceded by labels and suffixed with `-anything`, resolves to
//! `127.0.0.1`, e.g. `foo.localhost-bar.rebind.example.com`.
//!
//! ## Redirects
//!
//! `<target>.goto` (or `<target>.goto-anything`) is answered with a `CNAME` to `<target>.`:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 www.example.com.goto.rebind.example.com
//! www.example.com.goto.rebind.example.com. 1800 IN CNAME www.example.com.
//! ```
//!
//! ## Rebinding
//!
//! A client picks a secret of 40 lowercase hex digits and publishes an address under it:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 10.0.0.1.<secret>.switch.rebind.example.com
//! ;; ->>HEADER<<- opcode: QUERY, status: NXDOMAIN
//! ```
//!
//! The publish is always answered `NXDOMAIN`. Afterwards `<key>.switch.rebind.example.com`
//! resolves to `10.0.0.1` with a TTL of 0, where `<key>` is the hex SHA-1 of the secret (see
//! [`rebind_key`][crate::rebind_store::rebind_key]). Unknown keys get `NXDOMAIN`.
//!
//! ## Everything else
//!
//! Resolves to the configured `ip`.

pub mod dispatch;
mod handlers;
pub mod pattern;
pub mod reply;
pub mod server;

pub use dispatch::{Dispatcher, Question};
pub use handlers::Handler;
pub use reply::Reply;
pub use server::new;
