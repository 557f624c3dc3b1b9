//! Error types.

use trust_dns_proto::error::ProtoError;

/// Error enumerates the possible Switch DNS error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the configured owned domain is empty (or only a root `.`).
    #[error("domain required but not specified")]
    EmptyDomain,

    /// Returned when the configured owned domain isn't a syntactically valid DNS name.
    #[error("invalid domain {0:?}: {1}")]
    InvalidDomain(String, ProtoError),

    /// Returned when the configured default address can't be parsed as an IPv4 address.
    ///
    /// Every positive answer is an `A` record, so IPv6 addresses are rejected too.
    #[error("could not parse IP: {0:?}")]
    InvalidAddress(String),

    /// Returned when the dispatcher panics while handling a single query. The query is dropped
    /// without a response.
    #[error("panicked while serving DNS response: {0}")]
    HandlerPanic(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [loading a `Config`][crate::config::Config::try_from_file] fails due to
    /// invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when the Switch DNS server encounters a generic DNS protocol error.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),
}
