use crate::error::Error;
use crate::rebind_store::ExpiryPolicy;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use trust_dns_proto::rr::Name;

pub type SharedConfig = Arc<Config>;

pub const DEFAULT_TTL: u32 = 1800;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:53";

/// Process-wide server settings. Built once before the listener starts and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The owned domain, lowercase and dot-terminated (e.g. `rebind.example.com.`).
    pub domain: String,
    pub address: Ipv4Addr,
    pub ttl: u32,
    pub bind_addr: SocketAddr,
    pub txt: Option<String>,
    pub expiry: ExpiryPolicy,
}

/// On-disk JSON form of a [`Config`], validated by [`Config::try_from_file`].
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    domain: String,
    ip: String,
    #[serde(default = "default_ttl")]
    ttl: u32,
    #[serde(default = "default_bind_addr")]
    addr: SocketAddr,
    #[serde(default)]
    txt: Option<String>,
    #[serde(default)]
    expiry: ExpiryPolicy,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 53))
}

impl Config {
    /// Build a validated `Config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDomain`] or [`Error::InvalidDomain`] if `domain` can't be used as
    /// the owned domain, and [`Error::InvalidAddress`] if `address` isn't an IPv4 address.
    pub fn new(
        domain: &str,
        address: &str,
        ttl: u32,
        bind_addr: SocketAddr,
        txt: Option<String>,
        expiry: ExpiryPolicy,
    ) -> Result<Self, Error> {
        Ok(Config {
            domain: normalize_domain(domain)?,
            address: address
                .parse()
                .map_err(|_| Error::InvalidAddress(address.to_string()))?,
            ttl,
            bind_addr,
            txt,
            expiry,
        })
    }

    /// Load and validate a `Config` from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the file can't be read, [`Error::InvalidJSON`] if it doesn't
    /// hold a config document, and the validation errors of [`Config::new`].
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let raw: ConfigFile = serde_json::from_reader(reader)?;
        Self::new(
            &raw.domain,
            &raw.ip,
            raw.ttl,
            raw.addr,
            raw.txt,
            raw.expiry,
        )
    }
}

fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    let fqdn = format!("{}.", trimmed.to_ascii_lowercase());
    // Only used for its label validation.
    Name::from_ascii(&fqdn).map_err(|err| Error::InvalidDomain(domain.to_string(), err))?;
    Ok(fqdn)
}
