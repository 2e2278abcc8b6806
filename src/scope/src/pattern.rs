//! Scope pattern kinds and compilation
//!
//! A pattern string is interpreted according to its [`PatternKind`]:
//! - `app.example.com` exact (case-insensitive)
//! - `.example.com` domain suffix (the domain itself or any subdomain)
//! - `10.0.0.0/8` CIDR membership
//! - `*.example.com` glob (`*` any run of characters, `?` one character)

use posture_core::Asset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while compiling a pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Empty pattern string provided
    #[error("Pattern cannot be empty")]
    Empty,

    /// Network address or prefix could not be parsed
    #[error("Invalid CIDR '{0}': {1}")]
    InvalidCidr(String, String),

    /// Domain suffix contains characters a hostname cannot
    #[error("Invalid domain suffix '{0}'")]
    InvalidDomain(String),

    /// Glob could not be translated to a regular expression
    #[error("Invalid glob '{0}': {1}")]
    InvalidGlob(String, String),
}

/// How a rule's pattern string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Inferred from the pattern text
    #[default]
    Auto,
    Exact,
    DomainSuffix,
    Cidr,
    Glob,
}

impl PatternKind {
    /// Infers a concrete kind from pattern text
    ///
    /// Contains `*` or `?` → glob, otherwise contains `/` → CIDR, leading
    /// `.` → domain suffix, anything else → exact.
    pub fn infer(pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern.contains('*') || pattern.contains('?') {
            Self::Glob
        } else if pattern.contains('/') {
            Self::Cidr
        } else if pattern.starts_with('.') {
            Self::DomainSuffix
        } else {
            Self::Exact
        }
    }

    /// Resolves `Auto` against the pattern; concrete kinds are returned as-is
    pub fn resolve(self, pattern: &str) -> Self {
        match self {
            Self::Auto => Self::infer(pattern),
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Exact => "exact",
            Self::DomainSuffix => "domain_suffix",
            Self::Cidr => "cidr",
            Self::Glob => "glob",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An IPv4 or IPv6 network in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    network: IpAddr,
    prefix: u8,
}

impl IpNetwork {
    /// Parses `addr/prefix`; a bare address is a host network
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        let s = s.trim();
        let invalid = |msg: &str| PatternError::InvalidCidr(s.to_string(), msg.to_string());

        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let network: IpAddr = addr.trim().parse().map_err(|_| invalid("bad address"))?;
        let max = match network {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        let prefix = match prefix {
            Some(p) => p.trim().parse::<u8>().map_err(|_| invalid("bad prefix length"))?,
            None => max,
        };
        if prefix > max {
            return Err(invalid("prefix length out of range"));
        }

        Ok(Self { network, prefix })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Checks whether `addr` lies inside this network.
    ///
    /// Addresses of the other family never match.
    pub fn contains(&self, addr: &IpAddr) -> bool {
        match (self.network, addr) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = u32::MAX.checked_shl(32 - self.prefix as u32).unwrap_or(0);
                u32::from(net) & mask == u32::from(*ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = u128::MAX.checked_shl(128 - self.prefix as u32).unwrap_or(0);
                u128::from(net) & mask == u128::from(*ip) & mask
            }
            _ => false,
        }
    }
}

impl FromStr for IpNetwork {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// A pattern ready to be tested against assets
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Exact(String),
    DomainSuffix(String),
    Cidr(IpNetwork),
    Glob(Regex),
}

impl CompiledPattern {
    /// Compiles `pattern` as `kind` (`Auto` is inferred first)
    pub fn compile(pattern: &str, kind: PatternKind) -> Result<Self, PatternError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }

        match kind.resolve(trimmed) {
            PatternKind::Auto | PatternKind::Exact => Ok(Self::Exact(trimmed.to_lowercase())),
            PatternKind::DomainSuffix => {
                let domain = trimmed.trim_start_matches('.').trim_end_matches('.').to_lowercase();
                if domain.is_empty()
                    || domain.split('.').any(str::is_empty)
                    || domain.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '*' | '?'))
                {
                    return Err(PatternError::InvalidDomain(trimmed.to_string()));
                }
                Ok(Self::DomainSuffix(domain))
            }
            PatternKind::Cidr => IpNetwork::parse(trimmed).map(Self::Cidr),
            PatternKind::Glob => {
                let mut source = String::with_capacity(trimmed.len() + 8);
                source.push('^');
                for c in trimmed.to_lowercase().chars() {
                    match c {
                        '*' => source.push_str(".*"),
                        '?' => source.push('.'),
                        other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
                    }
                }
                source.push('$');
                Regex::new(&source)
                    .map(Self::Glob)
                    .map_err(|e| PatternError::InvalidGlob(trimmed.to_string(), e.to_string()))
            }
        }
    }

    /// The concrete kind this pattern was compiled as
    pub fn kind(&self) -> PatternKind {
        match self {
            Self::Exact(_) => PatternKind::Exact,
            Self::DomainSuffix(_) => PatternKind::DomainSuffix,
            Self::Cidr(_) => PatternKind::Cidr,
            Self::Glob(_) => PatternKind::Glob,
        }
    }

    /// Tests a lower-cased textual candidate. CIDR patterns never match text.
    pub fn matches_text(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(expected) => candidate == expected,
            Self::DomainSuffix(domain) => {
                candidate == domain
                    || candidate
                        .strip_suffix(domain.as_str())
                        .is_some_and(|head| head.ends_with('.'))
            }
            Self::Glob(regex) => regex.is_match(candidate),
            Self::Cidr(_) => false,
        }
    }

    /// Tests an address candidate. Only CIDR patterns match addresses.
    pub fn matches_address(&self, addr: &IpAddr) -> bool {
        match self {
            Self::Cidr(network) => network.contains(addr),
            _ => false,
        }
    }

    /// Tests every candidate the asset exposes for this pattern's kind
    pub fn matches(&self, asset: &Asset) -> bool {
        match self {
            Self::Cidr(_) => asset
                .address_candidates()
                .iter()
                .any(|addr| self.matches_address(addr)),
            _ => asset
                .text_candidates()
                .iter()
                .any(|candidate| self.matches_text(candidate)),
        }
    }
}
