//! Target URL validation.
//!
//! # Responsibilities
//! - Parse candidate target strings as absolute URLs
//! - Accept only `http` and `https`
//! - Optionally restrict hosts to a fixed allow-list
//!
//! # Design Decisions
//! - `ValidatedUrl` can only be built here, so the prober never sees an
//!   unchecked string
//! - The original string is kept verbatim; no normalization
//! - The allow-list is owned by the validator, immutable after construction

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use url::{Host, Url};

/// Reason a target string was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlValidationError {
    #[error("malformed URL {url:?}: {reason}")]
    MalformedUrl { url: String, reason: String },
    #[error("unsupported URL scheme {scheme:?} in {url:?}")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("host {host:?} is not in the allow-list")]
    HostNotAllowed { url: String, host: String },
}

impl UrlValidationError {
    /// The rejected input string.
    pub fn url(&self) -> &str {
        match self {
            Self::MalformedUrl { url, .. }
            | Self::UnsupportedScheme { url, .. }
            | Self::HostNotAllowed { url, .. } => url,
        }
    }
}

/// A target that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    raw: String,
    parsed: Url,
}

impl ValidatedUrl {
    /// The string exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }

    /// Host component, lowercased by the parser.
    pub fn host(&self) -> &str {
        self.parsed.host_str().unwrap_or_default()
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Gatekeeper for every URL handed to the prober.
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    allow_list: Option<HashSet<String>>,
}

impl UrlValidator {
    /// Validator accepting any http(s) host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator in allow-list mode.
    ///
    /// Entries go through the same host parser as targets, so IDN entries
    /// compare in punycode form and case does not matter.
    pub fn with_allow_list<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allow_list = hosts
            .into_iter()
            .map(|h| normalize_host(h.as_ref()))
            .collect();
        Self {
            allow_list: Some(allow_list),
        }
    }

    /// Build from the optional configured list.
    pub fn from_config(allow_list: Option<&[String]>) -> Self {
        match allow_list {
            Some(hosts) => Self::with_allow_list(hosts),
            None => Self::new(),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.allow_list.is_some()
    }

    pub fn validate(&self, raw: &str) -> Result<ValidatedUrl, UrlValidationError> {
        let parsed = Url::parse(raw).map_err(|e| UrlValidationError::MalformedUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            "" => {
                return Err(UrlValidationError::MalformedUrl {
                    url: raw.to_string(),
                    reason: "empty scheme".to_string(),
                })
            }
            other => {
                return Err(UrlValidationError::UnsupportedScheme {
                    url: raw.to_string(),
                    scheme: other.to_string(),
                })
            }
        }

        let host = match parsed.host_str() {
            Some(h) if !h.is_empty() => h.to_ascii_lowercase(),
            _ => {
                return Err(UrlValidationError::MalformedUrl {
                    url: raw.to_string(),
                    reason: "empty host".to_string(),
                })
            }
        };

        if let Some(allowed) = &self.allow_list {
            if !allowed.contains(&host) {
                return Err(UrlValidationError::HostNotAllowed {
                    url: raw.to_string(),
                    host,
                });
            }
        }

        Ok(ValidatedUrl {
            raw: raw.to_string(),
            parsed,
        })
    }
}

/// Canonical host form as produced by `Url::host_str`.
///
/// Unparsable entries are kept lowercased; they can never match a parsed
/// host, so the list stays fail-closed.
fn normalize_host(entry: &str) -> String {
    let entry = entry.trim();
    match Host::parse(entry) {
        Ok(host) => host.to_string(),
        Err(_) => entry.to_ascii_lowercase(),
    }
}
