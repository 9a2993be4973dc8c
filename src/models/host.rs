//! Host directory record types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered remote host
///
/// `hostname` is the primary key across the directory: lookups, credential
/// scoping, and launch requests all key on it. Renaming a host is modeled as
/// delete + insert for that reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    /// Fully-qualified hostname (or email-style identifier, depending on the
    /// configured identifier mode)
    pub hostname: String,

    /// Optional network address; free-form when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,
}

impl Host {
    /// Create a host record with no address
    pub fn new(hostname: impl Into<String>, description: impl Into<String>) -> Self {
        Host {
            hostname: hostname.into(),
            ip_address: None,
            description: description.into(),
        }
    }

    /// Attach a network address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.ip_address = Some(address.into());
        self
    }
}

/// Summary of a completed domain scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Hosts the directory scan discovered
    pub found: usize,
    /// Hosts newly created in the store
    pub created: usize,
    /// Hosts removed from the store (always 0 with the shipped scanner)
    pub removed: usize,
    /// Hosts in the store after the merge
    pub total: usize,
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} server(s): {} new, {} total in directory",
            self.found, self.created, self.total
        )
    }
}
