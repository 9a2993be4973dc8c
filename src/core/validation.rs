//! Identifier validation logic
//!
//! Pure, synchronous checks for the identifiers ConnectX accepts: FQDNs for
//! host records, domains and domain controllers for the scanner, and
//! email-style identifiers for deployments keyed that way. Validation always
//! runs before a collaborator is contacted; input that fails here never
//! reaches the store or the scanner.

use crate::constants::{MAX_EMAIL_LENGTH, MAX_FQDN_LENGTH, MAX_LABEL_LENGTH};

/// Which identifier format a deployment keys its host records by.
///
/// Exactly one mode is active per deployment, chosen when the registry is
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierMode {
    /// Fully-qualified domain names (`server.domain.com`)
    #[default]
    Fqdn,
    /// Email-style identifiers (`user@domain.com`)
    EmailLike,
}

impl IdentifierMode {
    /// Validate an identifier under this mode
    pub fn is_valid(&self, identifier: &str) -> bool {
        match self {
            IdentifierMode::Fqdn => is_valid_fqdn(identifier),
            IdentifierMode::EmailLike => is_valid_email_identifier(identifier),
        }
    }

    /// Human-readable description of the expected format, for error messages
    pub fn expected_format(&self) -> &'static str {
        match self {
            IdentifierMode::Fqdn => "server.domain.com",
            IdentifierMode::EmailLike => "user@domain.com",
        }
    }
}

/// Check a single DNS label: 1-63 chars of `[A-Za-z0-9-]`, no leading or
/// trailing hyphen.
fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
        return false;
    }

    if !label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return false;
    }

    // Consecutive dots produce an empty label and fail the length check above;
    // hyphen placement is the remaining constraint.
    !label.starts_with('-') && !label.ends_with('-')
}

/// Final label must look like a TLD: at least two characters, all alphabetic.
fn is_valid_tld(label: &str) -> bool {
    label.len() >= 2
        && label.len() <= MAX_LABEL_LENGTH
        && label.chars().all(|c| c.is_ascii_alphabetic())
}

/// Validate a fully-qualified domain name.
///
/// Requires at least one dot (bare labels rejected), per-label rules, an
/// alphabetic TLD of two or more characters, and a total length of at most
/// 253 characters. The length ceiling is checked independently of the label
/// rules: enough individually valid labels can exceed it.
pub fn is_valid_fqdn(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > MAX_FQDN_LENGTH {
        return false;
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let tld = labels[labels.len() - 1];
    let body = &labels[..labels.len() - 1];
    body.iter().all(|label| is_valid_label(label)) && is_valid_tld(tld)
}

/// Validate a domain name.
///
/// Coarser than [`is_valid_fqdn`]: same label rules, at least one dot, and an
/// alphabetic TLD, with no requirement on how many sub-labels precede it.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let tld = labels[labels.len() - 1];
    let body = &labels[..labels.len() - 1];
    body.iter().all(|label| is_valid_label(label)) && is_valid_tld(tld)
}

/// Validate that `server` is a machine inside `domain`.
///
/// The server must end with `"." + domain` (case-insensitive), and the prefix
/// left after stripping the domain and its separating dot must be a single
/// valid machine label: two or more characters, alphanumeric first and last,
/// interior hyphens allowed.
pub fn is_valid_server_in_domain(server: &str, domain: &str) -> bool {
    if !is_valid_domain(domain) {
        return false;
    }

    let server_lower = server.to_lowercase();
    let domain_lower = domain.to_lowercase();

    let suffix = format!(".{}", domain_lower);
    let Some(prefix) = server_lower.strip_suffix(&suffix) else {
        return false;
    };

    let bytes = prefix.as_bytes();
    if bytes.len() < 2 {
        return false;
    }

    bytes[0].is_ascii_alphanumeric()
        && bytes[bytes.len() - 1].is_ascii_alphanumeric()
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Validate an email-style identifier.
///
/// Exactly one `@`; a non-empty local part of `[A-Za-z0-9._%+-]`; a domain
/// part following the FQDN label rules; total length at most 254 characters.
pub fn is_valid_email_identifier(identifier: &str) -> bool {
    if identifier.is_empty() || identifier.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    let mut parts = identifier.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    {
        return false;
    }

    is_valid_fqdn(domain)
}
