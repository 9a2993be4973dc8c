//! Active Directory domain scanner
//!
//! Discovers Windows Server computer objects over LDAP and merges them into
//! the host store. Binds with the default stored credentials; hosts the user
//! already registered keep their descriptions, and nothing is ever removed by
//! a scan.

use crate::constants::LDAP_PORT;
use crate::core::{CredentialStore, DomainScanner, HostStore};
use crate::logger;
use crate::models::{CredentialProfile, Host, ScanOutcome};
use crate::utils::TransportError;
use async_trait::async_trait;
use ldap3::{LdapConnAsync, Scope, SearchEntry};
use std::collections::HashSet;
use std::sync::Arc;

/// A server discovered in the directory
#[derive(Debug, Clone, PartialEq, Eq)]
struct DiscoveredServer {
    fqdn: String,
    description: Option<String>,
}

/// Build the LDAP base DN for a dotted domain (`example.com` → `DC=example,DC=com`)
fn format_base_dn(domain: &str) -> Result<String, TransportError> {
    let components: Vec<&str> = domain.split('.').filter(|part| !part.is_empty()).collect();
    if components.is_empty() {
        return Err(TransportError::Backend(format!(
            "Cannot derive a base DN from '{}'",
            domain
        )));
    }

    Ok(components
        .iter()
        .map(|part| format!("DC={}", part))
        .collect::<Vec<String>>()
        .join(","))
}

/// Qualify a bare username with the domain for the bind (UPN format)
fn build_bind_username(username: &str, domain: &str) -> String {
    if username.contains('@') || username.contains('\\') {
        username.to_string()
    } else {
        format!("{}@{}", username, domain)
    }
}

async fn ldap_search_windows_servers(
    domain: &str,
    server: &str,
    username: &str,
    password: &str,
) -> Result<Vec<DiscoveredServer>, TransportError> {
    let base_dn = format_base_dn(domain)?;
    let url = format!("ldap://{}:{}", server, LDAP_PORT);

    let (conn, mut ldap) = LdapConnAsync::new(&url)
        .await
        .map_err(|e| TransportError::Unreachable(format!("Failed to connect LDAP: {}", e)))?;
    ldap3::drive!(conn);

    let bind_user = build_bind_username(username, domain);
    ldap.simple_bind(&bind_user, password)
        .await
        .map_err(|e| TransportError::Unreachable(format!("LDAP bind failed: {}", e)))?
        .success()
        .map_err(|e| TransportError::Backend(format!("LDAP bind rejected: {}", e)))?;

    let filter = "(&(objectClass=computer)(operatingSystem=Windows Server*)(dNSHostName=*))";
    let attrs = vec!["dNSHostName", "description"];
    let (entries, _res) = ldap
        .search(&base_dn, Scope::Subtree, filter, attrs)
        .await
        .map_err(|e| TransportError::Unreachable(format!("LDAP search failed: {}", e)))?
        .success()
        .map_err(|e| TransportError::Backend(format!("LDAP search error: {}", e)))?;

    let mut servers = Vec::new();
    let mut seen = HashSet::new();

    for entry in entries {
        let se = SearchEntry::construct(entry);
        if let Some(values) = se.attrs.get("dNSHostName") {
            if let Some(host) = values.first() {
                let key = host.to_lowercase();
                if !seen.insert(key) {
                    continue;
                }

                let description = se
                    .attrs
                    .get("description")
                    .and_then(|vals| vals.first())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());

                servers.push(DiscoveredServer {
                    fqdn: host.to_string(),
                    description,
                });
            }
        }
    }

    ldap.unbind().await.ok();

    servers.sort_by(|a, b| a.fqdn.to_lowercase().cmp(&b.fqdn.to_lowercase()));
    if servers.is_empty() {
        return Err(TransportError::Backend(
            "No Windows Server hosts found in the domain".to_string(),
        ));
    }
    Ok(servers)
}

/// Select the discovered servers that are new to the directory.
///
/// Matching against existing records is case-insensitive so a re-scan does
/// not duplicate hosts whose case AD reports differently; existing records
/// keep their user-edited descriptions untouched.
fn new_hosts(existing: &[Host], discovered: &[DiscoveredServer]) -> Vec<Host> {
    let known: HashSet<String> = existing
        .iter()
        .map(|h| h.hostname.to_lowercase())
        .collect();

    discovered
        .iter()
        .filter(|entry| !known.contains(&entry.fqdn.to_lowercase()))
        .map(|entry| Host::new(&entry.fqdn, entry.description.clone().unwrap_or_default()))
        .collect()
}

/// LDAP-backed [`DomainScanner`]
///
/// Writes discovered hosts straight into the host store; the orchestrator
/// reloads the registry when the scan returns.
pub struct LdapScanner {
    store: Arc<dyn HostStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl LdapScanner {
    pub fn new(store: Arc<dyn HostStore>, credentials: Arc<dyn CredentialStore>) -> Self {
        LdapScanner { store, credentials }
    }
}

#[async_trait]
impl DomainScanner for LdapScanner {
    async fn scan(&self, domain: &str, server: &str) -> Result<ScanOutcome, TransportError> {
        logger::log_info(&format!("scan: domain='{}' dc='{}'", domain, server));

        let creds = self
            .credentials
            .retrieve(&CredentialProfile::default())
            .await
            .map_err(|e| TransportError::Backend(format!("Failed to retrieve credentials: {}", e)))?
            .ok_or_else(|| {
                TransportError::Backend("No credentials stored. Please log in first.".to_string())
            })?;

        let discovered = ldap_search_windows_servers(
            domain,
            server,
            creds.username().as_str(),
            creds.password().as_str(),
        )
        .await?;
        let found = discovered.len();
        logger::log_debug(&format!("scan: LDAP found {}", found));

        let existing = self.store.list_hosts().await?;
        let additions = new_hosts(&existing, &discovered);
        let created = additions.len();

        for host in &additions {
            self.store.save_host(host).await?;
        }

        let outcome = ScanOutcome {
            found,
            created,
            removed: 0,
            total: existing.len() + created,
        };
        logger::log_info(&format!(
            "scan: SUCCESS found={} created={} total={}",
            outcome.found, outcome.created, outcome.total
        ));
        Ok(outcome)
    }
}
