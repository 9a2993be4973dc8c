//! RDP connection launcher (mstsc)
//!
//! Launching a connection has three steps: seed the `TERMSRV/<host>`
//! credential so mstsc can single-sign-on, write a temporary `.rdp` document
//! pointing at the host, and spawn mstsc against it. The document is removed
//! once mstsc has had time to read it.

use crate::constants::{CREATE_NO_WINDOW, DEFAULT_RDP_PORT, RDP_FILE_LINGER};
use crate::core::{ConnectionLauncher, CredentialStore};
use crate::logger;
use crate::models::{CredentialProfile, Credentials, Host};
use crate::utils::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::process::Command;

/// Render the `.rdp` document mstsc is launched with.
///
/// `username` pre-fills the login prompt; with the TERMSRV credential seeded
/// and `prompt for credentials:i:0`, mstsc connects without asking.
fn build_rdp_document(hostname: &str, username: Option<&str>) -> String {
    format!(
        "screen mode id:i:2\r\n\
         session bpp:i:32\r\n\
         full address:s:{}:{}\r\n\
         compression:i:1\r\n\
         keyboardhook:i:2\r\n\
         networkautodetect:i:1\r\n\
         bandwidthautodetect:i:1\r\n\
         enableworkspacereconnect:i:1\r\n\
         redirectclipboard:i:1\r\n\
         redirectprinters:i:1\r\n\
         autoreconnection enabled:i:1\r\n\
         authentication level:i:2\r\n\
         prompt for credentials:i:{}\r\n\
         negotiate security layer:i:1\r\n\
         username:s:{}\r\n\
         enablecredsspsupport:i:1\r\n\
         cert ignore:i:1",
        hostname,
        DEFAULT_RDP_PORT,
        if username.is_some() { 0 } else { 1 },
        username.unwrap_or_default()
    )
}

/// [`ConnectionLauncher`] spawning mstsc against a generated `.rdp` document
pub struct MstscLauncher {
    credentials: Arc<dyn CredentialStore>,
}

impl MstscLauncher {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        MstscLauncher { credentials }
    }
}

#[async_trait]
impl ConnectionLauncher for MstscLauncher {
    fn expects_inline_credentials(&self) -> bool {
        true
    }

    async fn launch(
        &self,
        host: &Host,
        credentials: Option<&Credentials>,
    ) -> Result<(), TransportError> {
        // Seed the TERMSRV credential mstsc reads during sign-on
        if let Some(creds) = credentials {
            self.credentials
                .store(&CredentialProfile::termsrv(&host.hostname), creds)
                .await
                .map_err(|e| TransportError::Backend(e.to_string()))?;
        }

        let username = credentials.map(|c| c.username().as_str());
        let document = build_rdp_document(&host.hostname, username);

        let timestamp = chrono::Utc::now().timestamp();
        let rdp_path = std::env::temp_dir().join(format!("{}_{}.rdp", host.hostname, timestamp));

        tokio::fs::write(&rdp_path, document)
            .await
            .map_err(|e| TransportError::Backend(format!("Failed to write RDP file: {}", e)))?;

        logger::log_info(&format!("launch: mstsc for {}", host.hostname));

        Command::new("mstsc")
            .arg(&rdp_path)
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()
            .map_err(|e| TransportError::Unreachable(format!("Failed to launch mstsc: {}", e)))?;

        // Give mstsc time to read the document before cleaning it up
        tokio::time::sleep(RDP_FILE_LINGER).await;
        if let Err(e) = tokio::fs::remove_file(&rdp_path).await {
            logger::log_warn(&format!("launch: failed to clean up RDP file: {}", e));
        }

        Ok(())
    }
}
