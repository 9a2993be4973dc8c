//! Windows Credential Manager implementation
//!
//! This module contains all unsafe Windows API code for credential storage.
//! Passwords are stored as UTF-16 blobs, matching what mstsc expects for the
//! TERMSRV targets it reads during single sign-on.

use crate::core::CredentialStore;
use crate::models::{CredentialProfile, Credentials, SecureString, Username};
use crate::utils::CredentialError;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::FILETIME;
use windows::Win32::Security::Credentials::{
    CredDeleteW, CredFree, CredReadW, CredWriteW, CREDENTIALW, CRED_FLAGS,
    CRED_PERSIST_LOCAL_MACHINE, CRED_TYPE_GENERIC,
};

/// Encode a string as a null-terminated wide (UTF-16) buffer for Win32 calls
fn to_wide(value: &str) -> Vec<u16> {
    OsStr::new(value)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Credential store backed by the Windows Credential Manager
///
/// Uses the CredRead/CredWrite/CredDelete APIs; entries are encrypted at rest
/// by DPAPI and tied to the Windows user account. Credential values are never
/// logged.
pub struct WindowsCredentialManager;

impl WindowsCredentialManager {
    pub fn new() -> Self {
        WindowsCredentialManager
    }
}

impl Default for WindowsCredentialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for WindowsCredentialManager {
    async fn store(
        &self,
        profile: &CredentialProfile,
        creds: &Credentials,
    ) -> Result<(), CredentialError> {
        // Delegate to the synchronous implementation (Windows APIs are synchronous)
        self.store_sync(profile, creds)
    }

    async fn retrieve(
        &self,
        profile: &CredentialProfile,
    ) -> Result<Option<Credentials>, CredentialError> {
        self.retrieve_sync(profile)
    }

    async fn exists(&self, profile: &CredentialProfile) -> Result<bool, CredentialError> {
        Ok(self.retrieve_sync(profile)?.is_some())
    }

    async fn delete(&self, profile: &CredentialProfile) -> Result<(), CredentialError> {
        self.delete_sync(profile)
    }
}

impl WindowsCredentialManager {
    fn store_sync(
        &self,
        profile: &CredentialProfile,
        creds: &Credentials,
    ) -> Result<(), CredentialError> {
        unsafe {
            let target_name = to_wide(profile.as_str());
            let username_wide = to_wide(creds.username().as_str());
            let password_wide = to_wide(creds.password().as_str());

            // SAFETY: All pointers stay valid for the duration of the
            // CredWriteW call; the blob size is in bytes (UTF-16 = 2 per char).
            let cred = CREDENTIALW {
                Flags: CRED_FLAGS(0),
                Type: CRED_TYPE_GENERIC,
                TargetName: PWSTR(target_name.as_ptr() as *mut u16),
                Comment: PWSTR::null(),
                LastWritten: FILETIME::default(),
                CredentialBlobSize: (password_wide.len() * 2) as u32,
                CredentialBlob: password_wide.as_ptr() as *mut u8,
                Persist: CRED_PERSIST_LOCAL_MACHINE,
                AttributeCount: 0,
                Attributes: std::ptr::null_mut(),
                TargetAlias: PWSTR::null(),
                UserName: PWSTR(username_wide.as_ptr() as *mut u16),
            };

            CredWriteW(&cred, 0).map_err(|e| {
                CredentialError::Platform(format!(
                    "Failed to save credentials for target '{}': {:?}",
                    profile.as_str(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    fn retrieve_sync(
        &self,
        profile: &CredentialProfile,
    ) -> Result<Option<Credentials>, CredentialError> {
        unsafe {
            let target_name = to_wide(profile.as_str());
            let mut pcred = std::ptr::null_mut();

            match CredReadW(
                PCWSTR::from_raw(target_name.as_ptr()),
                CRED_TYPE_GENERIC,
                0,
                &mut pcred,
            ) {
                Ok(_) => {
                    // SAFETY: pcred is valid after successful CredReadW
                    let cred = &*(pcred as *const CREDENTIALW);

                    let username = if !cred.UserName.is_null() {
                        PWSTR::from_raw(cred.UserName.0).to_string().map_err(|e| {
                            CredentialError::Platform(format!(
                                "Failed to decode username for target '{}': {:?}",
                                profile.as_str(),
                                e
                            ))
                        })?
                    } else {
                        return Err(CredentialError::Platform(
                            "Username is null in stored credential".to_string(),
                        ));
                    };

                    // The blob is UTF-16; rebuild it from little-endian byte pairs
                    let password_bytes = std::slice::from_raw_parts(
                        cred.CredentialBlob,
                        cred.CredentialBlobSize as usize,
                    );
                    let password_wide: Vec<u16> = password_bytes
                        .chunks_exact(2)
                        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
                        .collect();

                    let password = String::from_utf16(&password_wide)
                        .map_err(|e| {
                            CredentialError::Platform(format!(
                                "Failed to decode password for target '{}': {:?}",
                                profile.as_str(),
                                e
                            ))
                        })?
                        .trim_end_matches('\0')
                        .to_string();

                    // Free the credential allocated by Windows
                    CredFree(pcred as *const _);

                    Ok(Some(Credentials::new(
                        Username::new(username)?,
                        SecureString::new(password),
                    )))
                }
                // Not found is None, not an error
                Err(_) => Ok(None),
            }
        }
    }

    fn delete_sync(&self, profile: &CredentialProfile) -> Result<(), CredentialError> {
        unsafe {
            let target_name = to_wide(profile.as_str());

            match CredDeleteW(PCWSTR::from_raw(target_name.as_ptr()), CRED_TYPE_GENERIC, 0) {
                Ok(_) => Ok(()),
                Err(e) => {
                    // ERROR_NOT_FOUND: deleting an absent entry is a success
                    // (idempotent delete)
                    let error_code = e.code().0;
                    if error_code == 0x80070490u32 as i32 {
                        Ok(())
                    } else {
                        Err(CredentialError::Platform(format!(
                            "Failed to delete credentials for target '{}': {:?}",
                            profile.as_str(),
                            e
                        )))
                    }
                }
            }
        }
    }
}
