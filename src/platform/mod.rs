//! Platform-specific implementations (Windows credential storage, mstsc launch)
//!
//! All platform-specific code is isolated here; the `core` modules only see
//! the `CredentialStore` and `ConnectionLauncher` traits.

pub mod credman;
pub mod rdp;

pub use credman::WindowsCredentialManager;
pub use rdp::MstscLauncher;
