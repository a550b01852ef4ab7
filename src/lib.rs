//! Entra Agent - Microsoft Entra monitoring collector
//!
//! Authenticates against the Entra ID token endpoint with OAuth2 client
//! credentials and collects monitoring sections from the Microsoft Graph
//! API:
//!
//! - directory (connect/cloud) sync status
//! - app registration secret and certificate expirations
//! - SAML token signing certificates
//! - the Conditional Access VPN certificate
//!
//! Each collected service is written to stdout as a `<<<section:sep(0)>>>`
//! header followed by exactly one line of JSON, the format the downstream
//! checks parse. Failures map to phase-specific exit codes so the invoking
//! monitoring system can attribute them without parsing text.
//!
//! # Example
//!
//! ```bash
//! agent_ms_entra \
//!     --tenant-id 00000000-0000-0000-0000-000000000000 \
//!     --app-id 11111111-1111-1111-1111-111111111111 \
//!     --app-secret ms_entra:/var/lib/agent/stored_passwords \
//!     --services-to-monitor entra_sync,entra_app_registration_creds \
//!     --timeout 10
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod graph;
pub mod output;
pub mod secret;

pub use cli::{Cli, Service};
pub use error::{AgentError, Phase, Result};
pub use graph::{acquire_token, AppCredentials, GraphClient, ProxyConfig};
pub use output::write_section;
pub use secret::resolve_app_secret;
