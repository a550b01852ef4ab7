//! Microsoft Graph API client module
//!
//! One submodule per collected service, plus the shared client with token
//! acquisition and cursor pagination.

pub mod app_creds;
pub mod auth;
pub mod client;
pub mod saml_certs;
pub mod sync;
pub mod vpn_cert;

pub use auth::{acquire_token, AppCredentials};
pub use client::{build_http_client, GraphClient, ListResponse, ProxyConfig};
