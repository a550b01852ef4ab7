//! Application secret resolution
//!
//! The monitoring system hands the agent a password-store reference instead
//! of the raw secret so the secret never appears on a command line it
//! controls end to end. The reference has the form `id:path`; the store at
//! `path` holds one `ident:secret` pair per line.

use log::debug;
use std::fs;

use crate::error::{AgentError, Result};

/// Resolve the `--app-secret` value.
///
/// A value containing `:` is treated as a store reference; anything else is
/// taken as the literal secret (useful for manual invocations).
pub fn resolve_app_secret(raw: &str) -> Result<String> {
    match raw.split_once(':') {
        Some((id, path)) => lookup_in_store(id, path),
        None => Ok(raw.to_string()),
    }
}

fn lookup_in_store(id: &str, path: &str) -> Result<String> {
    debug!("Resolving app secret '{}' from store {}", id, path);

    let content = fs::read_to_string(path)
        .map_err(|e| AgentError::Config(format!("cannot read password store {}: {}", path, e)))?;

    for line in content.lines() {
        if let Some((ident, secret)) = line.split_once(':') {
            if ident == id {
                return Ok(secret.to_string());
            }
        }
    }

    Err(AgentError::Config(format!(
        "password id '{}' not found in store {}",
        id, path
    )))
}
