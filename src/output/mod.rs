//! Agent section output
//!
//! The downstream consumer reads stdout as a sequence of
//! `<<<section:sep(0)>>>` header lines, each immediately followed by one
//! line of JSON holding that section's full payload. Diagnostics never go
//! here; stdout stays JSON-or-nothing.

use serde::Serialize;
use std::io::Write;

use crate::error::{AgentError, Result};

/// Write one section: the header line plus a single line of compact JSON
pub fn write_section<W, T>(out: &mut W, section: &str, payload: &T) -> Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(payload)
        .map_err(|e| AgentError::Config(format!("cannot serialize section {}: {}", section, e)))?;
    writeln!(out, "<<<{}:sep(0)>>>", section)
        .and_then(|_| writeln!(out, "{}", json))
        .map_err(|e| AgentError::Config(format!("cannot write section {}: {}", section, e)))
}
