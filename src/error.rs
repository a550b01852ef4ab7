use std::fmt;

/// Collection phase a failure is attributed to
///
/// The invoking monitoring system reads the process exit code to tell which
/// phase failed, without parsing diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// OAuth2 token acquisition
    Token,
    /// Directory sync status query
    Sync,
    /// App registration credentials query
    AppCreds,
    /// Conditional Access VPN certificate query
    VpnCert,
    /// SAML certificates query
    SamlCerts,
}

impl Phase {
    /// Base exit code for a request failure in this phase
    pub fn exit_code(self) -> i32 {
        match self {
            Phase::Token => 1,
            Phase::Sync => 2,
            Phase::AppCreds => 3,
            Phase::VpnCert => 4,
            Phase::SamlCerts => 5,
        }
    }

    /// Phase label used in diagnostics
    pub fn label(self) -> &'static str {
        match self {
            Phase::Token => "token acquisition",
            Phase::Sync => "sync status fetch",
            Phase::AppCreds => "app registration credentials fetch",
            Phase::VpnCert => "CA VPN certificate fetch",
            Phase::SamlCerts => "SAML certificates fetch",
        }
    }
}

/// Offset added to a phase exit code when the failure was a timeout, so the
/// caller can distinguish "API unreachable in time" from "API rejected the
/// request".
const TIMEOUT_EXIT_OFFSET: i32 = 10;

/// Exit code for a response that did not have the expected shape
const SHAPE_EXIT_CODE: i32 = 20;

/// Exit code for configuration and secret-resolution failures
const CONFIG_EXIT_CODE: i32 = 21;

/// Custom error type for agent operations
#[derive(Debug)]
pub enum AgentError {
    /// Request did not complete within the configured timeout
    Timeout { phase: Phase },
    /// Transport failure or non-2xx API response
    Request {
        phase: Phase,
        status: Option<u16>,
        message: String,
    },
    /// Response body lacked an expected field or structure
    Shape { phase: Phase, message: String },
    /// Invalid configuration or secret resolution failure
    Config(String),
}

impl AgentError {
    /// Classify a transport-level reqwest failure for the given phase
    pub fn from_reqwest(err: reqwest::Error, phase: Phase) -> Self {
        if err.is_timeout() {
            AgentError::Timeout { phase }
        } else {
            AgentError::Request {
                phase,
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    /// Process exit code communicated to the invoking monitoring system
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentError::Timeout { phase } => TIMEOUT_EXIT_OFFSET + phase.exit_code(),
            AgentError::Request { phase, .. } => phase.exit_code(),
            AgentError::Shape { .. } => SHAPE_EXIT_CODE,
            AgentError::Config(_) => CONFIG_EXIT_CODE,
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Timeout { phase } => {
                write!(f, "Timeout during {}", phase.label())
            }
            AgentError::Request {
                phase,
                status,
                message,
            } => match status {
                Some(code) => {
                    write!(f, "Request failed during {} (HTTP {}): {}", phase.label(), code, message)
                }
                None => write!(f, "Request failed during {}: {}", phase.label(), message),
            },
            AgentError::Shape { phase, message } => {
                write!(f, "Unexpected response shape during {}: {}", phase.label(), message)
            }
            AgentError::Config(message) => write!(f, "Configuration error: {}", message),
        }
    }
}

impl std::error::Error for AgentError {}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
