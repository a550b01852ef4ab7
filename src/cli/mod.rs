//! CLI argument parsing

use clap::{Parser, ValueEnum};

use crate::config::{api, defaults};

/// Microsoft Entra monitoring agent CLI
#[derive(Parser, Debug)]
#[command(name = "agent_ms_entra")]
#[command(version)]
#[command(about = "Collect Microsoft Entra monitoring sections", long_about = None)]
pub struct Cli {
    /// Directory (tenant) ID of the Entra tenant
    #[arg(long)]
    pub tenant_id: String,

    /// Application (client) ID of the monitoring app registration
    #[arg(long)]
    pub app_id: String,

    /// Client secret: a password-store reference `id:path`, or the literal secret
    #[arg(long)]
    pub app_secret: String,

    /// Proxy for outgoing requests: a proxy URL, FROM_ENVIRONMENT or NO_PROXY
    #[arg(long)]
    pub proxy: Option<String>,

    /// Comma-separated list of services to collect
    #[arg(long, value_enum, value_delimiter = ',', required = true)]
    pub services_to_monitor: Vec<Service>,

    /// Request timeout in seconds, applied to the token request and every page fetch
    #[arg(long, default_value_t = defaults::TIMEOUT)]
    pub timeout: f64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Token endpoint base URL override (testing against mock servers)
    #[arg(long, hide = true, env = "MS_ENTRA_LOGIN_URL", default_value = api::LOGIN_URL)]
    pub login_url: String,

    /// Graph API base URL override (testing against mock servers)
    #[arg(long, hide = true, env = "MS_ENTRA_GRAPH_URL", default_value = api::GRAPH_URL)]
    pub graph_url: String,
}

/// Services the agent can collect, named by their ruleset identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    /// Entra connect/cloud sync status
    #[value(name = "entra_sync")]
    Sync,
    /// App registration credential expiration
    #[value(name = "entra_app_registration_creds")]
    AppRegistrationCreds,
    /// Conditional Access VPN certificate expiration
    #[value(name = "entra_ca_vpn_cert")]
    CaVpnCert,
    /// SAML token signing certificate expiration
    #[value(name = "entra_saml_certs")]
    SamlCerts,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Sync => write!(f, "entra_sync"),
            Service::AppRegistrationCreds => write!(f, "entra_app_registration_creds"),
            Service::CaVpnCert => write!(f, "entra_ca_vpn_cert"),
            Service::SamlCerts => write!(f, "entra_saml_certs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "agent_ms_entra",
            "--tenant-id",
            "tenant-1",
            "--app-id",
            "app-1",
            "--app-secret",
            "secret",
            "--services-to-monitor",
            "entra_sync",
        ]
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(base_args());
        assert_eq!(cli.timeout, defaults::TIMEOUT);
        assert_eq!(cli.log_level, defaults::LOG_LEVEL);
        assert_eq!(cli.login_url, api::LOGIN_URL);
        assert_eq!(cli.graph_url, api::GRAPH_URL);
        assert!(cli.proxy.is_none());
    }

    #[test]
    fn test_cli_parses_service_list_in_order() {
        let mut args = base_args();
        let last = args.len() - 1;
        args[last] = "entra_saml_certs,entra_sync,entra_app_registration_creds";
        let cli = Cli::parse_from(args);
        assert_eq!(
            cli.services_to_monitor,
            vec![
                Service::SamlCerts,
                Service::Sync,
                Service::AppRegistrationCreds
            ]
        );
    }

    #[test]
    fn test_cli_rejects_unknown_service() {
        let mut args = base_args();
        let last = args.len() - 1;
        args[last] = "entra_unknown";
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_requires_tenant_id() {
        let result = Cli::try_parse_from([
            "agent_ms_entra",
            "--app-id",
            "app-1",
            "--app-secret",
            "secret",
            "--services-to-monitor",
            "entra_sync",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_with_timeout_and_proxy() {
        let mut args = base_args();
        args.extend(["--timeout", "2.5", "--proxy", "NO_PROXY"]);
        let cli = Cli::parse_from(args);
        assert_eq!(cli.timeout, 2.5);
        assert_eq!(cli.proxy.as_deref(), Some("NO_PROXY"));
    }

    #[test]
    fn test_service_display_matches_value_names() {
        assert_eq!(Service::Sync.to_string(), "entra_sync");
        assert_eq!(
            Service::AppRegistrationCreds.to_string(),
            "entra_app_registration_creds"
        );
        assert_eq!(Service::CaVpnCert.to_string(), "entra_ca_vpn_cert");
        assert_eq!(Service::SamlCerts.to_string(), "entra_saml_certs");
    }
}
