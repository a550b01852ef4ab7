//! Collection pipeline
//!
//! Strictly sequential: one token acquisition, then each requested service
//! in the requested order. The first failing phase aborts the run so the
//! caller can map the error to its phase-specific exit code; services after
//! the failing one are not attempted.

use log::{debug, info};
use std::io::Write;
use std::time::Duration;

use crate::cli::{Cli, Service};
use crate::config::sections;
use crate::error::{AgentError, Result};
use crate::graph::{
    acquire_token, app_creds, build_http_client, saml_certs, sync, vpn_cert, AppCredentials,
    GraphClient, ProxyConfig,
};
use crate::output::write_section;
use crate::secret::resolve_app_secret;

/// Run one collection pass, writing sections to `out`
pub async fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    if !(cli.timeout > 0.0) {
        return Err(AgentError::Config(format!(
            "timeout must be positive, got {}",
            cli.timeout
        )));
    }

    let app_secret = resolve_app_secret(&cli.app_secret)?;
    let proxy = ProxyConfig::parse(cli.proxy.as_deref());
    let http = build_http_client(Duration::from_secs_f64(cli.timeout), &proxy)?;

    let creds = AppCredentials {
        tenant_id: cli.tenant_id.clone(),
        app_id: cli.app_id.clone(),
        app_secret,
    };
    let token = acquire_token(&http, &cli.login_url, &creds).await?;
    let client = GraphClient::new(http, token, &cli.graph_url);

    for service in &cli.services_to_monitor {
        collect_service(&client, *service, out).await?;
    }

    info!("Collection finished");
    Ok(())
}

/// Fetch, extract and emit one service.
///
/// Sync is emitted whenever requested, since its payload is a fixed
/// single-object shape; the list services are emitted only when non-empty
/// so the downstream consumer does not discover empty services.
async fn collect_service<W: Write>(client: &GraphClient, service: Service, out: &mut W) -> Result<()> {
    debug!("Collecting {}", service);
    match service {
        Service::Sync => {
            let status = sync::fetch_sync_status(client).await?;
            write_section(out, sections::SYNC, &status)
        }
        Service::AppRegistrationCreds => {
            let apps = app_creds::fetch_app_registrations(client).await?;
            if apps.is_empty() {
                return Ok(());
            }
            write_section(out, sections::APP_CREDS, &apps)
        }
        Service::CaVpnCert => {
            let apps = vpn_cert::fetch_vpn_apps(client).await?;
            if apps.is_empty() {
                return Ok(());
            }
            write_section(out, sections::CA_VPN_CERT, &apps)
        }
        Service::SamlCerts => {
            let infos = saml_certs::fetch_saml_certs(client).await?;
            if infos.is_empty() {
                return Ok(());
            }
            write_section(out, sections::SAML_CERTS, &infos)
        }
    }
}
