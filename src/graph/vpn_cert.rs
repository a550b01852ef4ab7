//! Conditional Access VPN certificate service

use serde::{Deserialize, Serialize};

use crate::error::{Phase, Result};
use crate::graph::GraphClient;

/// Service principal record for the VPN query
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VpnServicePrincipal {
    pub id: String,
    pub app_id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub key_credentials: Vec<VpnKeyCredential>,
}

/// Key credential entry; `key` carries the certificate blob
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VpnKeyCredential {
    pub key_id: String,
    pub display_name: Option<String>,
    pub custom_key_identifier: Option<String>,
    pub end_date_time: Option<String>,
    pub key: Option<String>,
}

/// One emitted VPN certificate
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VpnCert {
    pub cert_id: String,
    pub cert_name: Option<String>,
    pub cert_identifier: Option<String>,
    pub cert_expiration: Option<String>,
}

/// VPN service principal with its usable certificates
#[derive(Serialize, Debug, PartialEq)]
pub struct VpnApp {
    pub app_name: String,
    pub app_appid: String,
    pub app_id: String,
    pub app_certs: Vec<VpnCert>,
}

const FILTER: &str = "displayName eq 'VPN Server' and accountEnabled eq true";
const SELECT: &str = "appId,id,displayName,keyCredentials";

/// Fetch the VPN service principal(s); a single page is expected
pub async fn fetch_vpn_apps(client: &GraphClient) -> Result<Vec<VpnApp>> {
    let path = format!(
        "/servicePrincipals?$filter={}&$select={}",
        urlencoding::encode(FILTER),
        SELECT
    );
    let principals: Vec<VpnServicePrincipal> = client.fetch_value(&path, Phase::VpnCert).await?;
    Ok(extract_vpn_apps(principals))
}

/// Keep only credential entries that carry an actual certificate blob.
///
/// A lone principal with no usable certs is suppressed entirely, so the
/// downstream check is not handed a zero-item service. With multiple
/// matching principals everything is emitted as-is; the check raises its
/// own ambiguity state in that case.
pub fn extract_vpn_apps(principals: Vec<VpnServicePrincipal>) -> Vec<VpnApp> {
    let apps: Vec<VpnApp> = principals
        .into_iter()
        .map(|sp| VpnApp {
            app_name: sp.display_name.unwrap_or_default(),
            app_appid: sp.app_id,
            app_id: sp.id,
            app_certs: sp
                .key_credentials
                .iter()
                .filter(|cred| cred.key.as_deref().is_some_and(|k| !k.is_empty()))
                .map(|cred| VpnCert {
                    cert_id: cred.key_id.clone(),
                    cert_name: cred.display_name.clone(),
                    cert_identifier: cred.custom_key_identifier.clone(),
                    cert_expiration: cred.end_date_time.clone(),
                })
                .collect(),
        })
        .collect();

    if apps.len() == 1 && apps[0].app_certs.is_empty() {
        return Vec::new();
    }
    apps
}
