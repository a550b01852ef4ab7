//! SAML token signing certificates service

use serde::{Deserialize, Serialize};

use crate::error::{Phase, Result};
use crate::graph::GraphClient;

/// Service principal record for the SAML query
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SamlServicePrincipal {
    pub id: String,
    pub app_id: String,
    pub display_name: Option<String>,
    pub notes: Option<String>,
    pub preferred_token_signing_key_end_date_time: Option<String>,
    pub preferred_token_signing_key_thumbprint: Option<String>,
}

/// Normalized SAML service record consumed by the certificate check
#[derive(Serialize, Debug, PartialEq)]
pub struct SamlServiceInfo {
    pub app_id: String,
    pub app_appid: String,
    pub app_name: String,
    pub app_notes: Option<String>,
    pub cert_expiration: Option<String>,
    pub cert_thumbprint: Option<String>,
}

const FILTER: &str = "preferredSingleSignOnMode eq 'saml' and accountEnabled eq true";
const SELECT: &str = "appId,id,displayName,notes,preferredTokenSigningKeyEndDateTime,preferredTokenSigningKeyThumbprint";

/// Fetch all SAML-enabled service principals, sorted for stable output
pub async fn fetch_saml_certs(client: &GraphClient) -> Result<Vec<SamlServiceInfo>> {
    let path = format!(
        "/servicePrincipals?$filter={}&$select={}",
        urlencoding::encode(FILTER),
        SELECT
    );
    let principals: Vec<SamlServicePrincipal> =
        client.fetch_all_pages(&path, Phase::SamlCerts).await?;
    Ok(extract_saml_certs(principals))
}

/// Map service principals verbatim and sort ascending by object id so
/// successive runs emit an ordering the downstream consumer can diff.
///
/// Unlike the app credentials service, duplicate display names are not
/// renamed here; the downstream check resolves them on its side.
pub fn extract_saml_certs(principals: Vec<SamlServicePrincipal>) -> Vec<SamlServiceInfo> {
    let mut infos: Vec<SamlServiceInfo> = principals
        .into_iter()
        .map(|sp| SamlServiceInfo {
            app_id: sp.id,
            app_appid: sp.app_id,
            app_name: sp.display_name.unwrap_or_default(),
            app_notes: sp.notes,
            cert_expiration: sp.preferred_token_signing_key_end_date_time,
            cert_thumbprint: sp.preferred_token_signing_key_thumbprint,
        })
        .collect();

    infos.sort_by(|a, b| a.app_id.cmp(&b.app_id));
    infos
}
