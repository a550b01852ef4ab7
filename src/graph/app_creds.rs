//! App registration credentials service
//!
//! Emits one entity per non-empty credential-type group per application, so
//! an application holding both secrets and certificates shows up as two
//! monitored services downstream.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Phase, Result};
use crate::graph::GraphClient;

/// Credential-type group tag for secrets (passwordCredentials)
pub const CRED_TYPE_SECRET: &str = "secret";

/// Credential-type group tag for certificates (keyCredentials)
pub const CRED_TYPE_CERTIFICATE: &str = "certificate";

/// Application registration record from the Graph API
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub app_id: String,
    pub display_name: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub password_credentials: Vec<RawCredential>,
    #[serde(default)]
    pub key_credentials: Vec<RawCredential>,
}

/// Secret or certificate entry as returned by the API
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawCredential {
    pub key_id: String,
    pub display_name: Option<String>,
    pub custom_key_identifier: Option<String>,
    pub end_date_time: Option<String>,
}

/// One emitted credential, renamed for the downstream check
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AppCred {
    pub cred_id: String,
    pub cred_name: Option<String>,
    pub cred_identifier: Option<String>,
    pub cred_expiration: Option<String>,
}

impl From<&RawCredential> for AppCred {
    fn from(cred: &RawCredential) -> Self {
        Self {
            cred_id: cred.key_id.clone(),
            cred_name: cred.display_name.clone(),
            cred_identifier: cred.custom_key_identifier.clone(),
            cred_expiration: cred.end_date_time.clone(),
        }
    }
}

/// One app registration entity per credential-type group
#[derive(Serialize, Debug, PartialEq)]
pub struct AppRegistration {
    pub app_name: String,
    pub app_appid: String,
    pub app_id: String,
    pub app_notes: Option<String>,
    pub cred_type: String,
    pub app_creds: Vec<AppCred>,
}

const SELECT: &str = "displayName,appId,id,notes,passwordCredentials,keyCredentials";

/// Fetch all app registrations and shape them into credential-group entities
pub async fn fetch_app_registrations(client: &GraphClient) -> Result<Vec<AppRegistration>> {
    let path = format!("/applications?$select={}", SELECT);
    let apps: Vec<Application> = client.fetch_all_pages(&path, Phase::AppCreds).await?;
    Ok(extract_app_registrations(apps))
}

/// Map raw applications to entities, resolving display-name collisions.
///
/// Display names are not unique across a tenant. The first application
/// holding a name keeps it; a later holder that carries credentials gets
/// `_` and the last 4 characters of its object id appended. A third holder
/// colliding on the same suffix is not deduplicated further.
pub fn extract_app_registrations(apps: Vec<Application>) -> Vec<AppRegistration> {
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut entities = Vec::new();

    for app in apps {
        let display_name = app.display_name.clone().unwrap_or_default();
        let has_creds = !app.password_credentials.is_empty() || !app.key_credentials.is_empty();

        let unique_name = if seen_names.contains(&display_name) && has_creds {
            format!("{}_{}", display_name, last_chars(&app.id, 4))
        } else {
            seen_names.insert(display_name.clone());
            display_name
        };

        for (cred_type, creds) in [
            (CRED_TYPE_SECRET, &app.password_credentials),
            (CRED_TYPE_CERTIFICATE, &app.key_credentials),
        ] {
            if creds.is_empty() {
                continue;
            }
            entities.push(AppRegistration {
                app_name: unique_name.clone(),
                app_appid: app.app_id.clone(),
                app_id: app.id.clone(),
                app_notes: app.notes.clone(),
                cred_type: cred_type.to_string(),
                app_creds: creds.iter().map(AppCred::from).collect(),
            });
        }
    }

    entities
}

/// Last `n` characters of an id (object ids are ASCII GUIDs, but avoid
/// byte slicing anyway)
fn last_chars(id: &str, n: usize) -> String {
    let count = id.chars().count();
    id.chars().skip(count.saturating_sub(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::client::{build_http_client, ProxyConfig};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(id: &str, name: &str, secrets: usize, certs: usize) -> Application {
        Application {
            id: id.to_string(),
            app_id: format!("appid-{}", id),
            display_name: Some(name.to_string()),
            notes: None,
            password_credentials: (0..secrets).map(|i| cred(&format!("sec-{}", i))).collect(),
            key_credentials: (0..certs).map(|i| cred(&format!("cert-{}", i))).collect(),
        }
    }

    fn cred(key_id: &str) -> RawCredential {
        RawCredential {
            key_id: key_id.to_string(),
            display_name: Some(format!("{}-name", key_id)),
            custom_key_identifier: None,
            end_date_time: Some("2025-06-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_secret_only_app_yields_one_secret_entity() {
        let entities = extract_app_registrations(vec![app("obj-1", "App One", 2, 0)]);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].cred_type, "secret");
        assert_eq!(entities[0].app_creds.len(), 2);
    }

    #[test]
    fn test_app_with_both_groups_yields_two_entities() {
        let entities = extract_app_registrations(vec![app("obj-1", "App One", 1, 2)]);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].cred_type, "secret");
        assert_eq!(entities[0].app_creds.len(), 1);
        assert_eq!(entities[1].cred_type, "certificate");
        assert_eq!(entities[1].app_creds.len(), 2);
        // Both entities describe the same application
        assert_eq!(entities[0].app_id, entities[1].app_id);
        assert_eq!(entities[0].app_name, entities[1].app_name);
    }

    #[test]
    fn test_app_without_credentials_yields_nothing() {
        let entities = extract_app_registrations(vec![app("obj-1", "Empty App", 0, 0)]);
        assert!(entities.is_empty());
    }

    #[test]
    fn test_duplicate_names_get_object_id_suffix() {
        let entities = extract_app_registrations(vec![
            app("1111-aaaa", "Shared Name", 1, 0),
            app("2222-bbbb", "Shared Name", 1, 0),
        ]);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].app_name, "Shared Name");
        assert_eq!(entities[1].app_name, "Shared Name_bbbb");
    }

    #[test]
    fn test_credential_free_app_still_reserves_its_name() {
        // The first holder has no credentials and emits nothing, but a later
        // holder with credentials still collides with the recorded name.
        let entities = extract_app_registrations(vec![
            app("1111-aaaa", "Shared Name", 0, 0),
            app("2222-bbbb", "Shared Name", 1, 0),
        ]);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].app_name, "Shared Name_bbbb");
    }

    #[test]
    fn test_duplicate_without_credentials_keeps_bare_name() {
        let entities = extract_app_registrations(vec![
            app("1111-aaaa", "Shared Name", 1, 0),
            app("2222-bbbb", "Shared Name", 0, 0),
        ]);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].app_name, "Shared Name");
    }

    #[test]
    fn test_field_mapping() {
        let mut application = app("obj-1", "App One", 0, 0);
        application.notes = Some("desc".to_string());
        application.password_credentials = vec![RawCredential {
            key_id: "kid-1".to_string(),
            display_name: None,
            custom_key_identifier: Some("Q1dBUF9BdXRoU2VjcmV0".to_string()),
            end_date_time: Some("2026-01-01T00:00:00Z".to_string()),
        }];

        let entities = extract_app_registrations(vec![application]);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].app_notes.as_deref(), Some("desc"));

        let cred = &entities[0].app_creds[0];
        assert_eq!(cred.cred_id, "kid-1");
        assert_eq!(cred.cred_name, None);
        assert_eq!(cred.cred_identifier.as_deref(), Some("Q1dBUF9BdXRoU2VjcmV0"));
        assert_eq!(cred.cred_expiration.as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_fetch_app_registrations_round_trip() {
        let mock_server = MockServer::start().await;
        let http = build_http_client(Duration::from_secs(5), &ProxyConfig::NoProxy).unwrap();
        let client = GraphClient::new(http, "test-token".to_string(), &mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/v1.0/applications"))
            .and(query_param("$select", SELECT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{
                    "id": "00000000-0000-0000-0000-00000000beef",
                    "appId": "11111111-0000-0000-0000-000000000000",
                    "displayName": "App Registration 1",
                    "notes": "Description of App Registration 1",
                    "passwordCredentials": [{
                        "keyId": "22222222-0000-0000-0000-000000000000",
                        "displayName": "Secret Name 1",
                        "customKeyIdentifier": null,
                        "endDateTime": "2026-01-01T00:00:00Z"
                    }],
                    "keyCredentials": []
                }]
            })))
            .mount(&mock_server)
            .await;

        let entities = fetch_app_registrations(&client).await.unwrap();
        assert_eq!(entities.len(), 1);

        // Parsing the emitted payload reproduces the source values under
        // the stated field mapping
        let json = serde_json::to_string(&entities).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["app_name"], "App Registration 1");
        assert_eq!(parsed[0]["app_appid"], "11111111-0000-0000-0000-000000000000");
        assert_eq!(parsed[0]["app_id"], "00000000-0000-0000-0000-00000000beef");
        assert_eq!(parsed[0]["cred_type"], "secret");
        assert_eq!(
            parsed[0]["app_creds"][0]["cred_id"],
            "22222222-0000-0000-0000-000000000000"
        );
        assert_eq!(
            parsed[0]["app_creds"][0]["cred_expiration"],
            "2026-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_last_chars() {
        assert_eq!(last_chars("1234-abcd", 4), "abcd");
        assert_eq!(last_chars("ab", 4), "ab");
        assert_eq!(last_chars("", 4), "");
    }
}
