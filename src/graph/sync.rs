//! Directory sync status service

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Phase, Result};
use crate::graph::GraphClient;

/// Organization record from the Graph API, projected to the sync fields
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub on_premises_sync_enabled: Option<bool>,
    pub on_premises_last_sync_date_time: Option<String>,
}

/// Normalized sync status consumed by the sync check
#[derive(Serialize, Debug, PartialEq)]
pub struct SyncStatus {
    pub sync_enabled: Option<bool>,
    pub sync_last: Option<String>,
}

const SELECT: &str = "onPremisesSyncEnabled,onPremisesLastSyncDateTime";

/// Fetch the tenant's organization object and extract its sync fields
pub async fn fetch_sync_status(client: &GraphClient) -> Result<SyncStatus> {
    let path = format!("/organization?$select={}", SELECT);
    let orgs: Vec<Organization> = client.fetch_value(&path, Phase::Sync).await?;
    extract_sync_status(orgs)
}

/// The query targets the tenant's own directory, so at least one
/// organization object is expected; an empty listing is a shape error.
pub fn extract_sync_status(orgs: Vec<Organization>) -> Result<SyncStatus> {
    let org = orgs.into_iter().next().ok_or_else(|| AgentError::Shape {
        phase: Phase::Sync,
        message: "organization query returned no records".to_string(),
    })?;

    Ok(SyncStatus {
        sync_enabled: org.on_premises_sync_enabled,
        sync_last: org.on_premises_last_sync_date_time,
    })
}
