use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub company_guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmrm_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sg_biz_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tally_sync_port: Option<u16>,
    #[serde(default, deserialize_with = "super::timestamp::lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::timestamp::lenient", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial tenant update; the company GUID is not updatable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmrm_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sg_biz_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally_sync_port: Option<u16>,
}

impl TenantUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TenantUpdate::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTenantMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: i64,
    pub tenant_id: i64,
}

impl UserTenantMapping {
    pub fn new(user_id: i64, tenant_id: i64) -> Self {
        Self {
            id: None,
            user_id,
            tenant_id,
        }
    }
}
