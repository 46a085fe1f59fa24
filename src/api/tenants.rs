use async_trait::async_trait;

use crate::api::{HttpClient, TenantApi};
use crate::error::ApiResult;
use crate::models::{Tenant, TenantUpdate, UserTenantMapping};

#[derive(Debug, Clone)]
pub struct TenantsClient {
    http: HttpClient,
}

impl TenantsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TenantApi for TenantsClient {
    async fn create_tenant(&self, tenant: &Tenant) -> ApiResult<Tenant> {
        self.http.post("/tenants", tenant).await
    }

    async fn map_user_to_tenant(&self, mapping: &UserTenantMapping) -> ApiResult<UserTenantMapping> {
        self.http.post("/tenants/mapping", mapping).await
    }

    async fn map_users_to_tenant(&self, mappings: &[UserTenantMapping]) -> ApiResult<Vec<UserTenantMapping>> {
        self.http.post("/tenants/mappings", mappings).await
    }

    async fn get_all_tenants(&self) -> ApiResult<Vec<Tenant>> {
        self.http.get("/tenants").await
    }

    async fn get_tenants_by_user(&self, user_id: i64) -> ApiResult<Vec<Tenant>> {
        self.http.get(&format!("/tenants/user?userId={}", user_id)).await
    }

    async fn update_tenant(&self, tenant_id: i64, updates: &TenantUpdate) -> ApiResult<()> {
        self.http
            .put_unit(&format!("/tenants/update?tenantId={}", tenant_id), updates)
            .await
    }

    async fn delete_user_tenant_mapping(&self, user_id: i64, tenant_id: i64) -> ApiResult<()> {
        self.http
            .delete_unit(&format!("/tenants/mapping?userId={}&tenantId={}", user_id, tenant_id))
            .await
    }
}
