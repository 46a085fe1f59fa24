use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{SubscriptionApi, TenantApi, UserApi};
use crate::error::{ApiError, ApiResult};
use crate::models::*;

/// One call seen by [`FakeBackend`]: trait method name plus its JSON arguments
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: &'static str,
    pub body: Value,
}

/// In-memory stand-in for all three API traits.
///
/// Every call is recorded before the canned outcome is produced, so tests can
/// assert both "nothing was sent" and "exactly this was sent".
pub struct FakeBackend {
    calls: Mutex<Vec<RecordedCall>>,
    failure: Option<(u16, String)>,
    token: String,
    tenants: Mutex<Vec<Tenant>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: None,
            token: "test-token".to_string(),
            tenants: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Every call answers with a server error carrying `message`
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Self::new()
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    pub fn set_tenants(&self, tenants: Vec<Tenant>) {
        *self.tenants.lock().unwrap() = tenants;
    }

    pub fn set_subscriptions(&self, subscriptions: Vec<Subscription>) {
        *self.subscriptions.lock().unwrap() = subscriptions;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(&self, endpoint: &'static str, body: impl Serialize) -> ApiResult<()> {
        let body = serde_json::to_value(body).unwrap_or(Value::Null);
        self.calls.lock().unwrap().push(RecordedCall { endpoint, body });

        match &self.failure {
            Some((status, message)) => Err(ApiError::server(*status, message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_user(id: i64, email: &str, name: &str) -> User {
    User {
        id,
        email: email.to_string(),
        name: name.to_string(),
        mobile_number: "5550000000".to_string(),
        country_id: None,
        is_active: true,
        last_login: None,
        created_at: None,
        updated_at: None,
        user_type: UserType::Client,
    }
}

#[async_trait]
impl UserApi for FakeBackend {
    async fn register_user(&self, data: &RegisterUser) -> ApiResult<User> {
        self.record("register_user", data)?;
        Ok(User {
            mobile_number: data.mobile_number.clone(),
            user_type: data.user_type,
            ..sample_user(1, &data.email, &data.name)
        })
    }

    async fn login_user(&self, data: &LoginUser) -> ApiResult<TokenResponse> {
        self.record("login_user", data)?;
        Ok(TokenResponse { token: self.token.clone() })
    }

    async fn get_all_users(&self) -> ApiResult<Vec<User>> {
        self.record("get_all_users", Value::Null)?;
        Ok(vec![sample_user(1, "profile@example.com", "Profile")])
    }

    async fn get_user_by_id(&self, id: i64) -> ApiResult<User> {
        self.record("get_user_by_id", json!({ "id": id }))?;
        Ok(sample_user(id, "profile@example.com", "Profile"))
    }

    async fn update_user(&self, id: i64, data: &UserUpdate) -> ApiResult<()> {
        self.record("update_user", json!({ "id": id, "updates": data }))
    }

    async fn delete_user(&self, id: i64) -> ApiResult<()> {
        self.record("delete_user", json!({ "id": id }))
    }

    async fn get_user_profile(&self) -> ApiResult<User> {
        self.record("get_user_profile", Value::Null)?;
        Ok(sample_user(1, "profile@example.com", "Profile"))
    }

    async fn change_password(&self, data: &PasswordChange) -> ApiResult<()> {
        self.record("change_password", data)
    }
}

#[async_trait]
impl TenantApi for FakeBackend {
    async fn create_tenant(&self, tenant: &Tenant) -> ApiResult<Tenant> {
        self.record("create_tenant", tenant)?;
        Ok(Tenant {
            id: Some(1),
            ..tenant.clone()
        })
    }

    async fn map_user_to_tenant(&self, mapping: &UserTenantMapping) -> ApiResult<UserTenantMapping> {
        self.record("map_user_to_tenant", mapping)?;
        Ok(UserTenantMapping { id: Some(1), ..*mapping })
    }

    async fn map_users_to_tenant(&self, mappings: &[UserTenantMapping]) -> ApiResult<Vec<UserTenantMapping>> {
        self.record("map_users_to_tenant", mappings)?;
        Ok(mappings
            .iter()
            .zip(1..)
            .map(|(m, id)| UserTenantMapping { id: Some(id), ..*m })
            .collect())
    }

    async fn get_all_tenants(&self) -> ApiResult<Vec<Tenant>> {
        self.record("get_all_tenants", Value::Null)?;
        Ok(self.tenants.lock().unwrap().clone())
    }

    async fn get_tenants_by_user(&self, user_id: i64) -> ApiResult<Vec<Tenant>> {
        self.record("get_tenants_by_user", json!({ "userId": user_id }))?;
        Ok(self.tenants.lock().unwrap().clone())
    }

    async fn update_tenant(&self, tenant_id: i64, updates: &TenantUpdate) -> ApiResult<()> {
        self.record("update_tenant", json!({ "tenantId": tenant_id, "updates": updates }))
    }

    async fn delete_user_tenant_mapping(&self, user_id: i64, tenant_id: i64) -> ApiResult<()> {
        self.record(
            "delete_user_tenant_mapping",
            json!({ "userId": user_id, "tenantId": tenant_id }),
        )
    }
}

#[async_trait]
impl SubscriptionApi for FakeBackend {
    async fn get_all_subscriptions(&self) -> ApiResult<Vec<Subscription>> {
        self.record("get_all_subscriptions", Value::Null)?;
        Ok(self.subscriptions.lock().unwrap().clone())
    }

    async fn create_subscription(&self, subscription: &NewSubscription) -> ApiResult<Subscription> {
        self.record("create_subscription", subscription)?;
        Ok(Subscription {
            id: 1,
            name: subscription.name.clone(),
            code: subscription.code.clone(),
            created_at: None,
        })
    }

    async fn update_subscription(&self, subscription_id: i64, updates: &SubscriptionUpdate) -> ApiResult<()> {
        self.record(
            "update_subscription",
            json!({ "subscriptionId": subscription_id, "updates": updates }),
        )
    }

    async fn delete_subscription(&self, subscription_id: i64) -> ApiResult<()> {
        self.record("delete_subscription", json!({ "subscriptionId": subscription_id }))
    }

    async fn get_subscriptions_by_user(&self, user_id: i64) -> ApiResult<Vec<Subscription>> {
        self.record("get_subscriptions_by_user", json!({ "userId": user_id }))?;
        Ok(self.subscriptions.lock().unwrap().clone())
    }

    async fn map_user_to_subscription(&self, mapping: &UserSubscriptionMapping) -> ApiResult<UserSubscriptionMapping> {
        self.record("map_user_to_subscription", mapping)?;
        Ok(UserSubscriptionMapping { id: Some(1), ..*mapping })
    }

    async fn get_features_by_subscription(&self, subscription_id: i64) -> ApiResult<Vec<FeatureSubscriptionMapping>> {
        self.record("get_features_by_subscription", json!({ "subscriptionId": subscription_id }))?;
        Ok(Vec::new())
    }

    async fn map_feature_to_subscription(&self, mapping: &FeatureSubscriptionMapping) -> ApiResult<FeatureSubscriptionMapping> {
        self.record("map_feature_to_subscription", mapping)?;
        Ok(FeatureSubscriptionMapping { id: Some(1), ..*mapping })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_backend_still_records_calls() {
        let fake = FakeBackend::failing(503, "Maintenance");
        let err = fake.get_all_tenants().await.unwrap_err();
        assert_eq!(err.message(), "Maintenance");
        assert_eq!(fake.call_count(), 1);
        assert_eq!(fake.calls()[0].endpoint, "get_all_tenants");
    }
}
