pub mod client;
pub mod credentials;
pub mod subscriptions;
pub mod tenants;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    FeatureSubscriptionMapping, LoginUser, NewSubscription, PasswordChange, RegisterUser,
    Subscription, SubscriptionUpdate, Tenant, TenantUpdate, TokenResponse, User,
    UserSubscriptionMapping, UserTenantMapping, UserUpdate,
};

pub use client::HttpClient;
pub use credentials::{CredentialError, CredentialStore, FileCredentials, MemoryCredentials};
pub use subscriptions::SubscriptionsClient;
pub use tenants::TenantsClient;
pub use users::UsersClient;

/// User, session and profile endpoints
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn register_user(&self, data: &RegisterUser) -> ApiResult<User>;
    async fn login_user(&self, data: &LoginUser) -> ApiResult<TokenResponse>;
    async fn get_all_users(&self) -> ApiResult<Vec<User>>;
    async fn get_user_by_id(&self, id: i64) -> ApiResult<User>;
    async fn update_user(&self, id: i64, data: &UserUpdate) -> ApiResult<()>;
    async fn delete_user(&self, id: i64) -> ApiResult<()>;
    async fn get_user_profile(&self) -> ApiResult<User>;
    async fn change_password(&self, data: &PasswordChange) -> ApiResult<()>;
}

/// Tenant and user-tenant mapping endpoints
#[async_trait]
pub trait TenantApi: Send + Sync {
    async fn create_tenant(&self, tenant: &Tenant) -> ApiResult<Tenant>;
    async fn map_user_to_tenant(&self, mapping: &UserTenantMapping) -> ApiResult<UserTenantMapping>;
    async fn map_users_to_tenant(&self, mappings: &[UserTenantMapping]) -> ApiResult<Vec<UserTenantMapping>>;
    async fn get_all_tenants(&self) -> ApiResult<Vec<Tenant>>;
    async fn get_tenants_by_user(&self, user_id: i64) -> ApiResult<Vec<Tenant>>;
    async fn update_tenant(&self, tenant_id: i64, updates: &TenantUpdate) -> ApiResult<()>;
    async fn delete_user_tenant_mapping(&self, user_id: i64, tenant_id: i64) -> ApiResult<()>;
}

/// Subscription, user-subscription and feature-subscription endpoints
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn get_all_subscriptions(&self) -> ApiResult<Vec<Subscription>>;
    async fn create_subscription(&self, subscription: &NewSubscription) -> ApiResult<Subscription>;
    async fn update_subscription(&self, subscription_id: i64, updates: &SubscriptionUpdate) -> ApiResult<()>;
    async fn delete_subscription(&self, subscription_id: i64) -> ApiResult<()>;
    async fn get_subscriptions_by_user(&self, user_id: i64) -> ApiResult<Vec<Subscription>>;
    async fn map_user_to_subscription(&self, mapping: &UserSubscriptionMapping) -> ApiResult<UserSubscriptionMapping>;
    async fn get_features_by_subscription(&self, subscription_id: i64) -> ApiResult<Vec<FeatureSubscriptionMapping>>;
    async fn map_feature_to_subscription(&self, mapping: &FeatureSubscriptionMapping) -> ApiResult<FeatureSubscriptionMapping>;
}

/// All three resource clients over one connection pool.
///
/// Only the user client carries the credential store; tenant and
/// subscription requests go out without a token header.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub users: UsersClient,
    pub tenants: TenantsClient,
    pub subscriptions: SubscriptionsClient,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> anyhow::Result<Self> {
        let pool = reqwest::Client::new();
        let plain = HttpClient::with_reqwest(pool, base_url)?;

        Ok(Self {
            users: UsersClient::new(plain.clone().with_credentials(credentials)),
            tenants: TenantsClient::new(plain.clone()),
            subscriptions: SubscriptionsClient::new(plain),
        })
    }
}
