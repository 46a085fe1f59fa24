use async_trait::async_trait;

use crate::api::{HttpClient, SubscriptionApi};
use crate::error::ApiResult;
use crate::models::{
    FeatureSubscriptionMapping, NewSubscription, Subscription, SubscriptionUpdate,
    UserSubscriptionMapping,
};

#[derive(Debug, Clone)]
pub struct SubscriptionsClient {
    http: HttpClient,
}

impl SubscriptionsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SubscriptionApi for SubscriptionsClient {
    async fn get_all_subscriptions(&self) -> ApiResult<Vec<Subscription>> {
        self.http.get("/subscriptions").await
    }

    async fn create_subscription(&self, subscription: &NewSubscription) -> ApiResult<Subscription> {
        self.http.post("/subscriptions", subscription).await
    }

    async fn update_subscription(&self, subscription_id: i64, updates: &SubscriptionUpdate) -> ApiResult<()> {
        self.http
            .put_unit(&format!("/subscriptions/update?subscriptionId={}", subscription_id), updates)
            .await
    }

    async fn delete_subscription(&self, subscription_id: i64) -> ApiResult<()> {
        self.http
            .delete_unit(&format!("/subscriptions?subscriptionId={}", subscription_id))
            .await
    }

    async fn get_subscriptions_by_user(&self, user_id: i64) -> ApiResult<Vec<Subscription>> {
        self.http
            .get(&format!("/subscriptions/user?userId={}", user_id))
            .await
    }

    async fn map_user_to_subscription(&self, mapping: &UserSubscriptionMapping) -> ApiResult<UserSubscriptionMapping> {
        self.http.post("/subscriptions/mapping", mapping).await
    }

    async fn get_features_by_subscription(&self, subscription_id: i64) -> ApiResult<Vec<FeatureSubscriptionMapping>> {
        self.http
            .get(&format!("/subscriptions/features/list?subscriptionId={}", subscription_id))
            .await
    }

    async fn map_feature_to_subscription(&self, mapping: &FeatureSubscriptionMapping) -> ApiResult<FeatureSubscriptionMapping> {
        self.http.post("/subscriptions/features", mapping).await
    }
}
