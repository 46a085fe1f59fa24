use crate::api::SubscriptionApi;
use crate::forms::state::{FormState, Page};
use crate::models::{
    FeatureSubscriptionMapping, NewSubscription, Subscription, UserSubscriptionMapping,
};

pub const NAME_AND_CODE_REQUIRED: &str = "Both Name and Code are required.";

#[derive(Debug, Clone, Default)]
pub struct CreateSubscriptionForm {
    name: String,
    code: String,
    state: FormState,
}

impl CreateSubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_code(&mut self, value: impl Into<String>) {
        self.code = value.into();
    }

    pub async fn submit<A: SubscriptionApi + ?Sized>(&mut self, api: &A) -> Option<Subscription> {
        if !self.state.can_submit() {
            return None;
        }
        if self.name.trim().is_empty() || self.code.trim().is_empty() {
            self.state.reject(NAME_AND_CODE_REQUIRED);
            return None;
        }
        self.state.begin();

        let subscription = NewSubscription {
            name: self.name.clone(),
            code: self.code.clone(),
        };
        let result = api.create_subscription(&subscription).await;
        self.state.finish(result, "Subscription Created Successfully!")
    }
}

impl Page for CreateSubscriptionForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionListPage {
    subscriptions: Vec<Subscription>,
    state: FormState,
}

impl SubscriptionListPage {
    pub const EMPTY_MESSAGE: &'static str = "No subscriptions available.";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub async fn load<A: SubscriptionApi + ?Sized>(&mut self, api: &A) -> &[Subscription] {
        if self.state.begin() {
            let result = api.get_all_subscriptions().await;
            if let Some(subscriptions) = self.state.finish_quietly(result) {
                self.subscriptions = subscriptions;
            }
        }
        &self.subscriptions
    }
}

impl Page for SubscriptionListPage {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapUserToSubscriptionForm {
    user_id: i64,
    subscription_id: i64,
    state: FormState,
}

impl MapUserToSubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_id(&mut self, id: i64) {
        self.user_id = id;
    }

    pub fn set_subscription_id(&mut self, id: i64) {
        self.subscription_id = id;
    }

    pub async fn submit<A: SubscriptionApi + ?Sized>(&mut self, api: &A) -> Option<UserSubscriptionMapping> {
        if !self.state.can_submit() {
            return None;
        }
        if self.user_id <= 0 || self.subscription_id <= 0 {
            self.state.reject("Both User ID and Subscription ID are required.");
            return None;
        }
        self.state.begin();

        let mapping = UserSubscriptionMapping {
            id: None,
            user_id: self.user_id,
            subscription_id: self.subscription_id,
        };
        let result = api.map_user_to_subscription(&mapping).await;
        self.state.finish(result, "User successfully mapped to subscription")
    }
}

impl Page for MapUserToSubscriptionForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapFeatureToSubscriptionForm {
    feature_id: i64,
    subscription_id: i64,
    state: FormState,
}

impl MapFeatureToSubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_feature_id(&mut self, id: i64) {
        self.feature_id = id;
    }

    pub fn set_subscription_id(&mut self, id: i64) {
        self.subscription_id = id;
    }

    pub async fn submit<A: SubscriptionApi + ?Sized>(&mut self, api: &A) -> Option<FeatureSubscriptionMapping> {
        if !self.state.can_submit() {
            return None;
        }
        if self.feature_id <= 0 || self.subscription_id <= 0 {
            self.state.reject("Both Feature ID and Subscription ID are required.");
            return None;
        }
        self.state.begin();

        let mapping = FeatureSubscriptionMapping {
            id: None,
            feature_id: self.feature_id,
            subscription_id: self.subscription_id,
        };
        let result = api.map_feature_to_subscription(&mapping).await;
        self.state.finish(result, "Feature successfully mapped to subscription")
    }
}

impl Page for MapFeatureToSubscriptionForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use serde_json::json;

    #[tokio::test]
    async fn empty_name_is_rejected_locally() {
        let api = FakeBackend::new();
        let mut form = CreateSubscriptionForm::new();
        form.set_code("GOLD");

        assert!(form.submit(&api).await.is_none());
        assert_eq!(api.call_count(), 0);
        assert!(!form.state().loading());
        assert_eq!(form.state().error(), Some(NAME_AND_CODE_REQUIRED));
        assert!(form.state().notification_open());
    }

    #[tokio::test]
    async fn blank_code_is_rejected_locally() {
        let api = FakeBackend::new();
        let mut form = CreateSubscriptionForm::new();
        form.set_name("Gold");
        form.set_code("   ");

        assert!(form.submit(&api).await.is_none());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn create_then_close_resets_state() {
        let api = FakeBackend::new();
        let mut form = CreateSubscriptionForm::new();
        form.set_name("Gold");
        form.set_code("GOLD");

        let created = form.submit(&api).await.expect("created");
        assert_eq!(created.code, "GOLD");
        assert_eq!(api.last_call().unwrap().body, json!({"name": "Gold", "code": "GOLD"}));
        assert_eq!(form.state().success(), Some("Subscription Created Successfully!"));

        form.state_mut().close_notification();
        assert_eq!(form.state().success(), None);
        assert_eq!(form.state().error(), None);
    }

    #[tokio::test]
    async fn server_message_becomes_error() {
        let api = FakeBackend::failing(400, "Code already exists");
        let mut form = CreateSubscriptionForm::new();
        form.set_name("Gold");
        form.set_code("GOLD");

        assert!(form.submit(&api).await.is_none());
        assert_eq!(form.state().error(), Some("Code already exists"));
        assert_eq!(form.state().success(), None);
    }

    #[tokio::test]
    async fn list_page_loads_subscriptions() {
        let api = FakeBackend::new();
        api.set_subscriptions(vec![Subscription {
            id: 1,
            name: "Gold".into(),
            code: "GOLD".into(),
            created_at: None,
        }]);

        let mut page = SubscriptionListPage::new();
        let loaded = page.load(&api).await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Gold");
    }

    #[tokio::test]
    async fn feature_mapping_requires_both_ids() {
        let api = FakeBackend::new();
        let mut form = MapFeatureToSubscriptionForm::new();
        form.set_subscription_id(3);

        assert!(form.submit(&api).await.is_none());
        assert_eq!(api.call_count(), 0);

        form.set_feature_id(8);
        let mapping = form.submit(&api).await.expect("mapped");
        assert_eq!(mapping.feature_id, 8);
        assert_eq!(
            api.last_call().unwrap().body,
            json!({"featureId": 8, "subscriptionId": 3})
        );
    }

    #[tokio::test]
    async fn user_subscription_mapping() {
        let api = FakeBackend::new();
        let mut form = MapUserToSubscriptionForm::new();
        form.set_user_id(2);
        form.set_subscription_id(5);

        assert!(form.submit(&api).await.is_some());
        assert_eq!(form.state().success(), Some("User successfully mapped to subscription"));
    }
}
