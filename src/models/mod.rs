pub mod subscription;
pub mod tenant;
pub mod timestamp;
pub mod user;

pub use subscription::{
    FeatureSubscriptionMapping, NewSubscription, Subscription, SubscriptionUpdate,
    UserSubscriptionMapping,
};
pub use tenant::{Tenant, TenantUpdate, UserTenantMapping};
pub use user::{LoginUser, PasswordChange, RegisterUser, TokenResponse, User, UserType, UserUpdate};
