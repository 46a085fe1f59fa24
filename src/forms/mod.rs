//! Headless page controllers.
//!
//! Each controller owns its field values and a [`FormState`]. `submit` (or
//! `load` for read-only pages) validates locally, makes at most one API call
//! and leaves the outcome in the state for the front end to render.

pub mod state;
pub mod subscriptions;
pub mod tenants;
pub mod users;
pub mod validate;

/// Shown when any field-level check fails on a multi-field form
pub const FIX_VALIDATION_ERRORS: &str = "Please fix the validation errors.";

pub use state::{FormState, Notification, Page, Route, Severity};
pub use subscriptions::{
    CreateSubscriptionForm, MapFeatureToSubscriptionForm, MapUserToSubscriptionForm,
    SubscriptionListPage,
};
pub use tenants::{
    CreateTenantForm, DeleteTenantMappingForm, MapUserToTenantForm, MapUsersToTenantForm,
    TenantListPage, UpdateTenantForm,
};
pub use users::{ChangePasswordForm, LoginForm, ProfilePage, RegisterForm};
pub use validate::{encode_password, ValidationErrors};
