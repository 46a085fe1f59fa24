use crate::api::{CredentialStore, UserApi};
use crate::forms::state::{FormState, Page, Route};
use crate::forms::validate::{
    encode_password, is_short_password, is_valid_email, is_valid_mobile, ValidationErrors,
};
use crate::forms::FIX_VALIDATION_ERRORS;
use crate::models::{LoginUser, PasswordChange, RegisterUser, User, UserType};

fn check_email(errors: &mut ValidationErrors, field: &'static str, email: &str) {
    if !errors.require(field, email, "Email is required") && !is_valid_email(email) {
        errors.add(field, "Invalid email format");
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    email: String,
    name: String,
    mobile_number: String,
    password: String,
    user_type: UserType,
    field_errors: ValidationErrors,
    state: FormState,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.field_errors.clear_field("email");
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.field_errors.clear_field("name");
    }

    pub fn set_mobile_number(&mut self, value: impl Into<String>) {
        self.mobile_number = value.into();
        self.field_errors.clear_field("mobile_number");
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.field_errors.clear_field("password");
    }

    pub fn set_user_type(&mut self, user_type: UserType) {
        self.user_type = user_type;
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::new();

        check_email(&mut errors, "email", &self.email);
        errors.require("name", &self.name, "Name is required");
        if !errors.require("mobile_number", &self.mobile_number, "Mobile number is required")
            && !is_valid_mobile(&self.mobile_number)
        {
            errors.add("mobile_number", "Mobile number must be 10-15 digits");
        }
        if !errors.require_present("password", &self.password, "Password is required")
            && is_short_password(&self.password)
        {
            errors.add("password", "Password must be at least 6 characters");
        }

        self.field_errors = errors;
        self.field_errors.is_empty()
    }

    pub async fn submit<A: UserApi + ?Sized>(&mut self, api: &A) -> Option<User> {
        if !self.state.can_submit() {
            return None;
        }
        if !self.validate() {
            self.state.reject(FIX_VALIDATION_ERRORS);
            return None;
        }
        self.state.begin();

        let payload = RegisterUser {
            email: self.email.clone(),
            name: self.name.clone(),
            mobile_number: self.mobile_number.clone(),
            password: encode_password(&self.password),
            user_type: self.user_type,
        };

        let result = api.register_user(&payload).await;
        self.state.finish(result, "User registered successfully")
    }
}

impl Page for RegisterForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    field_errors: ValidationErrors,
    state: FormState,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.field_errors.clear_field("email");
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.field_errors.clear_field("password");
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// "Forgot password" link
    pub fn forgot_password(&mut self) {
        self.state.navigate(Route::ChangePassword);
    }

    fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        errors.require_present("password", &self.password, "Password is required");

        self.field_errors = errors;
        self.field_errors.is_empty()
    }

    /// On success the token is stored and navigation to the profile is requested
    pub async fn submit<A: UserApi + ?Sized>(
        &mut self,
        api: &A,
        credentials: &dyn CredentialStore,
    ) -> bool {
        if !self.state.can_submit() {
            return false;
        }
        if !self.validate() {
            self.state.reject(FIX_VALIDATION_ERRORS);
            return false;
        }
        self.state.begin();

        let payload = LoginUser {
            email: self.email.clone(),
            password: encode_password(&self.password),
        };

        let result = api.login_user(&payload).await;
        let Some(token) = self.state.finish_quietly(result) else {
            return false;
        };

        if let Err(e) = credentials.set_token(&token.token) {
            tracing::warn!("Login succeeded but the token could not be stored: {}", e);
            self.state.fail("Could not save the session token");
            return false;
        }

        tracing::info!("Logged in as {}", self.email);
        self.state.succeed("Login successful!");
        self.state.navigate(Route::Profile);
        true
    }
}

impl Page for LoginForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    email_id: String,
    old_password: String,
    new_password: String,
    field_errors: ValidationErrors,
    state: FormState,
}

impl ChangePasswordForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email_id = value.into();
        self.field_errors.clear_field("email_id");
    }

    pub fn set_old_password(&mut self, value: impl Into<String>) {
        self.old_password = value.into();
        self.field_errors.clear_field("old_password");
    }

    pub fn set_new_password(&mut self, value: impl Into<String>) {
        self.new_password = value.into();
        self.field_errors.clear_field("new_password");
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::new();

        errors.require_present("old_password", &self.old_password, "Old password is required");
        if !errors.require_present("new_password", &self.new_password, "New password is required")
            && is_short_password(&self.new_password)
        {
            errors.add("new_password", "New password must be at least 6 characters");
        }
        check_email(&mut errors, "email_id", &self.email_id);

        self.field_errors = errors;
        self.field_errors.is_empty()
    }

    pub async fn submit<A: UserApi + ?Sized>(&mut self, api: &A) -> bool {
        if !self.state.can_submit() {
            return false;
        }
        if !self.validate() {
            self.state.reject(FIX_VALIDATION_ERRORS);
            return false;
        }
        self.state.begin();

        let payload = PasswordChange {
            old_password: encode_password(&self.old_password),
            new_password: encode_password(&self.new_password),
            email_id: self.email_id.clone(),
        };

        let result = api.change_password(&payload).await;
        self.state.finish(result, "Password changed successfully").is_some()
    }
}

impl Page for ChangePasswordForm {
    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

/// Profile of the logged-in user, fetched on load
#[derive(Debug, Clone, Default)]
pub struct ProfilePage {
    profile: Option<User>,
    state: FormState,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    /// Without a stored token no request is made and login is requested instead
    pub async fn load<A: UserApi + ?Sized>(
        &mut self,
        api: &A,
        credentials: &dyn CredentialStore,
    ) -> Option<&User> {
        if !self.state.can_submit() {
            return None;
        }
        if credentials.token().is_none() {
            self.state.reject("No token found. Please login.");
            self.state.navigate(Route::Login);
            return None;
        }
        self.state.begin();

        let result = api.get_user_profile().await;
        let user = self.state.finish(result, "Profile loaded successfully!")?;
        self.profile = Some(user);
        self.profile.as_ref()
    }
}

impl Page for ProfilePage {
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
    use crate::api::MemoryCredentials;
    use crate::forms::validate::decode_password;
    use crate::testing::FakeBackend;

    fn filled_register() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.set_email("ada@example.com");
        form.set_name("Ada");
        form.set_mobile_number("5551234567");
        form.set_password("hunter22");
        form
    }

    #[tokio::test]
    async fn register_with_missing_fields_never_calls_backend() {
        let api = FakeBackend::new();
        let mut form = filled_register();
        form.set_name("");

        assert!(form.submit(&api).await.is_none());
        assert_eq!(api.call_count(), 0);
        assert!(!form.state().loading());
        assert_eq!(form.state().error(), Some(FIX_VALIDATION_ERRORS));
        assert!(form.state().notification_open());
        assert_eq!(form.field_errors().get("name"), Some("Name is required"));

        form.set_name("Ada");
        assert_eq!(form.field_errors().get("name"), None);
    }

    #[tokio::test]
    async fn register_checks_formats() {
        let api = FakeBackend::new();
        let mut form = filled_register();
        form.set_email("ada.example.com");
        form.set_mobile_number("12345");
        form.set_password("abc");

        form.submit(&api).await;
        assert_eq!(api.call_count(), 0);
        assert_eq!(form.field_errors().get("email"), Some("Invalid email format"));
        assert_eq!(form.field_errors().get("mobile_number"), Some("Mobile number must be 10-15 digits"));
        assert_eq!(form.field_errors().get("password"), Some("Password must be at least 6 characters"));
    }

    #[tokio::test]
    async fn register_sends_encoded_password() {
        let api = FakeBackend::new();
        let mut form = filled_register();

        let user = form.submit(&api).await.expect("registered");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(form.state().success(), Some("User registered successfully"));
        assert_eq!(form.state().error(), None);

        let call = api.last_call().unwrap();
        assert_eq!(call.endpoint, "register_user");
        assert_eq!(call.body["password"], encode_password("hunter22"));
        assert_ne!(call.body["password"], "hunter22");
        assert_eq!(call.body["type"], "client");
    }

    #[tokio::test]
    async fn whitespace_passwords_are_sent_untrimmed() {
        let api = FakeBackend::new();
        let mut form = filled_register();
        form.set_password("      ");

        assert!(form.submit(&api).await.is_some());
        assert_eq!(api.last_call().unwrap().body["password"], encode_password("      "));

        let credentials = MemoryCredentials::new();
        let mut login = LoginForm::new();
        login.set_email("a@b.com");
        login.set_password(" ");
        assert!(login.submit(&api, &credentials).await);
        assert_eq!(api.last_call().unwrap().body["password"], encode_password(" "));

        let mut change = ChangePasswordForm::new();
        change.set_email("a@b.com");
        change.set_old_password(" ");
        change.set_new_password("   pw ");
        assert!(change.submit(&api).await);
        assert!(change.field_errors().is_empty());
    }

    #[tokio::test]
    async fn register_surfaces_server_message() {
        let api = FakeBackend::failing(409, "Email already registered");
        let mut form = filled_register();

        assert!(form.submit(&api).await.is_none());
        assert_eq!(form.state().error(), Some("Email already registered"));
        assert_eq!(form.state().success(), None);
        assert!(!form.state().loading());
    }

    #[tokio::test]
    async fn login_stores_token_and_requests_profile() {
        let api = FakeBackend::new().with_token("abc");
        let credentials = MemoryCredentials::new();
        let mut form = LoginForm::new();
        form.set_email("a@b.com");
        form.set_password("secret");

        assert!(form.submit(&api, &credentials).await);
        assert_eq!(credentials.token().as_deref(), Some("abc"));
        assert_eq!(form.state().success(), Some("Login successful!"));
        assert!(form.state().notification_open());
        assert_eq!(form.state().redirect(), Some(Route::Profile));

        let call = api.last_call().unwrap();
        assert_eq!(call.body["email"], "a@b.com");
        let sent = call.body["password"].as_str().unwrap();
        assert_eq!(decode_password(sent).as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn login_rejects_bad_email_without_calling() {
        let api = FakeBackend::new();
        let credentials = MemoryCredentials::new();
        let mut form = LoginForm::new();
        form.set_email("not-an-email");
        form.set_password("secret");

        assert!(!form.submit(&api, &credentials).await);
        assert_eq!(api.call_count(), 0);
        assert_eq!(form.state().error(), Some("Please fix the validation errors."));
        assert_eq!(credentials.token(), None);
        assert_eq!(form.state().redirect(), None);
    }

    #[tokio::test]
    async fn login_failure_keeps_token_unset() {
        let api = FakeBackend::failing(401, "Invalid credentials");
        let credentials = MemoryCredentials::new();
        let mut form = LoginForm::new();
        form.set_email("a@b.com");
        form.set_password("wrong");

        assert!(!form.submit(&api, &credentials).await);
        assert_eq!(form.state().error(), Some("Invalid credentials"));
        assert_eq!(credentials.token(), None);
        assert_eq!(form.state().redirect(), None);
    }

    #[tokio::test]
    async fn change_password_encodes_both_passwords() {
        let api = FakeBackend::new();
        let mut form = ChangePasswordForm::new();
        form.set_email("a@b.com");
        form.set_old_password("old-secret");
        form.set_new_password("new-secret");

        assert!(form.submit(&api).await);
        assert_eq!(form.state().success(), Some("Password changed successfully"));

        let call = api.last_call().unwrap();
        assert_eq!(call.body["old_password"], encode_password("old-secret"));
        assert_eq!(call.body["new_password"], encode_password("new-secret"));
        assert_eq!(call.body["email_id"], "a@b.com");
    }

    #[tokio::test]
    async fn change_password_requires_long_new_password() {
        let api = FakeBackend::new();
        let mut form = ChangePasswordForm::new();
        form.set_email("a@b.com");
        form.set_old_password("old-secret");
        form.set_new_password("short");

        assert!(!form.submit(&api).await);
        assert_eq!(api.call_count(), 0);
        assert_eq!(
            form.field_errors().get("new_password"),
            Some("New password must be at least 6 characters")
        );
    }

    #[tokio::test]
    async fn profile_without_token_redirects_to_login() {
        let api = FakeBackend::new();
        let credentials = MemoryCredentials::new();
        let mut page = ProfilePage::new();

        assert!(page.load(&api, &credentials).await.is_none());
        assert_eq!(api.call_count(), 0);
        assert_eq!(page.state().error(), Some("No token found. Please login."));
        assert_eq!(page.state().redirect(), Some(Route::Login));
    }

    #[tokio::test]
    async fn profile_loads_with_token() {
        let api = FakeBackend::new();
        let credentials = MemoryCredentials::with_token("abc");
        let mut page = ProfilePage::new();

        let user = page.load(&api, &credentials).await.cloned().expect("profile");
        assert_eq!(user.email, "profile@example.com");
        assert_eq!(page.state().success(), Some("Profile loaded successfully!"));
    }
}
