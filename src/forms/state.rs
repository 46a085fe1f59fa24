use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::config;
use crate::error::{ApiError, ApiResult};

/// Error code reported for a submit refused by local validation
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

/// Page a controller asks the front end to show next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Profile,
    ChangePassword,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Profile => "/profile",
            Route::ChangePassword => "/change-password",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// What the notification currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Request/notification flags shared by every page.
///
/// `error` and `success` are never both set.
#[derive(Debug, Clone)]
pub struct FormState {
    loading: bool,
    error: Option<String>,
    error_code: Option<&'static str>,
    success: Option<String>,
    opened_at: Option<Instant>,
    auto_hide: Duration,
    redirect: Option<Route>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_auto_hide(config().ui.notification_auto_hide())
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_hide(auto_hide: Duration) -> Self {
        Self {
            loading: false,
            error: None,
            error_code: None,
            success: None,
            opened_at: None,
            auto_hide,
            redirect: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Inputs and the submit control are disabled while a request is in flight
    pub fn can_submit(&self) -> bool {
        !self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Machine-readable kind of the current error: an [`ApiError`] code,
    /// or `VALIDATION_ERROR` for a local rejection
    ///
    /// [`ApiError`]: crate::error::ApiError
    pub fn error_code(&self) -> Option<&'static str> {
        self.error_code
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn notification_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.opened_at?;

        if let Some(message) = &self.error {
            return Some(Notification {
                severity: Severity::Error,
                message: message.clone(),
            });
        }
        self.success.as_ref().map(|message| Notification {
            severity: Severity::Success,
            message: message.clone(),
        })
    }

    pub fn auto_hide(&self) -> Duration {
        self.auto_hide
    }

    pub fn redirect(&self) -> Option<Route> {
        self.redirect
    }

    pub fn take_redirect(&mut self) -> Option<Route> {
        self.redirect.take()
    }

    /// Explicit dismissal; the next cycle starts clean
    pub fn close_notification(&mut self) {
        self.opened_at = None;
        self.error = None;
        self.error_code = None;
        self.success = None;
    }

    /// Close the notification once it has been visible for the auto-hide delay.
    /// Returns true if this call closed it.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.opened_at {
            Some(opened) if now.saturating_duration_since(opened) >= self.auto_hide => {
                self.close_notification();
                true
            }
            _ => false,
        }
    }

    /// Local validation failed: report it without touching `loading`
    pub(crate) fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.error_code = Some(VALIDATION_ERROR_CODE);
        self.success = None;
        self.open();
    }

    /// Enter the loading state. False if a request is already in flight.
    pub(crate) fn begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        self.error_code = None;
        self.success = None;
        self.redirect = None;
        true
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.error_code = None;
        self.success = None;
        self.open();
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = None;
        self.error_code = None;
        self.success = Some(message.into());
        self.open();
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        self.redirect = Some(route);
    }

    /// Map one API result onto the flags, handing back the payload on success
    pub(crate) fn finish<T>(&mut self, result: ApiResult<T>, success_message: &str) -> Option<T> {
        match result {
            Ok(payload) => {
                self.succeed(success_message);
                Some(payload)
            }
            Err(e) => {
                self.fail_with(&e);
                None
            }
        }
    }

    /// Like `finish`, but a success leaves the notification closed
    pub(crate) fn finish_quietly<T>(&mut self, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(payload) => {
                self.loading = false;
                self.error = None;
                self.error_code = None;
                Some(payload)
            }
            Err(e) => {
                self.fail_with(&e);
                None
            }
        }
    }

    fn fail_with(&mut self, error: &ApiError) {
        self.fail(error.message());
        self.error_code = Some(error.error_code());
    }

    fn open(&mut self) {
        self.opened_at = Some(Instant::now());
    }
}

/// Access to the shared flags of any page
pub trait Page {
    fn state(&self) -> &FormState;

    fn state_mut(&mut self) -> &mut FormState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_then_close_starts_clean() {
        let mut state = FormState::with_auto_hide(Duration::from_millis(4000));
        assert!(state.begin());
        assert!(!state.can_submit());

        let payload = state.finish(Ok::<_, ApiError>(5), "Saved");
        assert_eq!(payload, Some(5));
        assert!(!state.loading());
        assert_eq!(state.success(), Some("Saved"));
        assert_eq!(state.error(), None);
        assert_eq!(
            state.notification(),
            Some(Notification { severity: Severity::Success, message: "Saved".into() })
        );

        state.close_notification();
        assert!(!state.notification_open());
        assert_eq!(state.success(), None);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn failure_sets_error_and_clears_success() {
        let mut state = FormState::with_auto_hide(Duration::from_secs(4));
        state.begin();
        state.succeed("old");
        state.begin();

        let payload: Option<()> = state.finish(Err(ApiError::server(400, "Bad code")), "Saved");
        assert!(payload.is_none());
        assert_eq!(state.error(), Some("Bad code"));
        assert_eq!(state.success(), None);
        assert_eq!(state.notification().map(|n| n.severity), Some(Severity::Error));
    }

    #[test]
    fn error_code_follows_the_failure_kind() {
        let mut state = FormState::with_auto_hide(Duration::from_millis(4000));
        state.reject("Please fix the validation errors.");
        assert_eq!(state.error_code(), Some(VALIDATION_ERROR_CODE));

        assert!(state.begin());
        assert_eq!(state.error_code(), None);
        let _: Option<()> = state.finish(Err(ApiError::server(409, "Taken")), "Saved");
        assert_eq!(state.error_code(), Some("SERVER_ERROR"));

        assert!(state.begin());
        let _: Option<()> = state.finish(Err(ApiError::unexpected(anyhow::anyhow!("refused"))), "Saved");
        assert_eq!(state.error_code(), Some("UNEXPECTED_ERROR"));

        state.close_notification();
        assert_eq!(state.error_code(), None);
    }

    #[test]
    fn begin_refuses_while_loading() {
        let mut state = FormState::with_auto_hide(Duration::from_secs(4));
        assert!(state.begin());
        assert!(!state.begin());
    }

    #[test]
    fn tick_closes_after_auto_hide() {
        let mut state = FormState::with_auto_hide(Duration::from_millis(4000));
        state.reject("Both Name and Code are required.");
        let opened = Instant::now();

        assert!(!state.tick(opened));
        assert!(state.notification_open());

        assert!(state.tick(opened + Duration::from_millis(4001)));
        assert!(!state.notification_open());
        assert_eq!(state.error(), None);
        assert!(!state.tick(opened + Duration::from_secs(10)));
    }

    #[test]
    fn quiet_success_keeps_notification_closed() {
        let mut state = FormState::with_auto_hide(Duration::from_secs(4));
        state.begin();
        let list = state.finish_quietly(Ok::<_, ApiError>(vec![1, 2]));
        assert_eq!(list, Some(vec![1, 2]));
        assert!(!state.notification_open());
        assert!(!state.loading());
    }

    #[test]
    fn route_paths() {
        assert_eq!(Route::Profile.path(), "/profile");
        assert_eq!(Route::Login.path(), "/login");
    }
}
