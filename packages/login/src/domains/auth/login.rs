//! Login screen flow: collect a mobile number and request an OTP.

use lazy_static::lazy_static;
use otp_api::RequestOutcome;
use regex::Regex;

use super::{Alert, GENERIC_ERROR_MESSAGE};
use crate::kernel::BaseOtpService;

pub const INVALID_MOBILE_MESSAGE: &str = "Please enter a valid 10-digit mobile number";

lazy_static! {
    static ref MOBILE_PATTERN: Regex =
        Regex::new(r"^[0-9]{10}$").expect("mobile pattern is valid");
}

/// True iff `s` is exactly 10 ASCII digits.
pub fn is_valid_mobile(s: &str) -> bool {
    MOBILE_PATTERN.is_match(s)
}

#[derive(Debug, Default)]
pub struct LoginFlow {
    mobile: String,
    loading: bool,
    error: Option<String>,
    alert: Option<Alert>,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entered number; any stale inline error is cleared.
    pub fn set_mobile(&mut self, mobile: impl Into<String>) {
        self.mobile = mobile.into();
        self.error = None;
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        is_valid_mobile(&self.mobile) && !self.loading
    }

    /// Request an OTP. Returns the mobile number to carry into the verify
    /// flow on success, `None` otherwise. Failures are terminal until the
    /// user re-triggers; there is no automatic retry.
    pub async fn send(&mut self, otp: &dyn BaseOtpService) -> Option<String> {
        self.error = None;

        if !is_valid_mobile(&self.mobile) {
            self.error = Some(INVALID_MOBILE_MESSAGE.to_string());
            return None;
        }
        if self.loading {
            return None;
        }

        self.loading = true;
        let result = otp.send_otp(&self.mobile).await;
        self.loading = false;

        match result {
            Ok(RequestOutcome::Success { .. }) => Some(self.mobile.clone()),
            Ok(RequestOutcome::Failure { error }) => {
                // Send/resend surface the server's error verbatim
                self.error = Some(error.clone());
                self.alert = Some(Alert::error(error));
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "send OTP request failed");
                self.error = Some(GENERIC_ERROR_MESSAGE.to_string());
                self.alert = Some(Alert::error(GENERIC_ERROR_MESSAGE));
                None
            }
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{failure_outcome, MockOtpService};

    #[test]
    fn validator_accepts_exactly_ten_digits() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("0000000000"));

        assert!(!is_valid_mobile("123"));
        assert!(!is_valid_mobile("98765432100"));
        assert!(!is_valid_mobile("98765abcde"));
        assert!(!is_valid_mobile("987654321 "));
        assert!(!is_valid_mobile("+919876543210"));
        assert!(!is_valid_mobile(""));
    }

    #[tokio::test]
    async fn send_carries_mobile_forward_on_success() {
        let otp = MockOtpService::new();
        let mut flow = LoginFlow::new();
        flow.set_mobile("9876543210");

        let carried = flow.send(&otp).await;

        assert_eq!(carried, Some("9876543210".to_string()));
        assert_eq!(otp.send_calls(), vec!["9876543210".to_string()]);
        assert!(flow.error().is_none());
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn invalid_mobile_never_hits_the_network() {
        let otp = MockOtpService::new();
        let mut flow = LoginFlow::new();
        flow.set_mobile("123");

        let carried = flow.send(&otp).await;

        assert_eq!(carried, None);
        assert!(otp.send_calls().is_empty());
        assert_eq!(flow.error(), Some(INVALID_MOBILE_MESSAGE));
    }

    #[tokio::test]
    async fn structured_failure_surfaces_server_error_verbatim() {
        let otp = MockOtpService::new().with_send_outcome(failure_outcome("mobile not registered"));
        let mut flow = LoginFlow::new();
        flow.set_mobile("9876543210");

        assert_eq!(flow.send(&otp).await, None);
        assert_eq!(flow.error(), Some("mobile not registered"));
        assert_eq!(
            flow.alert().map(|a| a.message.as_str()),
            Some("mobile not registered")
        );
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn transport_failure_shows_generic_message() {
        let otp = MockOtpService::new().with_send_error("connection refused");
        let mut flow = LoginFlow::new();
        flow.set_mobile("9876543210");

        assert_eq!(flow.send(&otp).await, None);
        assert_eq!(flow.error(), Some(GENERIC_ERROR_MESSAGE));
        assert_eq!(
            flow.alert().map(|a| a.message.as_str()),
            Some(GENERIC_ERROR_MESSAGE)
        );
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn user_can_retry_after_failure() {
        let otp = MockOtpService::new().with_send_outcome(failure_outcome("temporary"));
        let mut flow = LoginFlow::new();
        flow.set_mobile("9876543210");

        assert_eq!(flow.send(&otp).await, None);
        // Second attempt falls through to the queued default success
        assert_eq!(flow.send(&otp).await, Some("9876543210".to_string()));
        assert_eq!(otp.send_calls().len(), 2);
    }

    #[test]
    fn editing_the_number_clears_the_inline_error() {
        let mut flow = LoginFlow::new();
        flow.set_mobile("123");
        flow.error = Some(INVALID_MOBILE_MESSAGE.to_string());

        flow.set_mobile("1234");
        assert!(flow.error().is_none());
    }
}
