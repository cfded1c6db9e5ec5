//! OTP entry state machine.
//!
//! Four single-digit slots with auto-advancing focus, auto-submit once the
//! final slot fills, a 60-second countdown gating resend, and a best-effort
//! auto-fill path fed from the SMS bridge. Verify and resend each own their
//! in-flight flag; every exit path clears its flag and, on failure, the
//! buffer, so stale partial input is never reused.

use otp_api::RequestOutcome;

use super::navigation::Screen;
use super::{Alert, GENERIC_ERROR_MESSAGE};
use crate::kernel::{extract_otp, BaseOtpService};

pub const OTP_LEN: usize = 4;
pub const RESEND_DELAY_SECS: u32 = 60;

pub const INCOMPLETE_OTP_MESSAGE: &str = "Please enter complete 4-digit OTP";
pub const VERIFY_SUCCESS_MESSAGE: &str = "OTP verified successfully!";
pub const RESEND_SUCCESS_MESSAGE: &str = "OTP sent successfully!";
pub const RESEND_FAILED_MESSAGE: &str = "Failed to resend OTP. Please try again.";

/// Resend gate. `can_resend` is true exactly when the remaining seconds hit 0
/// and stays true until the next successful resend resets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn start() -> Self {
        Self {
            remaining: RESEND_DELAY_SECS,
        }
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn can_resend(&self) -> bool {
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = RESEND_DELAY_SECS;
    }
}

pub struct VerifyFlow {
    mobile: String,
    otp: [Option<char>; OTP_LEN],
    focus: usize,
    loading: bool,
    resend_loading: bool,
    countdown: Countdown,
    error: Option<String>,
    alert: Option<Alert>,
}

impl VerifyFlow {
    pub fn new(mobile: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            otp: [None; OTP_LEN],
            focus: 0,
            loading: false,
            resend_loading: false,
            countdown: Countdown::start(),
            error: None,
            alert: None,
        }
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn slots(&self) -> &[Option<char>; OTP_LEN] {
        &self.otp
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_resend_loading(&self) -> bool {
        self.resend_loading
    }

    pub fn countdown(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn can_resend(&self) -> bool {
        self.countdown.can_resend()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.otp.iter().all(Option::is_some)
    }

    fn joined(&self) -> String {
        self.otp.iter().flatten().collect()
    }

    fn clear_slots(&mut self) {
        self.otp = [None; OTP_LEN];
        self.focus = 0;
    }

    /// One second of countdown elapsed.
    pub fn tick(&mut self) {
        self.countdown.tick();
    }

    /// Write `value` into a slot (or `None` to delete). Non-digit input is
    /// rejected with no state change. Filling a non-final slot advances
    /// focus; filling the final slot of a now-complete buffer auto-submits.
    pub async fn edit_slot(
        &mut self,
        index: usize,
        value: Option<char>,
        otp: &dyn BaseOtpService,
    ) {
        if self.loading || index >= OTP_LEN {
            return;
        }
        if let Some(c) = value {
            if !c.is_ascii_digit() {
                return;
            }
        }

        self.otp[index] = value;
        self.error = None;

        if value.is_some() && index < OTP_LEN - 1 {
            self.focus = index + 1;
        }
        if value.is_some() && index == OTP_LEN - 1 && self.is_complete() {
            let code = self.joined();
            self.verify(Some(&code), otp).await;
        }
    }

    /// Backspace on an empty slot moves focus back one slot; it never deletes
    /// the previous slot's content.
    pub fn backspace(&mut self, index: usize) {
        if index > 0 && index < OTP_LEN && self.otp[index].is_none() {
            self.focus = index - 1;
        }
    }

    /// Verify `code` if given, else the joined buffer. No-op while a verify
    /// is already in flight; the same guard covers the SMS auto-fill trigger.
    pub async fn verify(&mut self, code: Option<&str>, otp: &dyn BaseOtpService) {
        if self.loading {
            return;
        }

        let code = match code {
            Some(c) => c.to_string(),
            None => self.joined(),
        };
        if code.len() != OTP_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            self.error = Some(INCOMPLETE_OTP_MESSAGE.to_string());
            return;
        }

        self.loading = true;
        let result = otp.verify_otp(&self.mobile, &code).await;
        self.loading = false;

        match result {
            Ok(RequestOutcome::Success { .. }) => {
                self.alert =
                    Some(Alert::success(VERIFY_SUCCESS_MESSAGE).with_navigation(Screen::Home));
            }
            Ok(RequestOutcome::Failure { error }) => {
                // Wrong code: fixed inline text, forced re-entry from slot 0
                self.error = Some(error);
                self.clear_slots();
            }
            Err(err) => {
                tracing::error!(error = %err, "verify OTP request failed");
                self.alert = Some(Alert::error(GENERIC_ERROR_MESSAGE));
                self.clear_slots();
            }
        }
    }

    /// Resend the OTP. No-op until the countdown reaches zero, and while a
    /// resend is already in flight.
    pub async fn resend(&mut self, otp: &dyn BaseOtpService) {
        if !self.countdown.can_resend() || self.resend_loading {
            return;
        }

        self.resend_loading = true;
        self.error = None;
        let result = otp.resend_otp(&self.mobile).await;
        self.resend_loading = false;

        match result {
            Ok(RequestOutcome::Success { .. }) => {
                self.alert = Some(Alert::success(RESEND_SUCCESS_MESSAGE));
                self.countdown.reset();
                self.clear_slots();
            }
            Ok(RequestOutcome::Failure { error }) => {
                // Unlike verify, the server's message is shown as-is
                self.alert = Some(Alert::error(error));
            }
            Err(err) => {
                tracing::error!(error = %err, "resend OTP request failed");
                self.alert = Some(Alert::error(RESEND_FAILED_MESSAGE));
            }
        }
    }

    /// Raw SMS text from the auto-read bridge. Best-effort: anything that is
    /// not a clean 4-digit code is dropped silently, and an in-flight verify
    /// wins over a late auto-fill.
    pub async fn on_sms(&mut self, message: &str, otp: &dyn BaseOtpService) {
        if self.loading {
            return;
        }
        let Some(code) = extract_otp(message) else {
            return;
        };

        for (slot, c) in self.otp.iter_mut().zip(code.chars()) {
            *slot = Some(c);
        }
        self.verify(Some(&code), otp).await;
    }

    /// Dismiss the current alert, yielding the screen to navigate to, if the
    /// alert carried one.
    pub fn dismiss_alert(&mut self) -> Option<Screen> {
        self.alert.take().and_then(|a| a.pending_navigation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::AlertKind;
    use crate::kernel::{failure_outcome, MockOtpService, SMS_TIMEOUT_SENTINEL};
    use otp_api::WRONG_OTP_MESSAGE;

    const MOBILE: &str = "9876543210";

    async fn type_code(flow: &mut VerifyFlow, code: &str, otp: &dyn BaseOtpService) {
        for (i, c) in code.chars().enumerate() {
            flow.edit_slot(i, Some(c), otp).await;
        }
    }

    #[tokio::test]
    async fn sequential_edits_trigger_exactly_one_auto_verify() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        for (i, c) in "123".chars().enumerate() {
            flow.edit_slot(i, Some(c), &otp).await;
            assert!(otp.verify_calls().is_empty(), "fired before slot 4");
        }
        flow.edit_slot(3, Some('4'), &otp).await;

        assert_eq!(
            otp.verify_calls(),
            vec![(MOBILE.to_string(), "1234".to_string())]
        );
    }

    #[tokio::test]
    async fn non_digit_input_is_rejected_silently() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.edit_slot(0, Some('x'), &otp).await;

        assert_eq!(flow.slots()[0], None);
        assert_eq!(flow.focus(), 0);
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn filling_a_slot_advances_focus() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.edit_slot(0, Some('7'), &otp).await;
        assert_eq!(flow.focus(), 1);

        flow.edit_slot(1, Some('8'), &otp).await;
        assert_eq!(flow.focus(), 2);
    }

    #[tokio::test]
    async fn editing_a_slot_clears_the_inline_error() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);
        flow.error = Some(WRONG_OTP_MESSAGE.to_string());

        flow.edit_slot(0, Some('1'), &otp).await;
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn backspace_on_empty_slot_moves_focus_back_without_deleting() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.edit_slot(0, Some('5'), &otp).await;
        assert_eq!(flow.focus(), 1);

        flow.backspace(1);
        assert_eq!(flow.focus(), 0);
        assert_eq!(flow.slots()[0], Some('5'));
    }

    #[tokio::test]
    async fn backspace_on_first_slot_stays_put() {
        let mut flow = VerifyFlow::new(MOBILE);
        flow.backspace(0);
        assert_eq!(flow.focus(), 0);
    }

    #[tokio::test]
    async fn incomplete_code_fails_locally_without_a_network_call() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.edit_slot(0, Some('1'), &otp).await;
        flow.edit_slot(1, Some('2'), &otp).await;
        flow.verify(None, &otp).await;

        assert!(otp.verify_calls().is_empty());
        assert_eq!(flow.error(), Some(INCOMPLETE_OTP_MESSAGE));
    }

    #[tokio::test]
    async fn success_raises_alert_with_pending_home_navigation() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        type_code(&mut flow, "1234", &otp).await;

        let alert = flow.alert().expect("success alert");
        assert_eq!(alert.kind, AlertKind::Success);
        assert_eq!(alert.message, VERIFY_SUCCESS_MESSAGE);
        assert_eq!(alert.pending_navigation, Some(Screen::Home));

        // Navigation happens only on dismissal
        assert_eq!(flow.dismiss_alert(), Some(Screen::Home));
        assert!(flow.alert().is_none());
    }

    #[tokio::test]
    async fn wrong_code_resets_buffer_and_focus() {
        let otp = MockOtpService::new().with_verify_outcome(failure_outcome(WRONG_OTP_MESSAGE));
        let mut flow = VerifyFlow::new(MOBILE);

        type_code(&mut flow, "0000", &otp).await;

        assert_eq!(flow.error(), Some(WRONG_OTP_MESSAGE));
        assert_eq!(flow.slots(), &[None; OTP_LEN]);
        assert_eq!(flow.focus(), 0);
        assert!(!flow.is_loading());
        assert!(flow.alert().is_none());
    }

    #[tokio::test]
    async fn transport_error_is_a_distinct_branch_from_rejection() {
        let otp = MockOtpService::new().with_verify_error("connection reset");
        let mut flow = VerifyFlow::new(MOBILE);

        type_code(&mut flow, "1234", &otp).await;

        // Modal alert with the generic message, no inline error
        let alert = flow.alert().expect("error alert");
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, GENERIC_ERROR_MESSAGE);
        assert!(flow.error().is_none());
        assert_eq!(flow.slots(), &[None; OTP_LEN]);
        assert_eq!(flow.focus(), 0);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn verify_is_guarded_while_in_flight() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);
        flow.loading = true;

        flow.verify(Some("1234"), &otp).await;
        flow.edit_slot(0, Some('1'), &otp).await;

        assert!(otp.verify_calls().is_empty());
        assert_eq!(flow.slots()[0], None, "slots stay disabled while loading");
    }

    #[tokio::test]
    async fn countdown_follows_max_sixty_minus_t() {
        let mut flow = VerifyFlow::new(MOBILE);
        assert_eq!(flow.countdown(), 60);
        assert!(!flow.can_resend());

        for t in 1..=59 {
            flow.tick();
            assert_eq!(flow.countdown(), 60 - t);
            assert!(!flow.can_resend());
        }

        flow.tick();
        assert_eq!(flow.countdown(), 0);
        assert!(flow.can_resend());

        // Clamped at zero; the gate stays open
        flow.tick();
        assert_eq!(flow.countdown(), 0);
        assert!(flow.can_resend());
    }

    #[tokio::test]
    async fn resend_is_a_noop_while_gated() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);
        for _ in 0..15 {
            flow.tick();
        }
        assert_eq!(flow.countdown(), 45);

        flow.resend(&otp).await;

        assert!(otp.resend_calls().is_empty());
        assert_eq!(flow.countdown(), 45);
        assert!(flow.alert().is_none());
        assert!(!flow.is_resend_loading());
    }

    #[tokio::test]
    async fn resend_success_resets_countdown_and_buffer() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);
        flow.edit_slot(0, Some('9'), &otp).await;
        for _ in 0..60 {
            flow.tick();
        }

        flow.resend(&otp).await;

        assert_eq!(otp.resend_calls(), vec![MOBILE.to_string()]);
        assert_eq!(flow.countdown(), 60);
        assert!(!flow.can_resend());
        assert_eq!(flow.slots(), &[None; OTP_LEN]);
        assert_eq!(flow.focus(), 0);
        let alert = flow.alert().expect("success alert");
        assert_eq!(alert.message, RESEND_SUCCESS_MESSAGE);
        assert!(alert.pending_navigation.is_none());
    }

    #[tokio::test]
    async fn resend_failure_shows_raw_server_error_and_keeps_gate_open() {
        let otp = MockOtpService::new().with_resend_outcome(failure_outcome("rate limited"));
        let mut flow = VerifyFlow::new(MOBILE);
        for _ in 0..60 {
            flow.tick();
        }

        flow.resend(&otp).await;

        let alert = flow.alert().expect("error alert");
        assert_eq!(alert.message, "rate limited");
        assert!(flow.can_resend(), "failed resend does not restart the gate");
        assert!(!flow.is_resend_loading());
    }

    #[tokio::test]
    async fn resend_transport_error_shows_fixed_message() {
        let otp = MockOtpService::new().with_resend_error("dns failure");
        let mut flow = VerifyFlow::new(MOBILE);
        for _ in 0..60 {
            flow.tick();
        }

        flow.resend(&otp).await;

        assert_eq!(
            flow.alert().map(|a| a.message.as_str()),
            Some(RESEND_FAILED_MESSAGE)
        );
        assert!(!flow.is_resend_loading());
    }

    #[tokio::test]
    async fn sms_message_fills_buffer_and_auto_verifies() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.on_sms("Your code is 5566. Do not share.", &otp).await;

        assert_eq!(
            flow.slots(),
            &[Some('5'), Some('5'), Some('6'), Some('6')]
        );
        assert_eq!(
            otp.verify_calls(),
            vec![(MOBILE.to_string(), "5566".to_string())]
        );
    }

    #[tokio::test]
    async fn sms_timeout_sentinel_is_ignored() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.on_sms(SMS_TIMEOUT_SENTINEL, &otp).await;

        assert_eq!(flow.slots(), &[None; OTP_LEN]);
        assert!(otp.verify_calls().is_empty());
    }

    #[tokio::test]
    async fn sms_without_a_four_digit_run_is_ignored() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);

        flow.on_sms("txn 123456 complete", &otp).await;

        assert_eq!(flow.slots(), &[None; OTP_LEN]);
        assert!(otp.verify_calls().is_empty());
    }

    #[tokio::test]
    async fn sms_autofill_loses_to_an_in_flight_verify() {
        let otp = MockOtpService::new();
        let mut flow = VerifyFlow::new(MOBILE);
        flow.loading = true;

        flow.on_sms("Your code is 5566.", &otp).await;

        assert_eq!(flow.slots(), &[None; OTP_LEN]);
        assert!(otp.verify_calls().is_empty());
    }
}
