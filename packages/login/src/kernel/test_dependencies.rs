// Mock implementations for testing
//
// Provides mock services that can be injected into AppDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use otp_api::RequestOutcome;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use super::{AppDeps, BaseOtpService, BaseSmsRetriever};

/// A `{status: "success"}` outcome, the minimal shape the backend returns.
pub fn success_outcome() -> RequestOutcome {
    RequestOutcome::Success {
        data: serde_json::json!({"status": "success"}),
    }
}

pub fn failure_outcome(error: &str) -> RequestOutcome {
    RequestOutcome::Failure {
        error: error.to_string(),
    }
}

// =============================================================================
// Mock OTP Service
// =============================================================================

/// Queued-response mock. Each call pops the next queued result for that
/// operation, falling back to a plain success; transport errors are queued as
/// `Err` strings.
pub struct MockOtpService {
    send_results: Mutex<Vec<Result<RequestOutcome, String>>>,
    resend_results: Mutex<Vec<Result<RequestOutcome, String>>>,
    verify_results: Mutex<Vec<Result<RequestOutcome, String>>>,
    send_calls: Mutex<Vec<String>>,
    resend_calls: Mutex<Vec<String>>,
    verify_calls: Mutex<Vec<(String, String)>>,
}

impl MockOtpService {
    pub fn new() -> Self {
        Self {
            send_results: Mutex::new(Vec::new()),
            resend_results: Mutex::new(Vec::new()),
            verify_results: Mutex::new(Vec::new()),
            send_calls: Mutex::new(Vec::new()),
            resend_calls: Mutex::new(Vec::new()),
            verify_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_send_outcome(self, outcome: RequestOutcome) -> Self {
        self.send_results.lock().unwrap().push(Ok(outcome));
        self
    }

    /// Queue a transport-level failure for the next send call
    pub fn with_send_error(self, message: &str) -> Self {
        self.send_results
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    pub fn with_resend_outcome(self, outcome: RequestOutcome) -> Self {
        self.resend_results.lock().unwrap().push(Ok(outcome));
        self
    }

    pub fn with_resend_error(self, message: &str) -> Self {
        self.resend_results
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    pub fn with_verify_outcome(self, outcome: RequestOutcome) -> Self {
        self.verify_results.lock().unwrap().push(Ok(outcome));
        self
    }

    pub fn with_verify_error(self, message: &str) -> Self {
        self.verify_results
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    /// Mobile numbers passed to send_otp, in call order
    pub fn send_calls(&self) -> Vec<String> {
        self.send_calls.lock().unwrap().clone()
    }

    pub fn resend_calls(&self) -> Vec<String> {
        self.resend_calls.lock().unwrap().clone()
    }

    /// (mobile, otp) pairs passed to verify_otp, in call order
    pub fn verify_calls(&self) -> Vec<(String, String)> {
        self.verify_calls.lock().unwrap().clone()
    }

    fn next(queue: &Mutex<Vec<Result<RequestOutcome, String>>>) -> Result<RequestOutcome> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            Ok(success_outcome())
        } else {
            queue.remove(0).map_err(|m| anyhow::anyhow!(m))
        }
    }
}

impl Default for MockOtpService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOtpService for MockOtpService {
    async fn send_otp(&self, mobile: &str) -> Result<RequestOutcome> {
        self.send_calls.lock().unwrap().push(mobile.to_string());
        Self::next(&self.send_results)
    }

    async fn resend_otp(&self, mobile: &str) -> Result<RequestOutcome> {
        self.resend_calls.lock().unwrap().push(mobile.to_string());
        Self::next(&self.resend_results)
    }

    async fn verify_otp(&self, mobile: &str, otp: &str) -> Result<RequestOutcome> {
        self.verify_calls
            .lock()
            .unwrap()
            .push((mobile.to_string(), otp.to_string()));
        Self::next(&self.verify_results)
    }
}

// =============================================================================
// Mock SMS Retriever
// =============================================================================

/// Capability mock: `start` hands back a channel preloaded with the queued
/// messages, and `stop` is recorded so teardown can be asserted.
pub struct MockSmsRetriever {
    messages: Mutex<Vec<String>>,
    started: Mutex<bool>,
    stopped: Mutex<bool>,
}

impl MockSmsRetriever {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            started: Mutex::new(false),
            stopped: Mutex::new(false),
        }
    }

    pub fn with_message(self, message: &str) -> Self {
        self.messages.lock().unwrap().push(message.to_string());
        self
    }

    pub fn was_started(&self) -> bool {
        *self.started.lock().unwrap()
    }

    pub fn was_stopped(&self) -> bool {
        *self.stopped.lock().unwrap()
    }
}

impl Default for MockSmsRetriever {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseSmsRetriever for MockSmsRetriever {
    fn start(&self) -> Option<mpsc::Receiver<String>> {
        *self.started.lock().unwrap() = true;

        let messages = self.messages.lock().unwrap();
        let (tx, rx) = mpsc::channel(messages.len().max(1));
        for message in messages.iter() {
            let _ = tx.try_send(message.clone());
        }
        Some(rx)
    }

    fn stop(&self) {
        *self.stopped.lock().unwrap() = true;
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub otp: Arc<MockOtpService>,
    pub sms: Arc<MockSmsRetriever>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            otp: Arc::new(MockOtpService::new()),
            sms: Arc::new(MockSmsRetriever::new()),
        }
    }

    /// Set a mock OTP service
    pub fn mock_otp(mut self, otp: MockOtpService) -> Self {
        self.otp = Arc::new(otp);
        self
    }

    /// Set a mock SMS retriever
    pub fn mock_sms(mut self, sms: MockSmsRetriever) -> Self {
        self.sms = Arc::new(sms);
        self
    }

    /// Convert into AppDeps for wiring into the flow controller
    pub fn into_deps(self) -> AppDeps {
        AppDeps::new(self.otp, self.sms)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
