// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no flow logic. The login and verify
// flows are plain state machines that call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseOtpService)

use anyhow::Result;
use async_trait::async_trait;
use otp_api::RequestOutcome;
use tokio::sync::mpsc;

// =============================================================================
// OTP Service Trait (Infrastructure - remote send/resend/verify)
// =============================================================================

/// Remote OTP service. Structured rejections come back as
/// [`RequestOutcome::Failure`]; transport problems come back as `Err` so the
/// flows keep the two failure channels separate.
#[async_trait]
pub trait BaseOtpService: Send + Sync {
    /// Request an OTP for the given mobile number
    async fn send_otp(&self, mobile: &str) -> Result<RequestOutcome>;

    /// Re-request an OTP for the given mobile number
    async fn resend_otp(&self, mobile: &str) -> Result<RequestOutcome>;

    /// Check an entered code against the given mobile number
    async fn verify_otp(&self, mobile: &str, otp: &str) -> Result<RequestOutcome>;
}

// =============================================================================
// SMS Retriever Trait (Infrastructure - best-effort auto-read)
// =============================================================================

/// Best-effort SMS auto-read capability.
///
/// `start` registers the app hash with the platform and begins listening,
/// yielding raw message text on the returned channel; it returns `None` on
/// platforms without the capability. Nothing delivered here may ever fail the
/// login flow.
pub trait BaseSmsRetriever: Send + Sync {
    fn start(&self) -> Option<mpsc::Receiver<String>>;

    /// Unregister the listener. Safe to call when never started.
    fn stop(&self);
}
