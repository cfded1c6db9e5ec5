use serde::Deserialize;
use serde_json::Value;

/// Fixed message shown for a rejected verification. The server's own message
/// is intentionally discarded for this path.
pub const WRONG_OTP_MESSAGE: &str = "Wrong OTP Entered";

/// Response envelope shared by every OTP endpoint.
///
/// The backend signals success with `status == "success"` and puts its error
/// text in `msg` (older deployments used `message`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Server-provided error text, preferring `msg` over `message`, falling
    /// back to the per-operation default.
    pub fn error_message(&self, fallback: &str) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Normalized outcome of a remote OTP call.
///
/// Structured rejections (`status != "success"`) become `Failure`; transport
/// and decode problems travel separately as [`crate::OtpApiError`] so call
/// sites keep the two failure channels distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Success { data: Value },
    Failure { error: String },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
