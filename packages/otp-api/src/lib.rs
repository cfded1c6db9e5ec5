//! Thin HTTP client for the OTP backend.
//!
//! Three operations: send, resend, verify. Every well-formed response is
//! normalized into a [`RequestOutcome`]; anything that prevented a well-formed
//! response (network failure, bad JSON) is an [`OtpApiError`].

use std::time::Duration;

pub mod models;

use reqwest::{header, Client};
use serde_json::Value;
use thiserror::Error;

pub use crate::models::{ApiEnvelope, RequestOutcome, WRONG_OTP_MESSAGE};

const SEND_FALLBACK: &str = "Failed to send OTP. Please try again.";
const RESEND_FALLBACK: &str = "Failed to resend OTP. Please try again.";

/// Failure to obtain a well-formed response from the OTP service.
#[derive(Debug, Error)]
pub enum OtpApiError {
    #[error("request to OTP service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from OTP service: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("API token is not a valid header value")]
    InvalidToken(#[from] header::InvalidHeaderValue),
}

#[derive(Debug, Clone)]
pub struct OtpApiOptions {
    pub base_url: String,
    pub api_token: String,
    pub timeout: Duration,
}

impl OtpApiOptions {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client configured once at startup; no per-call reconfiguration.
#[derive(Debug, Clone)]
pub struct OtpApiClient {
    base_url: String,
    client: Client,
}

impl OtpApiClient {
    pub fn new(options: OtpApiOptions) -> Result<Self, OtpApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Api-Token",
            header::HeaderValue::from_str(&options.api_token)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `POST /sendOtp` with the mobile number in the JSON body.
    pub async fn send_otp(&self, mobile: &str) -> Result<RequestOutcome, OtpApiError> {
        tracing::info!(mobile, "sending OTP");

        let response = self
            .client
            .post(self.url("sendOtp"))
            .json(&serde_json::json!({ "mobile": mobile }))
            .send()
            .await?;

        let body: Value = response.json().await?;
        let outcome = normalize(&body, SEND_FALLBACK)?;
        if !outcome.is_success() {
            tracing::warn!(mobile, "send OTP rejected");
        }
        Ok(outcome)
    }

    /// `POST /resendOtp?mobile=<m>`.
    pub async fn resend_otp(&self, mobile: &str) -> Result<RequestOutcome, OtpApiError> {
        tracing::info!(mobile, "resending OTP");

        let response = self
            .client
            .post(self.url("resendOtp"))
            .query(&[("mobile", mobile)])
            .send()
            .await?;

        let body: Value = response.json().await?;
        let outcome = normalize(&body, RESEND_FALLBACK)?;
        if !outcome.is_success() {
            tracing::warn!(mobile, "resend OTP rejected");
        }
        Ok(outcome)
    }

    /// `POST /verifyOtp?mobile=<m>&otp=<o>`.
    ///
    /// A rejected code always maps to the fixed [`WRONG_OTP_MESSAGE`].
    pub async fn verify_otp(
        &self,
        mobile: &str,
        otp: &str,
    ) -> Result<RequestOutcome, OtpApiError> {
        tracing::info!(mobile, "verifying OTP");

        let response = self
            .client
            .post(self.url("verifyOtp"))
            .query(&[("mobile", mobile), ("otp", otp)])
            .send()
            .await?;

        let body: Value = response.json().await?;
        let outcome = normalize_verify(&body)?;
        if !outcome.is_success() {
            tracing::warn!(mobile, "OTP verification rejected");
        }
        Ok(outcome)
    }
}

fn normalize(body: &Value, fallback: &str) -> Result<RequestOutcome, OtpApiError> {
    let envelope: ApiEnvelope = serde_json::from_value(body.clone())?;
    if envelope.is_success() {
        Ok(RequestOutcome::Success { data: body.clone() })
    } else {
        Ok(RequestOutcome::Failure {
            error: envelope.error_message(fallback),
        })
    }
}

fn normalize_verify(body: &Value) -> Result<RequestOutcome, OtpApiError> {
    let envelope: ApiEnvelope = serde_json::from_value(body.clone())?;
    if envelope.is_success() {
        Ok(RequestOutcome::Success { data: body.clone() })
    } else {
        Ok(RequestOutcome::Failure {
            error: WRONG_OTP_MESSAGE.to_string(),
        })
    }
}
