//! App dependencies for the flows (using traits for testability)
//!
//! This module provides the dependency container handed to the screen-flow
//! controller. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use otp_api::{OtpApiClient, RequestOutcome};
use std::sync::Arc;

use super::{BaseOtpService, BaseSmsRetriever};

// =============================================================================
// OtpApiClient Adapter (implements BaseOtpService trait)
// =============================================================================

/// Wrapper around OtpApiClient that implements the BaseOtpService trait
pub struct OtpApiAdapter(pub Arc<OtpApiClient>);

impl OtpApiAdapter {
    pub fn new(client: Arc<OtpApiClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseOtpService for OtpApiAdapter {
    async fn send_otp(&self, mobile: &str) -> Result<RequestOutcome> {
        self.0.send_otp(mobile).await.map_err(Into::into)
    }

    async fn resend_otp(&self, mobile: &str) -> Result<RequestOutcome> {
        self.0.resend_otp(mobile).await.map_err(Into::into)
    }

    async fn verify_otp(&self, mobile: &str, otp: &str) -> Result<RequestOutcome> {
        self.0.verify_otp(mobile, otp).await.map_err(Into::into)
    }
}

// =============================================================================
// AppDeps
// =============================================================================

/// Dependencies accessible to the flows (using traits for testability)
#[derive(Clone)]
pub struct AppDeps {
    pub otp: Arc<dyn BaseOtpService>,
    pub sms: Arc<dyn BaseSmsRetriever>,
}

impl AppDeps {
    pub fn new(otp: Arc<dyn BaseOtpService>, sms: Arc<dyn BaseSmsRetriever>) -> Self {
        Self { otp, sms }
    }
}
