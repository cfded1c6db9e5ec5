//! Kernel module - app infrastructure and dependencies.

pub mod deps;
pub mod sms;
pub mod test_dependencies;
pub mod traits;

pub use deps::{AppDeps, OtpApiAdapter};
pub use sms::{extract_otp, NoopSmsRetriever, SMS_TIMEOUT_SENTINEL};
pub use test_dependencies::{
    failure_outcome, success_outcome, MockOtpService, MockSmsRetriever, TestDependencies,
};
pub use traits::*;
