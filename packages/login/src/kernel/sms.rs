//! SMS auto-read bridge.
//!
//! The platform side is a capability behind [`BaseSmsRetriever`]; this module
//! holds the no-op stub used on platforms without auto-read, and the code
//! extraction applied to whatever raw message text the bridge delivers.

use lazy_static::lazy_static;
use regex::Regex;
use tokio::sync::mpsc;

use super::BaseSmsRetriever;

/// Message the platform bridge delivers when its listening window expires.
pub const SMS_TIMEOUT_SENTINEL: &str = "Timeout Error.";

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").expect("digit-run pattern is valid");
}

/// Pull the OTP out of a raw SMS body: the first run of exactly 4 digits.
///
/// Returns `None` for the timeout sentinel, for messages with no such run,
/// and for runs of any other length (a 6-digit transaction id never matches).
pub fn extract_otp(message: &str) -> Option<String> {
    if message == SMS_TIMEOUT_SENTINEL {
        return None;
    }
    DIGIT_RUN
        .find_iter(message)
        .find(|m| m.as_str().len() == 4)
        .map(|m| m.as_str().to_string())
}

/// Stub retriever for platforms without SMS auto-read. Never yields messages,
/// never errors.
pub struct NoopSmsRetriever;

impl BaseSmsRetriever for NoopSmsRetriever {
    fn start(&self) -> Option<mpsc::Receiver<String>> {
        tracing::debug!("SMS auto-read unavailable on this platform");
        None
    }

    fn stop(&self) {}
}
