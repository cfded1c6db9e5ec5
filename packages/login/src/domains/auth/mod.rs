//! Auth domain: login flow, OTP verify flow, alerts, screen navigation.

pub mod alert;
pub mod login;
pub mod navigation;
pub mod verify;

pub use alert::{Alert, AlertKind};
pub use login::{is_valid_mobile, LoginFlow};
pub use navigation::{App, AppState, Screen};
pub use verify::{Countdown, VerifyFlow};

/// Message shown whenever a request dies in transport rather than being
/// rejected by the backend.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
