//! Phone-number OTP login flow.
//!
//! A user enters a 10-digit mobile number, receives a one-time passcode by
//! SMS, types (or auto-fills) the 4-digit code, and lands on the home screen.
//! The remote OTP service and the platform SMS auto-read mechanism sit behind
//! traits in [`kernel`]; the flow state machines live in [`domains::auth`].

pub mod config;
pub mod domains;
pub mod kernel;

pub use config::Config;
