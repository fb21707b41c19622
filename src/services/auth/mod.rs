//! Login facade over the verification store and rate limiter
//!
//! The routing layer talks to this module only: request a code, submit a
//! code, get session tokens back. Mail delivery and token signing stay
//! behind the collaborator traits.

mod service;
mod types;

#[cfg(test)]
mod tests;

pub use service::AuthService;
pub use types::{LoginResult, SendCodeOutcome, SessionTokens};
