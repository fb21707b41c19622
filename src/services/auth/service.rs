//! Login service wiring the stores to the external collaborators

use std::sync::Arc;

use crate::config::TokenConfig;
use crate::errors::{DomainError, DomainResult};
use crate::services::rate_limit::{RateLimitDecision, SlidingWindowRateLimiter};
use crate::services::traits::{Mailer, TokenIssuer};
use crate::services::verification::VerificationStore;

use super::types::{LoginResult, SendCodeOutcome, SessionTokens};

/// Facade the routing layer calls for the email-code login flow.
///
/// Rate limiting and code issuance are two independent steps; a request can
/// slip between them under load. That race is accepted: the limiter is
/// best-effort abuse mitigation, not an admission-control guarantee.
pub struct AuthService<M: Mailer, T: TokenIssuer> {
    verification: Arc<VerificationStore>,
    rate_limiter: Arc<SlidingWindowRateLimiter>,
    mailer: Arc<M>,
    tokens: Arc<T>,
    token_config: TokenConfig,
}

impl<M: Mailer, T: TokenIssuer> AuthService<M, T> {
    /// Create the facade, validating the token configuration.
    pub fn new(
        verification: Arc<VerificationStore>,
        rate_limiter: Arc<SlidingWindowRateLimiter>,
        mailer: Arc<M>,
        tokens: Arc<T>,
        token_config: TokenConfig,
    ) -> DomainResult<Self> {
        token_config.validate()?;
        Ok(Self {
            verification,
            rate_limiter,
            mailer,
            tokens,
            token_config,
        })
    }

    /// Handle a "send verification email" request.
    ///
    /// Both rate-limit keys are checked and charged first; on admit, a code
    /// is issued and handed to the mailer. The mail call happens outside
    /// every store lock.
    pub async fn send_verification_code(
        &self,
        email: &str,
        client_id: &str,
    ) -> DomainResult<SendCodeOutcome> {
        if let RateLimitDecision::Denied { retry_after_seconds } =
            self.rate_limiter.check_pair(email, client_id)
        {
            return Ok(SendCodeOutcome::RateLimited { retry_after_seconds });
        }

        let issued = self.verification.issue(email);
        let expires_at = issued.expires_at;

        self.mailer
            .send_code(email, &issued.code)
            .await
            .map_err(|e| {
                tracing::error!(
                    email = email,
                    record_id = %issued.id,
                    error = %e,
                    event = "mail_send_failed",
                    "Failed to hand verification code to the mailer"
                );
                DomainError::Mail { message: e }
            })?;

        Ok(SendCodeOutcome::Sent { expires_at })
    }

    /// Handle a "submit code" request.
    ///
    /// On success the record is consumed and a token pair is issued through
    /// the opaque signing capability. Every rejection kind is logged with
    /// its specific reason but returned as a plain `Rejected` so callers can
    /// answer with one generic message.
    pub async fn verify_code(&self, email: &str, submitted: &str) -> DomainResult<LoginResult> {
        let outcome = self.verification.validate(email, submitted);

        if !outcome.is_success() {
            tracing::info!(
                email = email,
                reason = outcome.kind(),
                event = "login_rejected",
                "Verification code rejected"
            );
            return Ok(LoginResult::Rejected { outcome });
        }

        let access_token = self
            .tokens
            .issue(email, self.token_config.access_ttl_seconds)
            .await
            .map_err(|e| DomainError::Token { message: e })?;
        let refresh_token = self
            .tokens
            .issue(email, self.token_config.refresh_ttl_seconds)
            .await
            .map_err(|e| DomainError::Token { message: e })?;

        tracing::info!(
            email = email,
            event = "login_succeeded",
            "Verification code accepted, session established"
        );

        Ok(LoginResult::Success {
            tokens: SessionTokens {
                access_token,
                refresh_token,
            },
        })
    }

    /// Expose the rate-limit decision for callers that gate other endpoints
    /// on the same keys.
    pub fn check_rate_limit(&self, email: &str, client_id: &str) -> RateLimitDecision {
        self.rate_limiter.check_pair(email, client_id)
    }
}
