//! Application state shared across handlers.

use std::sync::Arc;

use lettre::transport::smtp::Error as SmtpError;
use sqlx::PgPool;

use soundhaus_core::TaxPolicy;

use crate::config::AdminConfig;
use crate::services::email::EmailService;
use crate::services::token::TokenVerifier;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    verifier: TokenVerifier,
    email: EmailService,
}

impl AppState {
    /// Build application state from loaded configuration and a pool.
    ///
    /// The token verifier is constructed here, once, from the configured
    /// secret - request paths never touch the environment.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport cannot be configured.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, SmtpError> {
        let verifier = TokenVerifier::new(&config.auth_secret);
        let email = EmailService::new(&config.email)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                verifier,
                email,
            }),
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The session token verifier.
    #[must_use]
    pub fn verifier(&self) -> &TokenVerifier {
        &self.inner.verifier
    }

    /// The transactional email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// The configured tax policy.
    #[must_use]
    pub fn tax(&self) -> TaxPolicy {
        self.inner.config.tax
    }
}
