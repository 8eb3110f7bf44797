//! Application state shared across handlers.

use std::sync::Arc;

use lettre::transport::smtp::Error as SmtpError;
use sqlx::PgPool;

use soundhaus_core::TaxPolicy;

use crate::config::StorefrontConfig;
use crate::services::email::EmailService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    email: EmailService,
}

impl AppState {
    /// Build application state from loaded configuration and a pool.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport cannot be configured.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, SmtpError> {
        let email = EmailService::new(&config.email)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
            }),
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
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
