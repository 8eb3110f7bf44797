//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user with a generated password
//! soundhaus admin create -e admin@soundhaus.shop -n "Store Admin"
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin database

use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;
use thiserror::Error;

use soundhaus_admin::services::auth::hash_password;
use soundhaus_core::Email;

/// Generated password length for new admin users.
const GENERATED_PASSWORD_LENGTH: usize = 20;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] soundhaus_core::EmailError),

    /// Admin user already exists.
    #[error("An admin with email {0} already exists")]
    AlreadyExists(String),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    Hashing,
}

/// Create a new admin user.
///
/// When no password is supplied a random one is generated and printed once;
/// only the argon2 hash is stored.
///
/// # Errors
///
/// Returns `AdminError` for invalid input, a duplicate email, or a database
/// failure.
pub async fn create(
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    let (password, generated) = match password {
        Some(p) => (p, false),
        None => (generate_password(), true),
    };
    let password_hash = hash_password(&password).map_err(|_| AdminError::Hashing)?;

    let pool = PgPool::connect(&database_url).await?;

    let inserted = sqlx::query(
        r"
        INSERT INTO admin.admin_user (email, name, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        ",
    )
    .bind(email.as_str())
    .bind(name)
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(AdminError::AlreadyExists(email.into_inner()));
    }

    tracing::info!(email = %email, "admin user created");

    if generated {
        // The only place the plaintext ever appears.
        #[allow(clippy::print_stdout)]
        {
            println!("Generated password for {email}: {password}");
            println!("Store it now; it is not recoverable.");
        }
    }

    Ok(())
}

/// Generate a random alphanumeric password.
fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }
}
