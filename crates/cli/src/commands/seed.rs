//! Catalog seeding for development environments.

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Demo catalog: (name, description, price, cost).
const DEMO_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    (
        "Aria 40 Bookshelf Speakers (pair)",
        "Two-way bookshelf speakers with silk dome tweeters.",
        "349.00",
        "210.00",
    ),
    (
        "Meridian P2 Turntable",
        "Belt-drive turntable with carbon tonearm and pre-fitted cartridge.",
        "499.00",
        "315.00",
    ),
    (
        "Copperline Phono Stage",
        "MM/MC phono preamp with switchable gain.",
        "189.00",
        "96.00",
    ),
    (
        "Studio 8 Headphones",
        "Closed-back monitoring headphones, 38 ohm.",
        "149.00",
        "72.00",
    ),
];

/// Insert demo products into an empty catalog.
///
/// A catalog that already has rows is left untouched, so seeding is safe to
/// re-run.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    let pool = PgPool::connect(&database_url).await?;

    let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM shop.products")
        .fetch_one(&pool)
        .await?;

    if existing > 0 {
        tracing::info!(existing, "catalog already populated, skipping seed");
        return Ok(());
    }

    for (name, description, price, cost) in DEMO_PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO shop.products (name, description, price, cost)
            VALUES ($1, $2, $3::numeric, $4::numeric)
            ",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(cost)
        .execute(&pool)
        .await?;
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "catalog seeded");
    Ok(())
}
