//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.
//! Every variable has a default suitable for local development.

use serde::Deserialize;

/// Which storage engine backs the token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx (default)
    Postgres,
    /// Ephemeral in-process map. Requires no database configuration.
    Memory,
}

/// What happens to `created_at` when a user's token is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedAtPolicy {
    /// Keep the timestamp of the user's first token.
    #[default]
    Preserve,
    /// Treat every overwrite as a fresh creation.
    Reset,
}

/// How a successful verification consumes the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionMode {
    /// Flip `status` to redeemed and keep the row.
    #[default]
    Mark,
    /// Delete the row. A missing row then means "consumed" or "never issued",
    /// and the two cannot be told apart.
    Delete,
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_SSLMODE`:
///   PostgreSQL connection parts
/// - `DATABASE_URL` (optional): full connection string, overrides the parts above
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `STORE_BACKEND`: `postgres` or `memory`
/// - `CREATED_AT_POLICY`: `preserve` or `reset`
/// - `REDEMPTION_MODE`: `mark` or `delete`
/// - `QR_IMAGE_SIZE`: side length of generated PNGs in pixels
/// - `CORS_ALLOWED_ORIGINS`: comma-separated list of allowed origins
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    #[serde(default = "default_db_user")]
    pub db_user: String,

    #[serde(default = "default_db_password")]
    pub db_password: String,

    #[serde(default = "default_db_name")]
    pub db_name: String,

    #[serde(default = "default_db_sslmode")]
    pub db_sslmode: String,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    #[serde(default)]
    pub created_at_policy: CreatedAtPolicy,

    #[serde(default)]
    pub redemption_mode: RedemptionMode,

    #[serde(default = "default_qr_image_size")]
    pub qr_image_size: u32,

    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "password".to_string()
}

fn default_db_name() -> String {
    "qr_code_db".to_string()
}

fn default_db_sslmode() -> String {
    "disable".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Postgres
}

fn default_qr_image_size() -> u32 {
    256
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed
    /// into its expected type (e.g., `SERVER_PORT=abc`, `STORE_BACKEND=redis`).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of key/value pairs.
    ///
    /// Field names map to upper-case keys: `db_host` -> `DB_HOST`.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }
}
