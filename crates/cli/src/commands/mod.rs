//! CLI command implementations.

pub mod admin;
pub mod ping;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use yarnhaven_admin::config::AdminSupabaseConfig;
use yarnhaven_admin::supabase::{AdminSupabaseError, ServiceClient};

/// Errors surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required environment variable is missing.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The hosted backend rejected a request.
    #[error("backend error: {0}")]
    Supabase(#[from] AdminSupabaseError),
}

/// Build a service client from `SUPABASE_*` environment variables.
///
/// The CLI does not need the web crates' full configuration (session
/// secrets, database URLs); it only talks to the hosted backend.
pub fn service_client_from_env() -> Result<ServiceClient, CliError> {
    let url = require_env("SUPABASE_URL")?;
    let anon_key = require_env("SUPABASE_ANON_KEY")?;
    let service_role_key = require_env("SUPABASE_SERVICE_ROLE_KEY")?;

    let config = AdminSupabaseConfig {
        url,
        anon_key: SecretString::from(anon_key),
        service_role_key: SecretString::from(service_role_key),
    };

    Ok(ServiceClient::new(&config))
}

fn require_env(key: &str) -> Result<String, CliError> {
    std::env::var(key).map_err(|_| CliError::MissingEnvVar(key.to_owned()))
}
