//! `ping` command: check hosted backend connectivity.

use super::CliError;

/// Fetch the product listing as a connectivity check.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or the backend is
/// unreachable.
pub async fn run() -> Result<(), CliError> {
    let client = super::service_client_from_env()?;

    let products = client.list_products().await?;
    tracing::info!("Backend reachable, {} products in catalog", products.len());

    Ok(())
}
