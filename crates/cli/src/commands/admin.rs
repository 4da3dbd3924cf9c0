//! `admin grant` / `admin revoke` commands.

use super::CliError;

/// Set or clear the admin flag on an account.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or the backend call
/// fails.
pub async fn grant(email: &str, is_admin: bool) -> Result<(), CliError> {
    let client = super::service_client_from_env()?;

    client.set_admin(email, is_admin).await?;

    if is_admin {
        tracing::info!("Granted admin rights to {email}");
    } else {
        tracing::info!("Revoked admin rights from {email}");
    }

    Ok(())
}
