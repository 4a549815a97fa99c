//! Startup provisioning of the configured admin account.

use rocketlab_core::roles::OperatorRole;
use rocketlab_db::models::operator::NewOperator;
use rocketlab_db::repositories::OperatorRepo;
use rocketlab_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("ADMIN_PASSWORD rejected: {0}")]
    WeakPassword(String),

    #[error("failed to hash ADMIN_PASSWORD: {0}")]
    Hash(argon2::password_hash::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccount {
    Created,
    /// The account existed but had been demoted or deactivated.
    Restored,
    Unchanged,
}

/// Make sure `admin.username` exists as an active admin.
///
/// An existing account keeps its password; only its role and active flag are
/// put back.
pub async fn ensure_admin(
    pool: &DbPool,
    admin: &AdminBootstrap,
) -> Result<AdminAccount, BootstrapError> {
    if let Some(existing) = OperatorRepo::find_by_username(pool, &admin.username).await? {
        if existing.is_active && existing.role.is_admin() {
            return Ok(AdminAccount::Unchanged);
        }
        OperatorRepo::set_access(pool, existing.id, OperatorRole::Admin, true).await?;
        tracing::warn!(operator_id = existing.id, username = %existing.username, "Admin access restored");
        return Ok(AdminAccount::Restored);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(BootstrapError::WeakPassword)?;
    let password_hash = hash_password(&admin.password).map_err(BootstrapError::Hash)?;

    let created = OperatorRepo::create(
        pool,
        &NewOperator {
            username: &admin.username,
            password_hash: &password_hash,
            role: OperatorRole::Admin,
        },
    )
    .await?;

    tracing::info!(operator_id = created.id, username = %created.username, "Admin account created");
    Ok(AdminAccount::Created)
}
