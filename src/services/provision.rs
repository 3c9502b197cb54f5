use async_trait::async_trait;

use crate::errors::StoreError;
use crate::models::Operator;

/// The two store operations provisioning needs. Implemented by
/// `db::store::SqliteStore`; tests substitute scripted doubles.
#[async_trait]
pub trait OperatorStore: Send + Sync {
    /// Looks up the operator row for an identity. `Ok(None)` means no row
    /// exists; that is not an error.
    async fn operator_by_email(&self, email: &str) -> Result<Option<Operator>, StoreError>;

    /// Inserts a row carrying only the identity; every other column takes
    /// its store-side default (unapproved, role "operator", timestamps).
    async fn create_operator(&self, email: &str) -> Result<Operator, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("identity has no email address")]
    MissingEmail,

    #[error("failed to fetch operator record: {0}")]
    Lookup(StoreError),

    #[error("failed to create operator record: {0}")]
    Create(StoreError),

    #[error("operator row exists but could not be read after conflict: {0}")]
    RecoveryLookup(StoreError),

    /// The unique index fired but the follow-up lookup saw no row: a
    /// visibility or policy mismatch rather than a race. Never retried.
    #[error("operator row exists but could not be retrieved")]
    Inconsistent,
}

/// Ensures an operator row exists for the given identity.
///
/// Idempotent and safe to call on every session check, including
/// concurrently for the same email:
///   1. look up by email; a hit returns immediately, no write
///   2. on a miss, insert with only the email set
///   3. if the insert hits the unique index (a concurrent caller won the
///      race between steps 1 and 2), recover with exactly one follow-up
///      lookup; if even that sees no row, surface `Inconsistent`
///
/// Any other insert failure is surfaced verbatim. Never loops: at most
/// one retry, and the store's unique index is the only serialization
/// point.
pub async fn ensure_operator(
    store: &dyn OperatorStore,
    email: &str,
) -> Result<Operator, ProvisionError> {
    if email.trim().is_empty() {
        return Err(ProvisionError::MissingEmail);
    }

    if let Some(existing) = store
        .operator_by_email(email)
        .await
        .map_err(ProvisionError::Lookup)?
    {
        return Ok(existing);
    }

    match store.create_operator(email).await {
        Ok(operator) => Ok(operator),
        Err(StoreError::UniqueViolation(_)) => {
            tracing::warn!(
                "operator insert for {email} hit a unique conflict; falling back to lookup"
            );
            match store.operator_by_email(email).await {
                Ok(Some(operator)) => Ok(operator),
                Ok(None) => Err(ProvisionError::Inconsistent),
                Err(e) => Err(ProvisionError::RecoveryLookup(e)),
            }
        }
        Err(e) => {
            tracing::error!("operator insert for {email} failed: {e}");
            Err(ProvisionError::Create(e))
        }
    }
}
