//! Identity service capability.

use async_trait::async_trait;

use csp_core::AppResult;

use crate::models::CallerIdentity;

/// Resolves the identity behind the ambient credentials.
#[async_trait]
pub trait IdentityApi: std::fmt::Debug + Send + Sync + 'static {
    /// Return the caller identity. Requires no IAM permissions.
    async fn get_caller_identity(&self) -> AppResult<CallerIdentity>;
}
