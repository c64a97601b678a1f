//! STS-backed identity lookup.

use async_trait::async_trait;

use csp_core::AppResult;

use crate::api::IdentityApi;
use crate::models::CallerIdentity;

use super::service_error;

/// [`IdentityApi`] over the STS SDK client.
#[derive(Debug, Clone)]
pub struct AwsIdentity {
    client: aws_sdk_sts::Client,
}

impl AwsIdentity {
    /// Build from a shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::from_client(aws_sdk_sts::Client::new(sdk_config))
    }

    /// Wrap an existing STS client.
    pub fn from_client(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityApi for AwsIdentity {
    async fn get_caller_identity(&self) -> AppResult<CallerIdentity> {
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| service_error("GetCallerIdentity", e))?;

        Ok(CallerIdentity {
            account: output.account().map(str::to_owned),
            arn: output.arn().map(str::to_owned),
            user_id: output.user_id().map(str::to_owned),
        })
    }
}
