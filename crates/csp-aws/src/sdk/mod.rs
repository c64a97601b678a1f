//! AWS SDK backed implementations of the capability traits.

pub mod license_manager;
pub mod sts;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::error::DisplayErrorContext;

use csp_core::config::AwsSettings;
use csp_core::{AppError, AppResult, ErrorKind};

pub use license_manager::AwsLicenseManager;
pub use sts::AwsIdentity;

/// Load the shared SDK configuration, applying any overrides from `settings`.
///
/// Credentials, retries and request signing stay with the SDK. Fails if no
/// region could be resolved, since no License Manager call can succeed
/// without one.
pub async fn load_sdk_config(settings: &AwsSettings) -> AppResult<SdkConfig> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;
    if sdk_config.region().is_none() {
        return Err(AppError::configuration(
            "no AWS region configured; set AWS_REGION or aws.region",
        ));
    }
    Ok(sdk_config)
}

/// Wrap an SDK failure, keeping the full error chain in the message.
pub(crate) fn service_error<E>(operation: &str, err: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("{operation} failed: {}", DisplayErrorContext(&err)),
        err,
    )
}
