//! AWS SDK configuration overrides.

use serde::{Deserialize, Serialize};

/// Optional overrides applied on top of the AWS SDK's default
/// configuration chain (environment, shared config files, instance metadata).
///
/// Credentials are never configured here; they always come from the SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSettings {
    /// Region to use instead of the one resolved by the SDK.
    #[serde(default)]
    pub region: Option<String>,
    /// Shared config/credentials profile name.
    #[serde(default)]
    pub profile: Option<String>,
    /// Endpoint override, e.g. a LocalStack URL.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}
