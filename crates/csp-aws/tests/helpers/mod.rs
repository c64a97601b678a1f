//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use csp_aws::AwsLicenseClient;
use csp_aws::constants::ENTITLEMENT_DIMENSION;
use csp_aws::mock::{MockIdentity, MockLicenseManager};
use csp_aws::models::{Entitlement, EntitlementUsage, GrantedLicense, IssuerDetails};

/// Account number reported by the mock identity service.
pub const ACCOUNT: &str = "294406891311";

/// Issuer fingerprint used by AWS Marketplace licenses.
pub const FINGERPRINT: &str = "aws:294406891311:AWS/Marketplace:issuer-fingerprint";

/// Client wired to a mock License Manager.
pub struct TestClient {
    /// The client under test.
    pub client: AwsLicenseClient,
    /// The backing mock, for seeding and assertions.
    pub license_manager: Arc<MockLicenseManager>,
}

impl TestClient {
    /// Create a client over an empty mock License Manager.
    pub async fn new() -> Self {
        let license_manager = Arc::new(MockLicenseManager::new());
        let client = AwsLicenseClient::with_services(
            license_manager.clone(),
            Arc::new(MockIdentity::new(ACCOUNT)),
        )
        .await
        .expect("Failed to build client");

        Self {
            client,
            license_manager,
        }
    }
}

/// A Marketplace license granting `max_nodes` node entitlements.
pub fn rancher_license(arn: &str, sku: Option<&str>, max_nodes: i64) -> GrantedLicense {
    GrantedLicense {
        license_arn: Some(arn.to_string()),
        license_name: Some("Rancher Prime".to_string()),
        product_name: Some("Rancher Prime".to_string()),
        product_sku: sku.map(str::to_string),
        issuer: Some(IssuerDetails {
            name: Some("AWS/Marketplace".to_string()),
            sign_key: None,
            key_fingerprint: Some(FINGERPRINT.to_string()),
        }),
        home_region: Some("us-east-1".to_string()),
        status: Some("AVAILABLE".to_string()),
        beneficiary: Some(ACCOUNT.to_string()),
        entitlements: vec![Entitlement {
            name: ENTITLEMENT_DIMENSION.to_string(),
            value: None,
            max_count: Some(max_nodes),
            overage: Some(false),
            unit: "Count".to_string(),
            allow_check_in: Some(true),
        }],
    }
}

/// A node usage record.
pub fn node_usage(consumed: &str) -> EntitlementUsage {
    EntitlementUsage {
        name: ENTITLEMENT_DIMENSION.to_string(),
        consumed_value: consumed.to_string(),
        max_count: None,
        unit: "Count".to_string(),
    }
}
