//! Integration tests for client construction and license lookup.

mod helpers;

use std::sync::Arc;

use csp_aws::constants::{MAX_RESULTS, PRODUCT_SKU_FIELD};
use csp_aws::mock::{MockIdentity, MockLicenseManager};
use csp_aws::models::CallerIdentity;
use csp_aws::{AwsLicenseClient, LicenseClient, ProductSku};
use csp_core::ErrorKind;

use helpers::{ACCOUNT, TestClient, rancher_license};

#[tokio::test]
async fn test_account_number_comes_from_identity() {
    let app = TestClient::new().await;
    assert_eq!(app.client.account_number(), ACCOUNT);
}

#[tokio::test]
async fn test_missing_account_fails_construction() {
    for account in [None, Some(String::new())] {
        let identity = MockIdentity::with_identity(CallerIdentity {
            account,
            arn: None,
            user_id: None,
        });
        let result = AwsLicenseClient::with_services(
            Arc::new(MockLicenseManager::new()),
            Arc::new(identity),
        )
        .await;

        let err = result.expect_err("construction should fail");
        assert_eq!(err.kind, ErrorKind::Identity);
        assert_eq!(err.message, "account number empty in aws sts response");
    }
}

#[tokio::test]
async fn test_identity_failure_fails_construction() {
    let result = AwsLicenseClient::with_services(
        Arc::new(MockLicenseManager::new()),
        Arc::new(MockIdentity::failing("ExpiredToken")),
    )
    .await;

    let err = result.expect_err("construction should fail");
    assert_eq!(err.kind, ErrorKind::Identity);
    assert!(err.message.contains("ExpiredToken"));
}

#[tokio::test]
async fn test_non_emea_license_found_first() {
    let app = TestClient::new().await;
    let sku = ProductSku::NonEmea.as_str();
    app.license_manager
        .grant_license(sku, rancher_license("arn:non-emea", Some(sku), 10));
    app.license_manager.grant_license(
        ProductSku::Emea.as_str(),
        rancher_license("arn:emea", Some(ProductSku::Emea.as_str()), 10),
    );

    let license = app.client.get_rancher_license().await.unwrap();
    assert_eq!(license.license_arn.as_deref(), Some("arn:non-emea"));

    let calls = app.license_manager.list_calls();
    assert_eq!(calls.len(), 1, "EMEA SKU should not be queried");
    assert_eq!(calls[0].max_results, MAX_RESULTS);
    assert_eq!(calls[0].filters.len(), 1);
    assert_eq!(calls[0].filters[0].name, PRODUCT_SKU_FIELD);
    assert_eq!(calls[0].filters[0].values, vec![sku.to_string()]);
}

#[tokio::test]
async fn test_falls_back_to_emea_license() {
    let app = TestClient::new().await;
    let sku = ProductSku::Emea.as_str();
    app.license_manager
        .grant_license(sku, rancher_license("arn:emea", Some(sku), 10));

    let license = app.client.get_rancher_license().await.unwrap();
    assert_eq!(license.license_arn.as_deref(), Some("arn:emea"));
    assert_eq!(license.product_sku.as_deref(), Some(sku));

    let calls = app.license_manager.list_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].filters[0].values, vec![sku.to_string()]);
}

#[tokio::test]
async fn test_transport_failure_also_falls_back() {
    let app = TestClient::new().await;
    let sku = ProductSku::Emea.as_str();
    app.license_manager
        .fail_lookup(ProductSku::NonEmea.as_str(), "ThrottlingException");
    app.license_manager
        .grant_license(sku, rancher_license("arn:emea", Some(sku), 10));

    let license = app.client.get_rancher_license().await.unwrap();
    assert_eq!(license.license_arn.as_deref(), Some("arn:emea"));
}

#[tokio::test]
async fn test_no_license_under_either_sku() {
    let app = TestClient::new().await;

    let err = app.client.get_rancher_license().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(
        err.message,
        "unable to get license for non-emea: unable to find license for product id \
         0b87d4fa-d1fe-41d8-830b-67d4ec381549, unable to get license for emea: \
         unable to find license for product id a303097d-1dc2-4548-8ea6-f46bb9842e21"
    );
}

#[tokio::test]
async fn test_combined_error_with_service_failure() {
    let app = TestClient::new().await;
    app.license_manager
        .fail_lookup(ProductSku::Emea.as_str(), "AccessDeniedException");

    let err = app.client.get_rancher_license().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert!(err.message.contains("unable to get license for non-emea"));
    assert!(err.message.contains("AccessDeniedException"));
}

#[tokio::test]
async fn test_missing_sku_is_back_filled() {
    let app = TestClient::new().await;
    let sku = ProductSku::NonEmea.as_str();
    app.license_manager
        .grant_license(sku, rancher_license("arn:non-emea", None, 10));

    let license = app.client.get_rancher_license().await.unwrap();
    assert_eq!(license.product_sku.as_deref(), Some(sku));
}
