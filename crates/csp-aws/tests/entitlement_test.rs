//! Integration tests for checkout, check-in, extension and availability.

mod helpers;

use csp_aws::constants::{
    CHECKOUT_TYPE_PROVISIONAL, ENTITLEMENT_DIMENSION, ENTITLEMENT_UNIT,
};
use csp_aws::models::{GrantedLicense, IssuerDetails};
use csp_aws::{LicenseClient, ProductSku};
use csp_core::ErrorKind;
use uuid::Uuid;

use helpers::{FINGERPRINT, TestClient, node_usage, rancher_license};

const ARN: &str = "arn:aws:license-manager::294406891311:license:l-0123456789abcdef";

async fn seeded() -> (TestClient, GrantedLicense) {
    let app = TestClient::new().await;
    let sku = ProductSku::NonEmea.as_str();
    app.license_manager
        .grant_license(sku, rancher_license(ARN, Some(sku), 100));
    let license = app.client.get_rancher_license().await.unwrap();
    (app, license)
}

#[tokio::test]
async fn test_checkout_request_shape() {
    let (app, license) = seeded().await;

    let outcome = app
        .client
        .checkout_rancher_license(&license, 7)
        .await
        .unwrap();
    assert!(outcome.license_consumption_token.is_some());
    assert_eq!(outcome.license_arn.as_deref(), Some(ARN));

    let requests = app.license_manager.checkout_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.checkout_type, CHECKOUT_TYPE_PROVISIONAL);
    assert_eq!(request.key_fingerprint, FINGERPRINT);
    assert_eq!(
        request.product_sku.as_deref(),
        Some(ProductSku::NonEmea.as_str())
    );
    assert_eq!(request.entitlements.len(), 1);
    assert_eq!(request.entitlements[0].name, ENTITLEMENT_DIMENSION);
    assert_eq!(request.entitlements[0].unit, ENTITLEMENT_UNIT);
    assert_eq!(request.entitlements[0].value.as_deref(), Some("7"));
}

#[tokio::test]
async fn test_checkout_uses_fresh_client_tokens() {
    let (app, license) = seeded().await;

    app.client
        .checkout_rancher_license(&license, 1)
        .await
        .unwrap();
    app.client
        .checkout_rancher_license(&license, 1)
        .await
        .unwrap();

    let requests = app.license_manager.checkout_requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].client_token, requests[1].client_token);
    for request in &requests {
        assert!(Uuid::parse_str(&request.client_token).is_ok());
    }
}

#[tokio::test]
async fn test_checkout_without_arn_or_issuer() {
    let app = TestClient::new().await;

    let err = app
        .client
        .checkout_rancher_license(&GrantedLicense::default(), 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedLicense);
    assert_eq!(err.message, "license is missing arn and KeyFingerprint/Issuer");
    assert!(app.license_manager.checkout_requests().is_empty());
}

#[tokio::test]
async fn test_checkout_without_fingerprint() {
    let app = TestClient::new().await;
    let license = GrantedLicense {
        license_arn: Some(ARN.to_string()),
        issuer: Some(IssuerDetails {
            name: Some("AWS/Marketplace".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let err = app
        .client
        .checkout_rancher_license(&license, 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedLicense);
    assert_eq!(
        err.message,
        format!("license {ARN} must have a KeyFingerprint for checkout")
    );
}

#[tokio::test]
async fn test_check_in_and_extend_forward_token() {
    let (app, license) = seeded().await;
    let token = app
        .client
        .checkout_rancher_license(&license, 3)
        .await
        .unwrap()
        .license_consumption_token
        .unwrap();

    let extended = app
        .client
        .extend_rancher_license_consumption_token(&token)
        .await
        .unwrap();
    assert_eq!(extended.license_consumption_token.as_deref(), Some(token.as_str()));
    assert!(extended.expires_at().is_some());

    app.client.check_in_rancher_license(&token).await.unwrap();
    assert!(!app.license_manager.is_token_active(&token));
}

#[tokio::test]
async fn test_unknown_token_errors_pass_through() {
    let app = TestClient::new().await;

    let err = app
        .client
        .check_in_rancher_license("not-a-token")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .client
        .extend_rancher_license_consumption_token("not-a-token")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_available_entitlements_sums_usage() {
    let (app, license) = seeded().await;
    app.license_manager
        .set_usage(ARN, vec![node_usage("30"), node_usage("20")]);

    let available = app
        .client
        .get_number_of_available_entitlements(&license)
        .await
        .unwrap();
    assert_eq!(available, 50);
}

#[tokio::test]
async fn test_available_entitlements_without_dimension() {
    let (app, mut license) = seeded().await;
    license.entitlements.clear();

    let err = app
        .client
        .get_number_of_available_entitlements(&license)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedLicense);
}

#[tokio::test]
async fn test_available_entitlements_with_bad_usage() {
    let (app, license) = seeded().await;
    app.license_manager
        .set_usage(ARN, vec![node_usage("30"), node_usage("lots")]);

    let err = app
        .client
        .get_number_of_available_entitlements(&license)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
}

#[tokio::test]
async fn test_usage_lookup_failure_is_propagated() {
    let (app, mut license) = seeded().await;
    license.license_arn = None;

    let err = app
        .client
        .get_number_of_available_entitlements(&license)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
}
