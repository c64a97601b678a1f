//! The Rancher license client.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use csp_core::{AppError, AppResult, ErrorKind};

use crate::api::{IdentityApi, LicenseManagerApi};
use crate::constants::{
    CHECKOUT_TYPE_PROVISIONAL, ENTITLEMENT_DIMENSION, ENTITLEMENT_UNIT, MAX_RESULTS,
    PRODUCT_SKU_FIELD,
};
use crate::entitlements::available_node_entitlements;
use crate::models::{
    CheckoutOutcome, CheckoutRequest, EntitlementData, ExtendOutcome, GrantedLicense,
    LicenseFilter,
};
use crate::sku::ProductSku;

/// Rancher licensing operations against AWS License Manager.
#[async_trait]
pub trait LicenseClient: Send + Sync {
    /// Account number of the AWS account this client issues calls to.
    fn account_number(&self) -> &str;

    /// The license held for the Rancher product, from whichever regional
    /// SKU the account was granted.
    async fn get_rancher_license(&self) -> AppResult<GrantedLicense>;

    /// Check out `entitlement_amount` units of `RKE_NODE_SUPP` from `license`.
    async fn checkout_rancher_license(
        &self,
        license: &GrantedLicense,
        entitlement_amount: i64,
    ) -> AppResult<CheckoutOutcome>;

    /// Check in the checkout identified by `consumption_token`.
    async fn check_in_rancher_license(&self, consumption_token: &str) -> AppResult<()>;

    /// Extend the expiry of `consumption_token`.
    async fn extend_rancher_license_consumption_token(
        &self,
        consumption_token: &str,
    ) -> AppResult<ExtendOutcome>;

    /// Number of `RKE_NODE_SUPP` entitlements still available on `license`.
    ///
    /// Advisory only; License Manager enforces the real cap and the value
    /// may be negative.
    async fn get_number_of_available_entitlements(
        &self,
        license: &GrantedLicense,
    ) -> AppResult<i64>;
}

/// [`LicenseClient`] over the License Manager and identity services.
///
/// The account number is resolved once at construction and never changes,
/// so one instance can be shared freely across tasks.
#[derive(Debug, Clone)]
pub struct AwsLicenseClient {
    /// Account number resolved at construction.
    account_number: String,
    /// License Manager backend.
    license_manager: Arc<dyn LicenseManagerApi>,
}

impl AwsLicenseClient {
    /// Load AWS configuration and build a client over the SDK.
    #[cfg(feature = "sdk")]
    pub async fn connect(settings: &csp_core::config::AwsSettings) -> AppResult<Self> {
        let sdk_config = crate::sdk::load_sdk_config(settings).await?;

        tracing::debug!(
            region = ?sdk_config.region(),
            "Loaded AWS config"
        );

        Self::with_services(
            Arc::new(crate::sdk::AwsLicenseManager::new(&sdk_config)),
            Arc::new(crate::sdk::AwsIdentity::new(&sdk_config)),
        )
        .await
    }

    /// Build a client over the given backends, resolving the account number.
    ///
    /// The identity backend is only used here.
    pub async fn with_services(
        license_manager: Arc<dyn LicenseManagerApi>,
        identity: Arc<dyn IdentityApi>,
    ) -> AppResult<Self> {
        let account_number = resolve_account_number(identity.as_ref()).await?;

        tracing::debug!(account_number = %account_number, "Resolved AWS account number");

        Ok(Self {
            account_number,
            license_manager,
        })
    }

    async fn get_license_for_sku(&self, sku: ProductSku) -> AppResult<GrantedLicense> {
        let filters = vec![LicenseFilter {
            name: PRODUCT_SKU_FIELD.to_string(),
            values: vec![sku.as_str().to_string()],
        }];

        let licenses = self
            .license_manager
            .list_received_licenses(filters, MAX_RESULTS)
            .await?;

        let mut license = licenses.into_iter().next().ok_or_else(|| {
            AppError::not_found(format!("unable to find license for product id {sku}"))
        })?;

        if license.product_sku.is_none() {
            license.product_sku = Some(sku.as_str().to_string());
        }

        Ok(license)
    }
}

#[async_trait]
impl LicenseClient for AwsLicenseClient {
    fn account_number(&self) -> &str {
        &self.account_number
    }

    async fn get_rancher_license(&self) -> AppResult<GrantedLicense> {
        let [primary, fallback] = ProductSku::SEARCH_ORDER;

        // Any failure falls through to the EMEA SKU, transport errors included.
        let primary_err = match self.get_license_for_sku(primary).await {
            Ok(license) => return Ok(license),
            Err(e) => e,
        };

        tracing::debug!(
            sku = %primary,
            error = %primary_err,
            "License lookup failed, retrying with {} SKU",
            fallback.label()
        );

        self.get_license_for_sku(fallback)
            .await
            .map_err(|fallback_err| {
                let kind = if primary_err.is_not_found() && fallback_err.is_not_found() {
                    ErrorKind::NotFound
                } else {
                    ErrorKind::ExternalService
                };
                AppError::new(
                    kind,
                    format!(
                        "unable to get license for {}: {}, unable to get license for {}: {}",
                        primary.label(),
                        primary_err.message,
                        fallback.label(),
                        fallback_err.message
                    ),
                )
            })
    }

    async fn checkout_rancher_license(
        &self,
        license: &GrantedLicense,
        entitlement_amount: i64,
    ) -> AppResult<CheckoutOutcome> {
        let Some(key_fingerprint) = license.key_fingerprint() else {
            return Err(match &license.license_arn {
                None => AppError::malformed_license(
                    "license is missing arn and KeyFingerprint/Issuer",
                ),
                Some(arn) => AppError::malformed_license(format!(
                    "license {arn} must have a KeyFingerprint for checkout"
                )),
            });
        };

        let request = CheckoutRequest {
            checkout_type: CHECKOUT_TYPE_PROVISIONAL.to_string(),
            client_token: Uuid::new_v4().to_string(),
            product_sku: license.product_sku.clone(),
            key_fingerprint: key_fingerprint.to_string(),
            entitlements: vec![EntitlementData {
                name: ENTITLEMENT_DIMENSION.to_string(),
                value: Some(entitlement_amount.to_string()),
                unit: ENTITLEMENT_UNIT.to_string(),
            }],
        };

        tracing::debug!(
            license_arn = ?license.license_arn,
            client_token = %request.client_token,
            amount = entitlement_amount,
            "Checking out {}",
            ENTITLEMENT_DIMENSION
        );

        self.license_manager.checkout_license(request).await
    }

    async fn check_in_rancher_license(&self, consumption_token: &str) -> AppResult<()> {
        self.license_manager
            .check_in_license(consumption_token)
            .await
    }

    async fn extend_rancher_license_consumption_token(
        &self,
        consumption_token: &str,
    ) -> AppResult<ExtendOutcome> {
        self.license_manager
            .extend_license_consumption(consumption_token)
            .await
    }

    async fn get_number_of_available_entitlements(
        &self,
        license: &GrantedLicense,
    ) -> AppResult<i64> {
        let usages = self
            .license_manager
            .get_license_usage(license.license_arn.as_deref())
            .await?;

        available_node_entitlements(license, &usages)
    }
}

/// Account number of the caller. The lookup needs no IAM permissions.
async fn resolve_account_number(identity: &dyn IdentityApi) -> AppResult<String> {
    let caller = identity.get_caller_identity().await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Identity,
            format!("unable to resolve account number: {}", e.message),
            e,
        )
    })?;

    match caller.account {
        Some(account) if !account.is_empty() => Ok(account),
        _ => Err(AppError::identity(
            "account number empty in aws sts response",
        )),
    }
}
