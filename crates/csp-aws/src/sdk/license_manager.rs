//! License Manager SDK adapter.
//!
//! Translates between the local models and the SDK shapes. Optional SDK
//! fields map onto `Option` one-to-one; nothing is defaulted here.

use async_trait::async_trait;
use aws_sdk_licensemanager::types as lm;

use csp_core::{AppError, AppResult, ErrorKind};

use crate::api::LicenseManagerApi;
use crate::models::{
    CheckoutOutcome, CheckoutRequest, Entitlement, EntitlementData, EntitlementUsage,
    ExtendOutcome, GrantedLicense, IssuerDetails, LicenseFilter,
};

use super::service_error;

/// [`LicenseManagerApi`] over the License Manager SDK client.
#[derive(Debug, Clone)]
pub struct AwsLicenseManager {
    client: aws_sdk_licensemanager::Client,
}

impl AwsLicenseManager {
    /// Build from a shared SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::from_client(aws_sdk_licensemanager::Client::new(sdk_config))
    }

    /// Wrap an existing License Manager client.
    pub fn from_client(client: aws_sdk_licensemanager::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LicenseManagerApi for AwsLicenseManager {
    async fn list_received_licenses(
        &self,
        filters: Vec<LicenseFilter>,
        max_results: i32,
    ) -> AppResult<Vec<GrantedLicense>> {
        let filters = filters
            .into_iter()
            .map(|f| {
                lm::Filter::builder()
                    .name(f.name)
                    .set_values(Some(f.values))
                    .build()
            })
            .collect();

        let output = self
            .client
            .list_received_licenses()
            .set_filters(Some(filters))
            .max_results(max_results)
            .send()
            .await
            .map_err(|e| service_error("ListReceivedLicenses", e))?;

        Ok(output.licenses().iter().map(granted_license).collect())
    }

    async fn checkout_license(&self, request: CheckoutRequest) -> AppResult<CheckoutOutcome> {
        let entitlements = request
            .entitlements
            .into_iter()
            .map(entitlement_data_input)
            .collect::<AppResult<Vec<_>>>()?;

        let output = self
            .client
            .checkout_license()
            .checkout_type(checkout_type(&request.checkout_type))
            .client_token(request.client_token)
            .set_product_sku(request.product_sku)
            .key_fingerprint(request.key_fingerprint)
            .set_entitlements(Some(entitlements))
            .send()
            .await
            .map_err(|e| service_error("CheckoutLicense", e))?;

        Ok(CheckoutOutcome {
            checkout_type: output.checkout_type().map(|t| t.as_str().to_string()),
            license_consumption_token: output.license_consumption_token().map(str::to_owned),
            entitlements_allowed: output
                .entitlements_allowed()
                .iter()
                .map(entitlement_data)
                .collect(),
            node_id: output.node_id().map(str::to_owned),
            signed_token: output.signed_token().map(str::to_owned),
            issued_at: output.issued_at().map(str::to_owned),
            expiration: output.expiration().map(str::to_owned),
            license_arn: output.license_arn().map(str::to_owned),
        })
    }

    async fn check_in_license(&self, consumption_token: &str) -> AppResult<()> {
        self.client
            .check_in_license()
            .license_consumption_token(consumption_token)
            .send()
            .await
            .map_err(|e| service_error("CheckInLicense", e))?;
        Ok(())
    }

    async fn extend_license_consumption(
        &self,
        consumption_token: &str,
    ) -> AppResult<ExtendOutcome> {
        let output = self
            .client
            .extend_license_consumption()
            .license_consumption_token(consumption_token)
            .send()
            .await
            .map_err(|e| service_error("ExtendLicenseConsumption", e))?;

        Ok(ExtendOutcome {
            license_consumption_token: output.license_consumption_token().map(str::to_owned),
            expiration: output.expiration().map(str::to_owned),
        })
    }

    async fn get_license_usage(
        &self,
        license_arn: Option<&str>,
    ) -> AppResult<Vec<EntitlementUsage>> {
        let output = self
            .client
            .get_license_usage()
            .set_license_arn(license_arn.map(str::to_owned))
            .send()
            .await
            .map_err(|e| service_error("GetLicenseUsage", e))?;

        entitlement_usages(output.license_usage())
    }
}

fn granted_license(license: &lm::GrantedLicense) -> GrantedLicense {
    GrantedLicense {
        license_arn: license.license_arn().map(str::to_owned),
        license_name: license.license_name().map(str::to_owned),
        product_name: license.product_name().map(str::to_owned),
        product_sku: license.product_sku().map(str::to_owned),
        issuer: license.issuer().map(|issuer| IssuerDetails {
            name: issuer.name().map(str::to_owned),
            sign_key: issuer.sign_key().map(str::to_owned),
            key_fingerprint: issuer.key_fingerprint().map(str::to_owned),
        }),
        home_region: license.home_region().map(str::to_owned),
        status: license.status().map(|s| s.as_str().to_string()),
        beneficiary: license.beneficiary().map(str::to_owned),
        entitlements: license
            .entitlements()
            .iter()
            .map(|e| Entitlement {
                name: e.name().to_string(),
                value: e.value().map(str::to_owned),
                max_count: e.max_count(),
                overage: e.overage(),
                unit: e.unit().as_str().to_string(),
                allow_check_in: e.allow_check_in(),
            })
            .collect(),
    }
}

/// Map a checkout type onto the SDK enum, whose wire values are uppercase.
fn checkout_type(raw: &str) -> lm::CheckoutType {
    lm::CheckoutType::from(raw.to_ascii_uppercase().as_str())
}

fn entitlement_data_input(data: EntitlementData) -> AppResult<lm::EntitlementData> {
    lm::EntitlementData::builder()
        .name(data.name)
        .set_value(data.value)
        .unit(lm::EntitlementDataUnit::from(data.unit.as_str()))
        .build()
        .map_err(|err| {
            AppError::with_source(
                ErrorKind::MalformedLicense,
                format!("invalid checkout entitlement: {err}"),
                err,
            )
        })
}

/// A usage response without a `LicenseUsage` block is an error, not zero
/// consumption.
fn entitlement_usages(usage: Option<&lm::LicenseUsage>) -> AppResult<Vec<EntitlementUsage>> {
    let usage = usage.ok_or_else(|| {
        AppError::external_service("GetLicenseUsage returned no usage")
    })?;

    Ok(usage
        .entitlement_usages()
        .iter()
        .map(|u| EntitlementUsage {
            name: u.name().to_string(),
            consumed_value: u.consumed_value().to_string(),
            max_count: u.max_count().map(str::to_owned),
            unit: u.unit().as_str().to_string(),
        })
        .collect())
}

fn entitlement_data(data: &lm::EntitlementData) -> EntitlementData {
    EntitlementData {
        name: data.name().to_string(),
        value: data.value().map(str::to_owned),
        unit: data.unit().as_str().to_string(),
    }
}
