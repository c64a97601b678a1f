//! License manager service capability.

use async_trait::async_trait;

use csp_core::AppResult;

use crate::models::{
    CheckoutOutcome, CheckoutRequest, EntitlementUsage, ExtendOutcome, GrantedLicense,
    LicenseFilter,
};

/// The License Manager calls used by the adapter.
///
/// Implementations forward errors from the service unchanged as
/// `ExternalService` errors and perform no retries of their own.
#[async_trait]
pub trait LicenseManagerApi: std::fmt::Debug + Send + Sync + 'static {
    /// List licenses granted to this account that match every filter,
    /// returning at most `max_results` of them.
    async fn list_received_licenses(
        &self,
        filters: Vec<LicenseFilter>,
        max_results: i32,
    ) -> AppResult<Vec<GrantedLicense>>;

    /// Check out entitlements.
    async fn checkout_license(&self, request: CheckoutRequest) -> AppResult<CheckoutOutcome>;

    /// Check in the entitlements held by a consumption token.
    async fn check_in_license(&self, consumption_token: &str) -> AppResult<()>;

    /// Extend the expiry of a consumption token.
    async fn extend_license_consumption(&self, consumption_token: &str)
    -> AppResult<ExtendOutcome>;

    /// Usage records for every entitlement of a license. The ARN is passed
    /// through as given; an absent ARN is left for the service to reject.
    async fn get_license_usage(&self, license_arn: Option<&str>)
    -> AppResult<Vec<EntitlementUsage>>;
}
