//! In-memory License Manager and identity backends for development and
//! testing.
//!
//! Simulates the subset of AWS behavior the client relies on without
//! credentials or network access, and records the requests it receives.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use csp_core::{AppError, AppResult};

use crate::api::{IdentityApi, LicenseManagerApi};
use crate::constants::PRODUCT_SKU_FIELD;
use crate::models::{
    CallerIdentity, CheckoutOutcome, CheckoutRequest, EntitlementUsage, ExtendOutcome,
    GrantedLicense, LicenseFilter,
};

/// Lifetime granted to mock consumption tokens on checkout and extension.
const TOKEN_TTL_MINUTES: i64 = 60;

/// A recorded `list_received_licenses` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    /// Filters passed.
    pub filters: Vec<LicenseFilter>,
    /// Page size passed.
    pub max_results: i32,
}

/// Mock License Manager holding licenses and usage in memory.
#[derive(Debug, Default)]
pub struct MockLicenseManager {
    /// Granted licenses keyed by product SKU.
    licenses: Mutex<HashMap<String, GrantedLicense>>,
    /// SKUs whose lookup fails with the given service message.
    failing_skus: Mutex<HashMap<String, String>>,
    /// Usage records keyed by license ARN.
    usages: Mutex<HashMap<String, Vec<EntitlementUsage>>>,
    /// Consumption tokens currently checked out.
    active_tokens: Mutex<HashSet<String>>,
    /// Every list call received.
    list_calls: Mutex<Vec<ListCall>>,
    /// Every checkout request received.
    checkouts: Mutex<Vec<CheckoutRequest>>,
}

impl MockLicenseManager {
    /// Create an empty mock with no licenses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `license` under `sku`. The license's own SKU field is left as given.
    pub fn grant_license(&self, sku: &str, license: GrantedLicense) {
        let mut licenses = self.licenses.lock().unwrap_or_else(|e| e.into_inner());
        licenses.insert(sku.to_string(), license);
    }

    /// Make lookups of `sku` fail as if the service returned `message`.
    pub fn fail_lookup(&self, sku: &str, message: &str) {
        let mut failing = self.failing_skus.lock().unwrap_or_else(|e| e.into_inner());
        failing.insert(sku.to_string(), message.to_string());
    }

    /// Set the usage records reported for `license_arn`.
    pub fn set_usage(&self, license_arn: &str, usages: Vec<EntitlementUsage>) {
        let mut all = self.usages.lock().unwrap_or_else(|e| e.into_inner());
        all.insert(license_arn.to_string(), usages);
    }

    /// List calls received so far.
    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Checkout requests received so far.
    pub fn checkout_requests(&self) -> Vec<CheckoutRequest> {
        self.checkouts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether `token` is currently checked out.
    pub fn is_token_active(&self, token: &str) -> bool {
        self.active_tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(token)
    }

    fn expiration() -> String {
        (Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES)).to_rfc3339()
    }
}

#[async_trait]
impl LicenseManagerApi for MockLicenseManager {
    async fn list_received_licenses(
        &self,
        filters: Vec<LicenseFilter>,
        max_results: i32,
    ) -> AppResult<Vec<GrantedLicense>> {
        self.list_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ListCall {
                filters: filters.clone(),
                max_results,
            });

        let skus: Vec<&String> = filters
            .iter()
            .filter(|f| f.name == PRODUCT_SKU_FIELD)
            .flat_map(|f| f.values.iter())
            .collect();

        {
            let failing = self.failing_skus.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(message) = skus.iter().find_map(|sku| failing.get(*sku)) {
                tracing::debug!("[MockLM] ListReceivedLicenses failing: {}", message);
                return Err(AppError::external_service(format!(
                    "ListReceivedLicenses failed: {message}"
                )));
            }
        }

        let licenses = self.licenses.lock().unwrap_or_else(|e| e.into_inner());
        let found: Vec<GrantedLicense> = skus
            .iter()
            .filter_map(|sku| licenses.get(*sku).cloned())
            .take(usize::try_from(max_results).unwrap_or(0))
            .collect();

        tracing::debug!("[MockLM] ListReceivedLicenses returned {}", found.len());
        Ok(found)
    }

    async fn checkout_license(&self, request: CheckoutRequest) -> AppResult<CheckoutOutcome> {
        self.checkouts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let license_arn = {
            let licenses = self.licenses.lock().unwrap_or_else(|e| e.into_inner());
            licenses
                .values()
                .find(|l| l.key_fingerprint() == Some(request.key_fingerprint.as_str()))
                .map(|l| l.license_arn.clone())
                .ok_or_else(|| {
                    AppError::external_service(format!(
                        "CheckoutLicense failed: no license issued by {}",
                        request.key_fingerprint
                    ))
                })?
        };

        let token = Uuid::new_v4().to_string();
        self.active_tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone());

        tracing::info!("[MockLM] Checked out token '{}'", token);

        Ok(CheckoutOutcome {
            checkout_type: Some(request.checkout_type),
            license_consumption_token: Some(token),
            entitlements_allowed: request.entitlements,
            node_id: None,
            signed_token: None,
            issued_at: Some(Utc::now().to_rfc3339()),
            expiration: Some(Self::expiration()),
            license_arn,
        })
    }

    async fn check_in_license(&self, consumption_token: &str) -> AppResult<()> {
        let mut active = self.active_tokens.lock().unwrap_or_else(|e| e.into_inner());
        if active.remove(consumption_token) {
            tracing::info!("[MockLM] Checked in token '{}'", consumption_token);
            Ok(())
        } else {
            Err(AppError::not_found(format!(
                "consumption token {consumption_token} not found"
            )))
        }
    }

    async fn extend_license_consumption(
        &self,
        consumption_token: &str,
    ) -> AppResult<ExtendOutcome> {
        if !self.is_token_active(consumption_token) {
            return Err(AppError::not_found(format!(
                "consumption token {consumption_token} not found"
            )));
        }

        Ok(ExtendOutcome {
            license_consumption_token: Some(consumption_token.to_string()),
            expiration: Some(Self::expiration()),
        })
    }

    async fn get_license_usage(
        &self,
        license_arn: Option<&str>,
    ) -> AppResult<Vec<EntitlementUsage>> {
        let arn = license_arn.ok_or_else(|| {
            AppError::external_service("GetLicenseUsage failed: LicenseArn is required")
        })?;

        let usages = self.usages.lock().unwrap_or_else(|e| e.into_inner());
        Ok(usages.get(arn).cloned().unwrap_or_default())
    }
}

/// Mock identity service returning a fixed response.
#[derive(Debug)]
pub struct MockIdentity {
    response: AppResult<CallerIdentity>,
}

impl MockIdentity {
    /// Identity for `account`.
    pub fn new(account: &str) -> Self {
        Self::with_identity(CallerIdentity {
            account: Some(account.to_string()),
            arn: Some(format!("arn:aws:iam::{account}:user/rancher")),
            user_id: Some("AIDAEXAMPLE".to_string()),
        })
    }

    /// Return `identity` verbatim.
    pub fn with_identity(identity: CallerIdentity) -> Self {
        Self {
            response: Ok(identity),
        }
    }

    /// Fail every lookup with an external service error.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(AppError::external_service(format!(
                "GetCallerIdentity failed: {message}"
            ))),
        }
    }
}

#[async_trait]
impl IdentityApi for MockIdentity {
    async fn get_caller_identity(&self) -> AppResult<CallerIdentity> {
        self.response.clone()
    }
}
