//! Local license domain types.
//!
//! These mirror the subset of AWS License Manager shapes the adapter reads
//! or writes. Fields the service documents as optional stay `Option` and are
//! checked where they are used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ENTITLEMENT_DIMENSION;

/// A license granted to this account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantedLicense {
    /// License ARN.
    pub license_arn: Option<String>,
    /// License name.
    pub license_name: Option<String>,
    /// Product name.
    pub product_name: Option<String>,
    /// Product SKU.
    pub product_sku: Option<String>,
    /// Issuer of the license.
    pub issuer: Option<IssuerDetails>,
    /// Home region of the license.
    pub home_region: Option<String>,
    /// License status, e.g. `AVAILABLE`.
    pub status: Option<String>,
    /// Beneficiary of the license.
    pub beneficiary: Option<String>,
    /// Entitlement definitions.
    pub entitlements: Vec<Entitlement>,
}

impl GrantedLicense {
    /// The key fingerprint of the issuer, if both are present.
    pub fn key_fingerprint(&self) -> Option<&str> {
        self.issuer
            .as_ref()
            .and_then(|issuer| issuer.key_fingerprint.as_deref())
    }

    /// The node-count entitlement definition, if the license has one.
    pub fn node_entitlement(&self) -> Option<&Entitlement> {
        self.entitlements
            .iter()
            .find(|e| e.name == ENTITLEMENT_DIMENSION)
    }
}

/// Details about the issuer of a license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerDetails {
    /// Issuer name.
    pub name: Option<String>,
    /// ARN of the issuer's signing key.
    pub sign_key: Option<String>,
    /// Issuer key fingerprint. Required for checkout.
    pub key_fingerprint: Option<String>,
}

/// A countable dimension granted by a license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Entitlement name.
    pub name: String,
    /// Entitlement value, for non-countable entitlements.
    pub value: Option<String>,
    /// Maximum count.
    pub max_count: Option<i64>,
    /// Whether usage may exceed the maximum.
    pub overage: Option<bool>,
    /// Entitlement unit.
    pub unit: String,
    /// Whether checked-out units can be checked back in.
    pub allow_check_in: Option<bool>,
}

/// Usage reported for one entitlement of a license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementUsage {
    /// Entitlement name.
    pub name: String,
    /// Consumed amount, as the decimal string the service reports.
    pub consumed_value: String,
    /// Maximum amount, as reported alongside the usage.
    pub max_count: Option<String>,
    /// Entitlement unit.
    pub unit: String,
}

/// Entitlement amount requested in a checkout or granted by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementData {
    /// Entitlement name.
    pub name: String,
    /// Requested amount.
    pub value: Option<String>,
    /// Entitlement unit.
    pub unit: String,
}

/// Name/values filter for license listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFilter {
    /// Field name, e.g. `ProductSKU`.
    pub name: String,
    /// Accepted values.
    pub values: Vec<String>,
}

/// Parameters of a checkout call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Checkout type, e.g. `provisional`.
    pub checkout_type: String,
    /// Idempotency token.
    pub client_token: String,
    /// Product SKU of the license being checked out.
    pub product_sku: Option<String>,
    /// Issuer key fingerprint.
    pub key_fingerprint: String,
    /// Entitlements to check out.
    pub entitlements: Vec<EntitlementData>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    /// Checkout type.
    pub checkout_type: Option<String>,
    /// Token used to check in or extend this checkout.
    pub license_consumption_token: Option<String>,
    /// Entitlements granted by the checkout.
    pub entitlements_allowed: Vec<EntitlementData>,
    /// Node ID.
    pub node_id: Option<String>,
    /// Signed token.
    pub signed_token: Option<String>,
    /// Issue time, as reported.
    pub issued_at: Option<String>,
    /// Expiry time, as reported.
    pub expiration: Option<String>,
    /// License ARN.
    pub license_arn: Option<String>,
}

impl CheckoutOutcome {
    /// The expiration parsed as an RFC 3339 timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.expiration.as_deref())
    }
}

/// Result of extending a consumption token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendOutcome {
    /// The extended consumption token.
    pub license_consumption_token: Option<String>,
    /// New expiry time, as reported.
    pub expiration: Option<String>,
}

impl ExtendOutcome {
    /// The new expiration parsed as an RFC 3339 timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.expiration.as_deref())
    }
}

/// The identity behind the ambient credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Account number.
    pub account: Option<String>,
    /// Caller ARN.
    pub arn: Option<String>,
    /// Caller unique ID.
    pub user_id: Option<String>,
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}
