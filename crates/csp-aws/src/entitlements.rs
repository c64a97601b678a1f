//! Node entitlement arithmetic.
//!
//! The result is advisory: License Manager enforces the cap, so a stale or
//! negative count is passed to the caller as-is.

use csp_core::{AppError, AppResult, ErrorKind};

use crate::constants::ENTITLEMENT_DIMENSION;
use crate::models::{EntitlementUsage, GrantedLicense};

/// Maximum node entitlements granted by `license`.
pub fn max_node_entitlements(license: &GrantedLicense) -> AppResult<i64> {
    let arn = license.license_arn.as_deref().unwrap_or("<unknown>");

    let entitlement = license.node_entitlement().ok_or_else(|| {
        AppError::malformed_license(format!(
            "entitlement {ENTITLEMENT_DIMENSION} not found on license for {arn}"
        ))
    })?;

    entitlement.max_count.ok_or_else(|| {
        AppError::malformed_license(format!(
            "entitlement {ENTITLEMENT_DIMENSION} on license {arn} has no max count"
        ))
    })
}

/// Total node entitlements consumed across every matching usage record.
pub fn consumed_node_entitlements(usages: &[EntitlementUsage]) -> AppResult<i64> {
    let mut total: i64 = 0;
    for usage in usages.iter().filter(|u| u.name == ENTITLEMENT_DIMENSION) {
        let consumed: i64 = usage.consumed_value.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Parse,
                format!(
                    "consumed value '{}' for {ENTITLEMENT_DIMENSION} is not an integer",
                    usage.consumed_value
                ),
                e,
            )
        })?;
        total = total.checked_add(consumed).ok_or_else(|| {
            AppError::parse(format!("consumed {ENTITLEMENT_DIMENSION} total overflows"))
        })?;
    }
    Ok(total)
}

/// `max - consumed` for the node dimension.
pub fn available_node_entitlements(
    license: &GrantedLicense,
    usages: &[EntitlementUsage],
) -> AppResult<i64> {
    let max = max_node_entitlements(license)?;
    let consumed = consumed_node_entitlements(usages)?;
    max.checked_sub(consumed).ok_or_else(|| {
        AppError::parse(format!("available {ENTITLEMENT_DIMENSION} count overflows"))
    })
}
