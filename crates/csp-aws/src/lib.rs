//! AWS License Manager integration for Rancher node licensing.
//!
//! [`AwsLicenseClient`] looks up the Rancher license granted to the caller's
//! account, checks node entitlements out and in, extends consumption tokens,
//! and reports how many node entitlements remain. The remote services sit
//! behind the [`api`] traits: the `sdk` feature provides AWS SDK backends and
//! the `mock` feature an in-memory pair for development and testing.

pub mod api;
pub mod client;
pub mod constants;
pub mod entitlements;
#[cfg(feature = "mock")]
pub mod mock;
pub mod models;
#[cfg(feature = "sdk")]
pub mod sdk;
pub mod sku;

pub use client::{AwsLicenseClient, LicenseClient};
pub use models::{CheckoutOutcome, ExtendOutcome, GrantedLicense};
pub use sku::ProductSku;
