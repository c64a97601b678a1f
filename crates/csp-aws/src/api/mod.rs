//! Capability traits for the two remote services the client talks to.
//!
//! Each trait exposes only the calls the adapter makes, so tests and hosts
//! can substitute their own backends.

pub mod identity;
pub mod license_manager;

pub use identity::IdentityApi;
pub use license_manager::LicenseManagerApi;
