//! Regional Rancher product SKUs.

use serde::{Deserialize, Serialize};

/// Regional variant of the Rancher marketplace product.
///
/// The SKU a customer holds cannot be known in advance, so lookups walk
/// [`ProductSku::SEARCH_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductSku {
    /// Listing for all regions outside EMEA.
    NonEmea,
    /// Listing for Europe, Middle East and Africa.
    Emea,
}

impl ProductSku {
    /// Lookup order for [`get_rancher_license`](crate::LicenseClient::get_rancher_license).
    pub const SEARCH_ORDER: [ProductSku; 2] = [ProductSku::NonEmea, ProductSku::Emea];

    /// The product SKU UUID as registered with AWS License Manager.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonEmea => "0b87d4fa-d1fe-41d8-830b-67d4ec381549",
            Self::Emea => "a303097d-1dc2-4548-8ea6-f46bb9842e21",
        }
    }

    /// Short region label used in log and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NonEmea => "non-emea",
            Self::Emea => "emea",
        }
    }
}

impl std::fmt::Display for ProductSku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
