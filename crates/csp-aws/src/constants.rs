//! Fixed protocol values shared with AWS License Manager.

/// Entitlement dimension for supported RKE nodes.
pub const ENTITLEMENT_DIMENSION: &str = "RKE_NODE_SUPP";

/// Unit string for the node-count entitlement.
pub const ENTITLEMENT_UNIT: &str = "Count";

/// Checkout type used for every node checkout.
pub const CHECKOUT_TYPE_PROVISIONAL: &str = "provisional";

/// Filter field name used to look up received licenses.
pub const PRODUCT_SKU_FIELD: &str = "ProductSKU";

/// Page size cap for license lookups. At most one license exists per SKU.
pub const MAX_RESULTS: i32 = 1;
