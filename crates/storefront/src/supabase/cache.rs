//! Cache value types for the data API client.

use super::types::Product;

/// Values stored in the product read cache.
///
/// Boxed single products keep the enum small; listings are cached as-is
/// since they are cloned out on every hit anyway.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// A single product, keyed by `product:{id}`.
    Product(Box<Product>),
    /// A product listing, keyed by the query's cache key.
    Products(Vec<Product>),
}
