pub mod cache;
pub mod catalog;
pub mod compare;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod models;
pub mod settings;
pub mod storage;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::ProductCache;
pub use catalog::{Catalog, CatalogClient, CatalogConfig, QueryMode};
pub use compare::PriceComparator;
pub use error::CatalogError;
pub use feed::{FeedController, FeedPhase, FeedState};
pub use models::{Availability, PriceComparison, Product};
