//! Client for the product catalog REST service.

use std::future::Future;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::error::CatalogError;
use crate::models::{Availability, Product, DEFAULT_CURRENCY};

pub const DEFAULT_API_URL: &str = "https://dummyjson.com";
/// Store label for products whose record carries no brand.
pub const FALLBACK_STORE: &str = "Online Store";

/// Listing strategy for a page request. The variants are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryMode {
    #[default]
    None,
    Search(String),
    Category(String),
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "DealFinder/0.1".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Defaults, with the base URL taken from `DEALFINDER_API_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DEALFINDER_API_URL") {
            config.base_url = url;
        }
        config
    }
}

/// The catalog operations the rest of the crate depends on.
///
/// [`CatalogClient`] talks HTTP; tests drive controllers through canned
/// implementations.
pub trait Catalog: Send + Sync {
    /// Fetch one page of products for the given listing strategy.
    fn list_products(
        &self,
        mode: &QueryMode,
        limit: usize,
        skip: usize,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    fn get_product(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<String>, CatalogError>> + Send;
}

pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::InvalidRequest(format!("{}: {}", config.base_url, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(CatalogError::Transport)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the page URL for `mode`; search text goes into the query
    /// string, category names into a path segment.
    pub fn products_url(
        &self,
        mode: &QueryMode,
        limit: usize,
        skip: usize,
    ) -> Result<Url, CatalogError> {
        let mut url = match mode {
            QueryMode::None => self.endpoint(["products"])?,
            QueryMode::Search(text) => {
                let mut url = self.endpoint(["products", "search"])?;
                url.query_pairs_mut().append_pair("q", text);
                url
            }
            QueryMode::Category(name) => {
                self.endpoint(["products", "category", name.as_str()])?
            }
        };

        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());

        Ok(url)
    }

    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, CatalogError> {
        let segments: Vec<&str> = segments.into_iter().collect();
        // Dot segments would be collapsed away and hit a different resource.
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(CatalogError::InvalidRequest(format!(
                "path segment {:?} is not allowed",
                dot
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::InvalidRequest(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(%url, "catalog request");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Server(status.as_u16()));
        }

        let body = response.bytes().await.map_err(CatalogError::Transport)?;
        if body.is_empty() {
            return Err(CatalogError::EmptyResponse);
        }

        serde_json::from_slice(&body).map_err(CatalogError::Decode)
    }
}

impl Catalog for CatalogClient {
    #[instrument(skip(self))]
    async fn list_products(
        &self,
        mode: &QueryMode,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<Product>, CatalogError> {
        let url = self.products_url(mode, limit, skip)?;
        let page: ProductsResponse = self.get_json(url).await?;
        debug!(
            total = page.total,
            skip = page.skip,
            limit = page.limit,
            received = page.products.len(),
            "product page"
        );
        Ok(page.products.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        let url = self.endpoint(["products", id])?;
        let product: ApiProduct = self.get_json(url).await?;
        Ok(product.into())
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        let url = self.endpoint(["products", "categories"])?;
        let categories: Vec<ApiCategory> = self.get_json(url).await?;
        Ok(categories.into_iter().map(ApiCategory::into_slug).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<ApiProduct>,
    total: usize,
    skip: usize,
    limit: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProduct {
    id: u64,
    title: String,
    description: String,
    price: f64,
    discount_percentage: Option<f64>,
    rating: Option<f64>,
    stock: i64,
    brand: Option<String>,
    category: String,
    thumbnail: String,
    reviews: Option<Vec<IgnoredAny>>,
}

impl From<ApiProduct> for Product {
    fn from(api: ApiProduct) -> Self {
        // The service only reports a discount percentage, so the
        // pre-discount price has to be reconstructed from it.
        let original_price = api
            .discount_percentage
            .map(|percent| api.price * (1.0 + percent / 100.0));

        let availability = if api.stock > 0 {
            Availability::InStock
        } else {
            Availability::OutOfStock
        };

        let store = api
            .brand
            .clone()
            .unwrap_or_else(|| FALLBACK_STORE.to_string());

        Product {
            id: api.id.to_string(),
            title: api.title,
            description: api.description,
            price: api.price,
            original_price,
            currency: DEFAULT_CURRENCY.to_string(),
            image_url: api.thumbnail,
            category: api.category,
            brand: api.brand,
            rating: api.rating,
            review_count: api.reviews.map(|reviews| reviews.len() as u32),
            availability,
            store,
        }
    }
}

/// Older deployments return bare names, newer ones `{slug, name, url}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiCategory {
    Name(String),
    Entry { slug: String },
}

impl ApiCategory {
    fn into_slug(self) -> String {
        match self {
            ApiCategory::Name(name) => name,
            ApiCategory::Entry { slug } => slug,
        }
    }
}
