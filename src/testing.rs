//! Canned catalog and fixtures shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::catalog::{Catalog, QueryMode};
use crate::error::CatalogError;
use crate::models::{Availability, Product, DEFAULT_CURRENCY};

pub type PageResult = Result<Vec<Product>, CatalogError>;

pub fn product(id: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        title: format!("Product {}", id),
        description: format!("Description of {}", id),
        price,
        original_price: None,
        currency: DEFAULT_CURRENCY.to_string(),
        image_url: format!("https://cdn.example.com/{}.png", id),
        category: "smartphones".to_string(),
        brand: Some("Acme".to_string()),
        rating: Some(4.0),
        review_count: None,
        availability: Availability::InStock,
        store: "Acme".to_string(),
    }
}

/// `count` products with ids `<prefix>-0`, `<prefix>-1`, ...
pub fn page(prefix: &str, count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| product(&format!("{}-{}", prefix, i), 10.0 + i as f64))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub mode: QueryMode,
    pub limit: usize,
    pub skip: usize,
}

enum Reply {
    Ready(PageResult),
    Pending(oneshot::Receiver<PageResult>),
}

/// Catalog that answers page requests from a queue of scripted replies.
/// An exhausted queue answers with an empty page.
#[derive(Default)]
pub struct FakeCatalog {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<PageRequest>>,
    products: Mutex<HashMap<String, Product>>,
    product_requests: Mutex<Vec<String>>,
    categories: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, products: Vec<Product>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Ok(products)));
    }

    pub fn push_error(&self, error: CatalogError) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(error)));
    }

    /// Queues a reply that stays in flight until the returned sender fires.
    pub fn push_pending(&self) -> oneshot::Sender<PageResult> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Pending(rx));
        tx
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn add_product(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    pub fn product_requests(&self) -> Vec<String> {
        self.product_requests.lock().unwrap().clone()
    }

    pub fn set_categories(&self, categories: &[&str]) {
        *self.categories.lock().unwrap() = categories.iter().map(|c| c.to_string()).collect();
    }
}

impl Catalog for FakeCatalog {
    async fn list_products(&self, mode: &QueryMode, limit: usize, skip: usize) -> PageResult {
        self.requests.lock().unwrap().push(PageRequest {
            mode: mode.clone(),
            limit,
            skip,
        });
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Pending(rx)) => rx.await.unwrap_or(Err(CatalogError::EmptyResponse)),
            None => Ok(Vec::new()),
        }
    }

    async fn get_product(&self, id: &str) -> Result<Product, CatalogError> {
        self.product_requests.lock().unwrap().push(id.to_string());
        let found = self.products.lock().unwrap().get(id).cloned();
        found.ok_or(CatalogError::Server(404))
    }

    async fn list_categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.categories.lock().unwrap().clone())
    }
}
