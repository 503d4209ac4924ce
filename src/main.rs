use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dealfinder::catalog::Catalog;
use dealfinder::feed::DEFAULT_PAGE_SIZE;
use dealfinder::settings::{reset_app, SettingsStore};
use dealfinder::storage::DataDir;
use dealfinder::wishlist::Wishlist;
use dealfinder::{
    CatalogClient, CatalogConfig, FeedController, PriceComparator, Product, ProductCache,
};

#[derive(Parser)]
#[command(name = "dealfinder")]
#[command(about = "Browse catalog deals, compare store prices and keep a wishlist", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered by search text or category
    Browse {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, conflicts_with = "search")]
        category: Option<String>,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    Categories,
    /// Show a product with simulated prices from other stores
    Show {
        #[arg(short, long)]
        id: String,
        /// Seed for reproducible price comparisons
        #[arg(long)]
        seed: Option<u64>,
    },
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    Settings,
    /// Restore default settings and clear the wishlist
    Reset,
}

#[derive(Subcommand)]
enum WishlistAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let data_dir = DataDir::new()?;

    match cli.command {
        Commands::Browse {
            search,
            category,
            pages,
            page_size,
        } => {
            let catalog = Arc::new(CatalogClient::new(CatalogConfig::from_env())?);
            let feed =
                FeedController::with_page_size(catalog, Arc::new(ProductCache::new()), page_size);

            if let Some(text) = search {
                feed.set_search(text).await;
            } else if category.is_some() {
                feed.set_category(category).await;
            } else {
                feed.refresh().await;
            }

            for _ in 1..pages {
                let state = feed.snapshot();
                if !state.has_more || state.error.is_some() {
                    break;
                }
                feed.load_more().await;
            }

            let state = feed.snapshot();
            let wishlist = Wishlist::load(&data_dir);
            for product in &state.products {
                print_product_line(product, wishlist.contains(&product.id));
            }

            if let Some(message) = state.error_message() {
                return Err(anyhow!("Failed to load products: {}", message));
            }

            println!(
                "{} products{}",
                state.products.len(),
                if state.has_more { " (more available)" } else { "" }
            );
        }
        Commands::Categories => {
            let catalog = CatalogClient::new(CatalogConfig::from_env())?;
            let categories = catalog
                .list_categories()
                .await
                .context("Failed to load categories")?;

            println!("Found {} categories:", categories.len());
            for category in categories {
                println!("  - {}", category);
            }
        }
        Commands::Show { id, seed } => {
            let catalog = CatalogClient::new(CatalogConfig::from_env())?;
            let cache = ProductCache::new();
            let product = cache
                .get_or_fetch(&catalog, &id)
                .await
                .with_context(|| format!("Failed to fetch product {}", id))?;

            let wishlist = Wishlist::load(&data_dir);
            print_product_detail(&product, wishlist.contains(&product.id));

            let mut comparator = match seed {
                Some(seed) => PriceComparator::seeded(seed),
                None => PriceComparator::new(),
            };

            println!();
            println!("Compare prices:");
            for (i, offer) in comparator.compare(&product).iter().enumerate() {
                println!(
                    "  {:<10} {:>14}  {:<12} {:<8} {}{}",
                    offer.store,
                    offer.formatted_price(),
                    offer.availability,
                    offer.delivery_time.as_deref().unwrap_or("-"),
                    offer.url,
                    if i == 0 { "  ★ Best price" } else { "" }
                );
            }
        }
        Commands::Wishlist { action } => {
            let mut wishlist = Wishlist::load(&data_dir);
            match action {
                WishlistAction::List => {
                    if wishlist.is_empty() {
                        println!("Wishlist is empty");
                        return Ok(());
                    }
                    let catalog = CatalogClient::new(CatalogConfig::from_env())?;
                    let products = ProductCache::new()
                        .load_products(&catalog, wishlist.ids())
                        .await;
                    for product in &products {
                        print_product_line(product, true);
                    }
                    println!("{} of {} wishlisted products loaded", products.len(), wishlist.len());
                }
                WishlistAction::Add { id } => {
                    wishlist.add(&id);
                    println!("Added {}", id);
                }
                WishlistAction::Remove { id } => {
                    wishlist.remove(&id);
                    println!("Removed {}", id);
                }
                WishlistAction::Toggle { id } => {
                    if wishlist.toggle(&id) {
                        println!("Added {}", id);
                    } else {
                        println!("Removed {}", id);
                    }
                }
            }
        }
        Commands::Settings => {
            let store = SettingsStore::load(&data_dir);
            println!("{}", serde_json::to_string_pretty(store.settings())?);
        }
        Commands::Reset => {
            let mut settings = SettingsStore::load(&data_dir);
            let mut wishlist = Wishlist::load(&data_dir);
            reset_app(&mut settings, &mut wishlist);
            println!("Settings and wishlist reset");
        }
    }

    Ok(())
}

fn print_product_line(product: &Product, wishlisted: bool) {
    let discount = product
        .discount()
        .map(|d| format!(" -{}%", d))
        .unwrap_or_default();
    println!(
        "{} [{:>4}] {} ({}){}  {}",
        if wishlisted { "♥" } else { " " },
        product.id,
        product.title,
        product.formatted_price(),
        discount,
        product.availability
    );
}

fn print_product_detail(product: &Product, wishlisted: bool) {
    println!("{}{}", product.title, if wishlisted { "  ♥" } else { "" });
    if let Some(brand) = &product.brand {
        println!("Brand:    {}", brand);
    }
    match (product.formatted_original_price(), product.discount()) {
        (Some(original), Some(discount)) => println!(
            "Price:    {} (was {}, -{}%)",
            product.formatted_price(),
            original,
            discount
        ),
        _ => println!("Price:    {}", product.formatted_price()),
    }
    if let Some(rating) = product.rating {
        match product.review_count {
            Some(count) => println!("Rating:   {:.1}/5 ({} reviews)", rating, count),
            None => println!("Rating:   {:.1}/5", rating),
        }
    }
    println!("Category: {}", product.category);
    println!("Store:    {} ({})", product.store, product.availability);
    println!("Image:    {}", product.image_url);
    println!();
    println!("{}", product.description);
}
