//! Data catalog store.
//!
//! Holds the product/topping/option/banner collections. On initialization
//! the bundled static catalog is loaded synchronously so the first render
//! never waits on the network; a background task then probes the API and,
//! only when it is healthy, replaces each collection with API-sourced data.
//! Each collection falls back to its static data independently - a failure
//! loading toppings never disturbs the products.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{BannerImage, OptionItem, OptionKind, Product, Topping};
use crate::validation::sanitize_input;

/// The bundled fallback catalog, embedded at compile time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaticCatalog {
    products: Vec<Product>,
    toppings: Vec<Topping>,
    options: Vec<OptionItem>,
    banner_images: Vec<BannerImage>,
}

static STATIC_CATALOG: LazyLock<StaticCatalog> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    // Embedded asset; shape is covered by tests, so a failure here is a build defect.
    serde_json::from_str(include_str!("../data/catalog.json"))
        .expect("bundled catalog.json must parse")
});

/// Store of catalog collections with static fallback.
///
/// Cheaply cloneable; clones share the same collections.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    api: ApiClient,
    api_available: AtomicBool,
    products: RwLock<Vec<Product>>,
    toppings: RwLock<Vec<Topping>>,
    size_options: RwLock<Vec<OptionItem>>,
    ice_options: RwLock<Vec<OptionItem>>,
    sugar_options: RwLock<Vec<OptionItem>>,
    banner_images: RwLock<Vec<String>>,
}

impl CatalogStore {
    /// Create an empty catalog store backed by `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                api,
                api_available: AtomicBool::new(false),
                products: RwLock::new(Vec::new()),
                toppings: RwLock::new(Vec::new()),
                size_options: RwLock::new(Vec::new()),
                ice_options: RwLock::new(Vec::new()),
                sugar_options: RwLock::new(Vec::new()),
                banner_images: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Whether the last health probe reported the API reachable.
    #[must_use]
    pub fn is_api_available(&self) -> bool {
        self.inner.api_available.load(Ordering::Relaxed)
    }

    /// Probe the API and record the result.
    pub async fn check_api_health(&self) -> bool {
        let available = self.inner.api.check_health().await;
        self.inner.api_available.store(available, Ordering::Relaxed);
        available
    }

    /// Populate every collection from the bundled static catalog.
    fn load_static(&self) {
        let fallback = &*STATIC_CATALOG;
        *write_lock(&self.inner.products) = fallback.products.clone();
        *write_lock(&self.inner.toppings) = fallback.toppings.clone();
        *write_lock(&self.inner.size_options) = static_options(OptionKind::Size);
        *write_lock(&self.inner.ice_options) = static_options(OptionKind::Ice);
        *write_lock(&self.inner.sugar_options) = static_options(OptionKind::Sugar);
        *write_lock(&self.inner.banner_images) =
            fallback.banner_images.iter().map(|b| b.src.clone()).collect();
        debug!(
            products = fallback.products.len(),
            banners = fallback.banner_images.len(),
            "static catalog loaded"
        );
    }

    /// Initialize the catalog.
    ///
    /// Static data is loaded synchronously; a background task then probes
    /// the API and re-fetches the collections when it is healthy. The
    /// caller never observes the probe - later reads simply see whichever
    /// collections are authoritative.
    pub fn initialize_data(&self) {
        self.load_static();

        let store = self.clone();
        tokio::spawn(async move {
            if store.check_api_health().await {
                info!("api reachable, refreshing catalog");
                tokio::join!(
                    store.load_products(),
                    store.load_toppings(),
                    store.load_options(),
                    store.load_banners(),
                );
            } else {
                debug!("api unreachable, static catalog retained");
            }
        });
    }

    /// Load products from the API when available, else static data.
    pub async fn load_products(&self) {
        let loaded = if self.is_api_available() {
            match self.inner.api.products().await {
                Ok(products) => Some(products),
                Err(e) => {
                    warn!(error = %e, "product load failed, using static data");
                    None
                }
            }
        } else {
            None
        };
        *write_lock(&self.inner.products) =
            loaded.unwrap_or_else(|| STATIC_CATALOG.products.clone());
    }

    /// Load toppings from the API when available, else static data.
    pub async fn load_toppings(&self) {
        let loaded = if self.is_api_available() {
            match self.inner.api.toppings().await {
                Ok(toppings) => Some(toppings),
                Err(e) => {
                    warn!(error = %e, "topping load failed, using static data");
                    None
                }
            }
        } else {
            None
        };
        *write_lock(&self.inner.toppings) =
            loaded.unwrap_or_else(|| STATIC_CATALOG.toppings.clone());
    }

    /// Load size/ice/sugar options from the API when available, else static
    /// data. The three kinds are fetched concurrently but fall back as one.
    pub async fn load_options(&self) {
        if self.is_api_available() {
            let (size, ice, sugar) = tokio::join!(
                self.inner.api.options_by_kind(OptionKind::Size),
                self.inner.api.options_by_kind(OptionKind::Ice),
                self.inner.api.options_by_kind(OptionKind::Sugar),
            );
            match (size, ice, sugar) {
                (Ok(size), Ok(ice), Ok(sugar)) => {
                    *write_lock(&self.inner.size_options) = size;
                    *write_lock(&self.inner.ice_options) = ice;
                    *write_lock(&self.inner.sugar_options) = sugar;
                    return;
                }
                _ => warn!("option load failed, using static data"),
            }
        }
        *write_lock(&self.inner.size_options) = static_options(OptionKind::Size);
        *write_lock(&self.inner.ice_options) = static_options(OptionKind::Ice);
        *write_lock(&self.inner.sugar_options) = static_options(OptionKind::Sugar);
    }

    /// Load banner image URLs from the API when available, else static data.
    pub async fn load_banners(&self) {
        let loaded = if self.is_api_available() {
            match self.inner.api.banner_images().await {
                Ok(banners) => Some(banners.into_iter().map(|b| b.src).collect()),
                Err(e) => {
                    warn!(error = %e, "banner load failed, using static data");
                    None
                }
            }
        } else {
            None
        };
        *write_lock(&self.inner.banner_images) = loaded.unwrap_or_else(|| {
            STATIC_CATALOG
                .banner_images
                .iter()
                .map(|b| b.src.clone())
                .collect()
        });
    }

    /// Find a product by its URL slug, lazily loading when empty.
    pub async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.ensure_products().await;
        read_lock(&self.inner.products)
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
    }

    /// The featured subset of the product collection.
    pub async fn featured_products(&self) -> Vec<Product> {
        self.ensure_products().await;
        read_lock(&self.inner.products)
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over product names and
    /// descriptions. Queries shorter than 2 characters after sanitization
    /// return nothing.
    pub async fn search_products(&self, query: &str) -> Vec<Product> {
        self.ensure_products().await;

        let sanitized = sanitize_input(query);
        if sanitized.chars().count() < 2 {
            return Vec::new();
        }

        let needle = sanitized.to_lowercase();
        read_lock(&self.inner.products)
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Current product collection.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        read_lock(&self.inner.products).clone()
    }

    /// Current topping collection.
    #[must_use]
    pub fn toppings(&self) -> Vec<Topping> {
        read_lock(&self.inner.toppings).clone()
    }

    /// Current options for one customization axis.
    #[must_use]
    pub fn options(&self, kind: OptionKind) -> Vec<OptionItem> {
        let lock = match kind {
            OptionKind::Size => &self.inner.size_options,
            OptionKind::Ice => &self.inner.ice_options,
            OptionKind::Sugar => &self.inner.sugar_options,
        };
        read_lock(lock).clone()
    }

    /// Current banner image URLs.
    #[must_use]
    pub fn banner_images(&self) -> Vec<String> {
        read_lock(&self.inner.banner_images).clone()
    }

    async fn ensure_products(&self) {
        let empty = read_lock(&self.inner.products).is_empty();
        if empty {
            self.load_products().await;
        }
    }
}

// Lock poisoning cannot happen: no writer panics while holding these locks.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn static_options(kind: OptionKind) -> Vec<OptionItem> {
    STATIC_CATALOG
        .options
        .iter()
        .filter(|o| o.kind == kind)
        .cloned()
        .collect()
}
