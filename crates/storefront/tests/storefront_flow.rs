//! End-to-end storefront flows.
//!
//! Exercises the stores together the way the application uses them:
//! catalog refresh against a live fixture backend, per-collection fallback
//! when one resource breaks, and the browse / register / order loop that
//! runs entirely against local persistence.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use teahouse_storefront::api::ApiClient;
use teahouse_storefront::auth::{AuthStore, Credentials, Registration};
use teahouse_storefront::cart::CartStore;
use teahouse_storefront::catalog::CatalogStore;
use teahouse_storefront::config::StorefrontConfig;
use teahouse_storefront::models::{OptionKind, OrderCustomer, OrderDraft};
use teahouse_storefront::storage::LocalStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn spawn_backend(toppings_broken: bool) -> SocketAddr {
    init_tracing();
    let toppings = if toppings_broken {
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") })
    } else {
        get(|| async {
            Json(json!([
                { "id": "t1", "name": "Black Pearl", "price": 7000 },
                { "id": "t9", "name": "Red Bean", "price": 8000 }
            ]))
        })
    };

    let app = Router::new()
        .route(
            "/products",
            get(|| async {
                Json(json!([{
                    "id": "101",
                    "slug": "oolong-milk-tea",
                    "name": "Oolong Milk Tea",
                    "description": "Roasted oolong with fresh milk.",
                    "price": 47000,
                    "image": "/images/products/oolong-milk-tea.jpg",
                    "featured": true
                }]))
            }),
        )
        .route("/toppings", toppings)
        .route("/options", get(options))
        .route(
            "/bannerImages",
            get(|| async {
                Json(json!([
                    { "id": "b1", "src": "/images/banners/api-banner.jpg" }
                ]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fixture");
    });
    addr
}

async fn options(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let kind = params.get("type").cloned().unwrap_or_default();
    Json(json!([
        { "id": format!("{kind}-x"), "type": kind, "name": "From API", "price": 0 }
    ]))
}

fn catalog_for(addr: SocketAddr) -> CatalogStore {
    let config = StorefrontConfig {
        api_base_url: format!("http://{addr}"),
        api_timeout: Duration::from_secs(5),
        ..StorefrontConfig::default()
    };
    CatalogStore::new(ApiClient::new(&config))
}

#[tokio::test]
async fn test_catalog_refreshes_from_api() {
    let addr = spawn_backend(false).await;
    let catalog = catalog_for(addr);

    assert!(catalog.check_api_health().await);
    tokio::join!(
        catalog.load_products(),
        catalog.load_toppings(),
        catalog.load_options(),
        catalog.load_banners(),
    );

    let products = catalog.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "oolong-milk-tea");

    let toppings = catalog.toppings();
    assert_eq!(toppings.len(), 2);

    let sizes = catalog.options(OptionKind::Size);
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes[0].name, "From API");

    assert_eq!(
        catalog.banner_images(),
        vec!["/images/banners/api-banner.jpg".to_string()]
    );
}

#[tokio::test]
async fn test_broken_collection_falls_back_alone() {
    let addr = spawn_backend(true).await;
    let catalog = catalog_for(addr);

    assert!(catalog.check_api_health().await);
    tokio::join!(catalog.load_products(), catalog.load_toppings());

    // products came from the API, toppings fell back to the bundled set
    assert_eq!(catalog.products().len(), 1);
    assert_eq!(catalog.products()[0].slug, "oolong-milk-tea");
    let toppings = catalog.toppings();
    assert!(toppings.iter().any(|t| t.name == "Black Pearl"));
    assert!(!toppings.iter().any(|t| t.name == "Red Bean"));
}

#[tokio::test]
async fn test_offline_catalog_serves_static_data() {
    let config = StorefrontConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        api_timeout: Duration::from_millis(200),
        ..StorefrontConfig::default()
    };
    let catalog = CatalogStore::new(ApiClient::new(&config));

    assert!(!catalog.check_api_health().await);
    let product = catalog.product_by_slug("thai-milk-tea").await;
    assert!(product.is_some());
    assert!(!catalog.search_products("milk").await.is_empty());
}

#[tokio::test]
async fn test_browse_register_order_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = LocalStore::new(dir.path()).expect("storage");
    let cart = CartStore::new(storage.clone());
    let auth = AuthStore::new(storage.clone(), Duration::ZERO);

    // browse the bundled catalog and fill the cart
    let config = StorefrontConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        api_timeout: Duration::from_millis(200),
        ..StorefrontConfig::default()
    };
    let catalog = CatalogStore::new(ApiClient::new(&config));
    let product = catalog
        .product_by_slug("thai-milk-tea")
        .await
        .expect("bundled product");
    cart.add_to_cart(&product, 2).expect("add to cart");

    // register, place the order, sign back in later
    auth.register(Registration {
        email: "an@example.com".to_string(),
        password: "secret1".to_string(),
        full_name: "Nguyễn Văn An".to_string(),
        phone: "0901234567".to_string(),
        address: "12 Hang Bai, Hanoi".to_string(),
    })
    .await
    .expect("register");

    let order = auth
        .add_order(OrderDraft {
            items: cart.lines(),
            total: cart.total_price(),
            customer: OrderCustomer {
                full_name: "Nguyễn Văn An".to_string(),
                phone: "0901234567".to_string(),
                email: "an@example.com".to_string(),
                address: "12 Hang Bai, Hanoi".to_string(),
            },
            payment_method: "cod".to_string(),
        })
        .expect("place order");
    cart.clear_cart();

    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.total, product.price.amount() * rust_decimal::dec!(2));
    assert_eq!(cart.total_items(), 0);

    auth.logout();
    let profile = auth
        .login(Credentials {
            email: "an@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .expect("login");
    assert_eq!(profile.email, "an@example.com");

    // the order survived the session and is attributed to the user
    let orders = auth.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);
    assert_eq!(orders[0].user_id, profile.id);
}

#[tokio::test]
async fn test_session_restores_across_store_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = LocalStore::new(dir.path()).expect("storage");

    let auth = AuthStore::new(storage.clone(), Duration::ZERO);
    auth.register(Registration {
        email: "binh@example.com".to_string(),
        password: "secret1".to_string(),
        full_name: "Trần Thị Bình".to_string(),
        phone: String::new(),
        address: String::new(),
    })
    .await
    .expect("register");

    // a fresh process over the same storage picks the session up
    let restored = AuthStore::new(storage, Duration::ZERO);
    restored.check_auth_status();
    assert!(restored.is_authenticated());
    assert_eq!(restored.display_name(), "Trần Thị Bình");
}
