//! Session cart flow.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use wzzptom_integration_tests::{CHECKOUT_URL, TestApp};

#[tokio::test]
async fn test_empty_cart_recommends_kits() {
    let app = TestApp::new();
    let page = app.browser().get("/cart").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Your cart is empty."));
    assert!(page.body.contains("Recommended for You"));
}

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let added = browser.post_form("/cart/add", "product_id=autumn-v1").await;
    assert_eq!(added.status, StatusCode::SEE_OTHER);
    assert_eq!(added.location(), Some("/cart"));
    assert!(browser.has_session());

    browser.post_form("/cart/add", "product_id=autumn-v1").await;
    browser.post_form("/cart/add", "product_id=warmcode-v1").await;

    let cart = browser.get("/cart").await;
    assert!(cart.body.contains("Cart (3)"));
    // 2 × 49.99 + 47.00
    assert!(cart.body.contains("€146.98"));
    assert!(cart.body.contains("€99.98"));
    assert_eq!(cart.body.matches("name=\"product_id\" value=\"autumn-v1\"").count(), 1);
}

#[tokio::test]
async fn test_add_returns_to_product_page() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let added = browser
        .post_form(
            "/cart/add",
            "product_id=warmcode-v1&return_to=%2Fsound-kits%2Fwarmcode-v1",
        )
        .await;
    assert_eq!(added.location(), Some("/sound-kits/warmcode-v1"));

    let offsite = browser
        .post_form("/cart/add", "product_id=warmcode-v1&return_to=https%3A%2F%2Fevil.example")
        .await;
    assert_eq!(offsite.location(), Some("/cart"));
}

#[tokio::test]
async fn test_adding_unknown_product_is_404() {
    let app = TestApp::new();
    let page = app
        .browser()
        .post_form("/cart/add", "product_id=ghost-kit")
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = TestApp::new();
    let mut browser = app.browser();

    browser.post_form("/cart/add", "product_id=autumn-v1").await;
    browser.post_form("/cart/add", "product_id=warmcode-v1").await;

    // Unknown id is a no-op
    browser.post_form("/cart/remove", "product_id=ghost-kit").await;
    assert!(browser.get("/cart").await.body.contains("Cart (2)"));

    browser.post_form("/cart/remove", "product_id=autumn-v1").await;
    let cart = browser.get("/cart").await;
    assert!(cart.body.contains("Cart (1)"));
    assert!(cart.body.contains("€47.00"));

    browser.post_form("/cart/clear", "").await;
    let cart = browser.get("/cart").await;
    assert!(cart.body.contains("Cart (0)"));
    assert!(cart.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_drawer_opens_on_add_and_toggles() {
    let app = TestApp::new();
    let mut browser = app.browser();

    assert!(!browser.get("/").await.body.contains("cart-drawer"));

    browser.post_form("/cart/add", "product_id=autumn-v1").await;
    assert!(browser.get("/").await.body.contains("cart-drawer"));

    let toggled = browser.post_form("/cart/toggle", "").await;
    assert_eq!(toggled.location(), Some("/"));
    assert!(!browser.get("/").await.body.contains("cart-drawer"));
}

#[tokio::test]
async fn test_checkout_redirects() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let empty = browser.get("/checkout").await;
    assert_eq!(empty.location(), Some("/cart"));

    browser.post_form("/cart/add", "product_id=autumn-v1").await;
    let checkout = browser.get("/checkout").await;
    assert_eq!(checkout.status, StatusCode::SEE_OTHER);
    assert_eq!(checkout.location(), Some(CHECKOUT_URL));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let app = TestApp::new();
    let mut first = app.browser();
    let mut second = app.browser();

    first.post_form("/cart/add", "product_id=autumn-v1").await;

    assert!(first.get("/cart").await.body.contains("Cart (1)"));
    assert!(second.get("/cart").await.body.contains("Cart (0)"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_from_one_visitor_all_count() {
    let app = TestApp::new();
    let mut browser = app.browser();
    browser.post_form("/cart/add", "product_id=autumn-v1").await;

    let mut tabs = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let mut tab = browser.fork();
        tabs.spawn(async move { tab.post_form("/cart/add", "product_id=autumn-v1").await });
    }
    while let Some(page) = tabs.join_next().await {
        assert_eq!(page.unwrap().status, StatusCode::SEE_OTHER);
    }

    let cart = browser.get("/cart").await;
    assert!(cart.body.contains("Cart (11)"));
}
