//! Cart scenarios against a full site state.

#![allow(clippy::unwrap_used)]

use stagefront_core::{Price, ProductId};
use stagefront_integration_tests::TestSite;
use stagefront_site::storage::{CART_KEY, LocalStorage};

#[tokio::test]
async fn test_shopping_then_checkout() {
    let site = TestSite::new();
    let state = site.start().await;
    let cart = state.cart();

    let line = state.add_to_cart(&ProductId::new("m1"), Some("M")).unwrap();
    assert!(cart.is_open());
    assert_eq!(cart.item_count(), 1);
    assert_eq!(cart.total(), Price::from_cents(2999));

    state.add_to_cart(&ProductId::new("m1"), Some("M")).unwrap();
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total(), Price::from_cents(5998));

    cart.update_quantity(&line, 1);
    assert_eq!(cart.total(), Price::from_cents(2999));

    cart.checkout();
    assert!(cart.lines().is_empty());
    assert!(cart.is_checkout_complete());
    assert!(!cart.is_open());

    cart.close_checkout_confirmation();
    assert!(!cart.is_checkout_complete());
}

#[tokio::test]
async fn test_sizes_make_separate_lines() {
    let site = TestSite::new();
    let state = site.start().await;

    state.add_to_cart(&ProductId::new("m2"), Some("S")).unwrap();
    state.add_to_cart(&ProductId::new("m2"), Some("L")).unwrap();
    state.add_to_cart(&ProductId::new("m3"), None).unwrap();

    let cart = state.cart();
    assert_eq!(cart.lines().len(), 3);
    assert_eq!(cart.total(), Price::from_cents(4999 + 4999 + 2499));
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let site = TestSite::new();
    let line = {
        let state = site.start().await;
        state.add_to_cart(&ProductId::new("m4"), None).unwrap()
    };

    let state = site.start().await;
    let lines = state.cart().lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, line);
    assert_eq!(lines[0].name, "Unity Tour Poster");
    // Open/closed is session-only.
    assert!(!state.cart().is_open());
}

#[tokio::test]
async fn test_persisted_cart_uses_wire_format() {
    let site = TestSite::new();
    let state = site.start().await;
    state.add_to_cart(&ProductId::new("m1"), Some("XL")).unwrap();

    let raw = site.storage().get(CART_KEY).unwrap().unwrap();
    let lines: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let line = &lines[0];
    assert_eq!(line["merchId"], "m1");
    assert_eq!(line["size"], "XL");
    assert_eq!(line["quantity"], 1);
    assert_eq!(line["price"], serde_json::json!(29.99));
}

#[tokio::test]
async fn test_corrupt_cart_starts_empty() {
    let site = TestSite::new();
    site.storage().set(CART_KEY, "{not json").unwrap();

    let state = site.start().await;
    assert!(state.cart().lines().is_empty());

    // The next change overwrites the bad blob.
    state.add_to_cart(&ProductId::new("m3"), None).unwrap();
    let restarted = site.start().await;
    assert_eq!(restarted.cart().item_count(), 1);
}
