//! Merchandise catalog payload.
//!
//! The merch section is list-shaped: edits always replace the whole list.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Placeholder image used for items created in the editor.
const NEW_ITEM_IMAGE: &str = "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80";

/// A product in the merch storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Product image URI.
    pub image: String,
    pub description: String,
    /// Size labels in display order; `None` for one-size items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    pub in_stock: bool,
}

impl MerchItem {
    /// A fresh item as created by the editor's "add item" button.
    ///
    /// `created_at_millis` keeps the generated ID unique (`m1712345678901`).
    #[must_use]
    pub fn new_placeholder(created_at_millis: i64) -> Self {
        Self {
            id: ProductId::new(format!("m{created_at_millis}")),
            name: "New Item".to_owned(),
            price: Price::from_cents(2999),
            image: NEW_ITEM_IMAGE.to_owned(),
            description: "Description".to_owned(),
            sizes: Some(vec!["S".to_owned(), "M".to_owned(), "L".to_owned()]),
            in_stock: true,
        }
    }

    /// Whether the item is sold in sizes.
    #[must_use]
    pub fn has_sizes(&self) -> bool {
        self.sizes.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// The size preselected on the product card (the first listed).
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.as_ref()?.first().map(String::as_str)
    }
}

/// Parse the editor's comma-separated size field ("S, M, L").
///
/// Blank entries are dropped; an input with no sizes yields `None`.
#[must_use]
pub fn parse_sizes(input: &str) -> Option<Vec<String>> {
    let sizes: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    if sizes.is_empty() { None } else { Some(sizes) }
}

/// Find a product by ID.
#[must_use]
pub fn find_item<'a>(items: &'a [MerchItem], id: &ProductId) -> Option<&'a MerchItem> {
    items.iter().find(|item| &item.id == id)
}
