//! The shopping cart aggregate.
//!
//! Pure state: no storage, no clock. The site crate's cart engine wraps a
//! [`Cart`] with persistence and observers, and supplies the timestamp used
//! to mint line IDs.

use serde::{Deserialize, Serialize};

use crate::content::MerchItem;
use crate::types::{CartLineId, Price, ProductId};

/// Size label used in line IDs for items sold without sizes.
const DEFAULT_SIZE_LABEL: &str = "default";

/// One product/size pairing in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    /// The product this line was created from. Not validated against the
    /// catalog once the line exists.
    #[serde(rename = "merchId")]
    pub product_id: ProductId,
    pub name: String,
    /// Unit price captured when the line was created.
    pub price: Price,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Price multiplied by quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }

    fn matches(&self, product_id: &ProductId, size: Option<&str>) -> bool {
        &self.product_id == product_id && self.size.as_deref() == size
    }
}

/// Ordered cart lines, at most one per (product, size) pairing.
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from stored lines.
    ///
    /// Lines with a zero quantity are dropped and duplicate pairings are
    /// folded into the first occurrence, so a hand-edited blob cannot break
    /// the one-line-per-pairing rule.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0) {
            if let Some(existing) = cart
                .lines
                .iter_mut()
                .find(|l| l.matches(&line.product_id, line.size.as_deref()))
            {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                cart.lines.push(line);
            }
        }
        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    #[must_use]
    pub fn get(&self, id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Add one unit of `product` in `size`.
    ///
    /// An existing line for the same pairing gets its quantity bumped;
    /// otherwise a new line is appended with an ID built from the product,
    /// the size and `now_millis`. Returns the affected line's ID.
    pub fn add(&mut self, product: &MerchItem, size: Option<&str>, now_millis: i64) -> CartLineId {
        if let Some(line) = self.lines.iter_mut().find(|l| l.matches(&product.id, size)) {
            line.quantity = line.quantity.saturating_add(1);
            return line.id.clone();
        }

        let id = self.mint_id(&product.id, size, now_millis);
        self.lines.push(CartLine {
            id: id.clone(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            size: size.map(str::to_owned),
            quantity: 1,
        });
        id
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// Quantities are stored as `u32`; anything above `u32::MAX` is stored
    /// as `u32::MAX`. Every representable quantity is set exactly.
    ///
    /// Returns `false` if no line has that ID.
    pub fn update_quantity(&mut self, id: &CartLineId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|line| &line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if no line has that ID.
    pub fn remove(&mut self, id: &CartLineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn mint_id(&self, product_id: &ProductId, size: Option<&str>, now_millis: i64) -> CartLineId {
        let base = format!(
            "{product_id}-{}-{now_millis}",
            size.unwrap_or(DEFAULT_SIZE_LABEL)
        );
        let taken = |candidate: &str| self.lines.iter().any(|l| l.id.as_str() == candidate);

        if !taken(&base) {
            return CartLineId::new(base);
        }
        let mut suffix = 1u32;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !taken(&candidate) {
                return CartLineId::new(candidate);
            }
            suffix += 1;
        }
    }
}
