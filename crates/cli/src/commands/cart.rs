//! Cart commands.
//!
//! The cart persists under the data directory between invocations.
//!
//! # Usage
//!
//! ```bash
//! stagefront cart add m1 --size M
//! stagefront cart list
//! stagefront cart update m1-M-1767225600000 3
//! stagefront cart remove m1-M-1767225600000
//! stagefront cart checkout
//! ```

use stagefront_core::{CartLineId, ProductId};
use stagefront_site::state::AppState;

use super::CommandError;

/// Print every line with its subtotal, then the totals.
#[allow(clippy::print_stdout)]
pub fn list(state: &AppState) {
    let cart = state.cart();
    let lines = cart.lines();
    if lines.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for line in &lines {
        let size = line.size.as_deref().unwrap_or("-");
        println!(
            "{id}  {name} ({size})  {qty} x {price} = {subtotal}",
            id = line.id,
            name = line.name,
            qty = line.quantity,
            price = line.price.display(),
            subtotal = line.subtotal().display(),
        );
    }
    println!("{} items, total {}", cart.item_count(), cart.total().display());
}

/// Add a product from the current merch catalog.
///
/// # Errors
///
/// Returns an error if the catalog has no such product.
#[allow(clippy::print_stdout)]
pub fn add(state: &AppState, product_id: &str, size: Option<&str>) -> Result<(), CommandError> {
    let id = state.add_to_cart(&ProductId::new(product_id), size)?;
    println!("{id}");
    Ok(())
}

pub fn update(state: &AppState, line_id: &str, quantity: i64) {
    state
        .cart()
        .update_quantity(&CartLineId::new(line_id), quantity);
    list(state);
}

pub fn remove(state: &AppState, line_id: &str) {
    state.cart().remove_item(&CartLineId::new(line_id));
    list(state);
}

/// Simulated checkout: no payment is taken.
#[allow(clippy::print_stdout)]
pub fn checkout(state: &AppState) {
    let cart = state.cart();
    if cart.lines().is_empty() {
        println!("Your cart is empty");
        return;
    }
    let total = cart.total();
    cart.checkout();
    if cart.is_checkout_complete() {
        println!("Order placed, total {}. Thank you!", total.display());
        cart.close_checkout_confirmation();
    }
}
