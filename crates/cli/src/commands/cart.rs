//! Cart commands.
//!
//! The browser kept the cart in memory between clicks; a CLI process
//! does not survive between commands, so every mutation is written back
//! to the durable store the checkout boundary already uses.

use sweetshop_client::{Cart, OrderSummary};
use sweetshop_core::{SweetId, Weight};

use super::{CliError, Context, require_session};

/// Render the cart and its order summary.
pub fn show(ctx: &Context) -> Result<(), CliError> {
    require_session(ctx)?;
    let cart = ctx.store.load_cart()?;
    print_cart(&cart);
    Ok(())
}

/// Add a product to the cart, capturing its current price.
pub async fn add(ctx: &Context, sweet_id: i64, weight_grams: u32) -> Result<(), CliError> {
    require_session(ctx)?;

    let weight = Weight::new(weight_grams)?;
    let sweet = ctx.api.get_sweet(SweetId::new(sweet_id)).await?;
    if !sweet.in_stock() {
        return Err(CliError::OutOfStock(sweet.name));
    }

    let mut cart = ctx.store.load_cart()?;
    cart.add_line(&sweet, weight);
    ctx.store.save_cart(&cart)?;

    println!("{} ({weight}) added to cart.", sweet.name);
    print_cart(&cart);
    Ok(())
}

/// Grow a line by one 50g step.
pub fn grow(ctx: &Context, index: usize) -> Result<(), CliError> {
    require_session(ctx)?;
    let mut cart = ctx.store.load_cart()?;
    let weight = cart.increase_weight(index)?;
    ctx.store.save_cart(&cart)?;

    println!("Line {index} is now {weight}.");
    Ok(())
}

/// Shrink a line by one 50g step (no-op at the 100g floor).
pub fn shrink(ctx: &Context, index: usize) -> Result<(), CliError> {
    require_session(ctx)?;
    let mut cart = ctx.store.load_cart()?;
    let weight = cart.decrease_weight(index)?;
    ctx.store.save_cart(&cart)?;

    println!("Line {index} is now {weight}.");
    Ok(())
}

/// Remove a line from the cart.
pub fn remove(ctx: &Context, index: usize) -> Result<(), CliError> {
    require_session(ctx)?;
    let mut cart = ctx.store.load_cart()?;
    let removed = cart.remove_line(index)?;
    ctx.store.save_cart(&cart)?;

    println!("Removed {} from cart.", removed.name);
    print_cart(&cart);
    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for (index, line) in cart.lines().iter().enumerate() {
        println!(
            "{index:>3}. {:<24} {:>6} x {}/100g = {}",
            line.name,
            line.weight,
            line.price,
            line.line_total()
        );
    }

    let summary = OrderSummary::quote(cart);
    println!();
    println!("  subtotal: {}", summary.subtotal);
    if summary.free_delivery() {
        println!("  delivery: FREE");
    } else {
        println!("  delivery: {}", summary.delivery_fee);
    }
    println!("  GST (5%): {}", summary.gst);
    println!("  total:    {}", summary.total);
}
