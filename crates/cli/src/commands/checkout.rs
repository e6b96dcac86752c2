//! Checkout: submit the cart as sequential purchases.

use sweetshop_client::{CheckoutOrchestrator, OrderSummary};

use super::{CliError, Context, require_session};

/// Quote the cart, then submit one purchase per line in order.
///
/// A mid-sequence failure keeps the cart (and its durable copy) intact;
/// already-recorded purchases stand. Only full success clears both.
pub async fn run(ctx: &Context) -> Result<(), CliError> {
    require_session(ctx)?;
    let mut cart = ctx.store.load_cart()?;

    let summary = OrderSummary::quote(&cart);
    if !cart.is_empty() {
        println!("Placing order:");
        println!("  subtotal: {}", summary.subtotal);
        if summary.free_delivery() {
            println!("  delivery: FREE");
        } else {
            println!("  delivery: {}", summary.delivery_fee);
        }
        println!("  GST (5%): {}", summary.gst);
        println!("  total:    {}", summary.total);
        println!();
    }

    let mut orchestrator = CheckoutOrchestrator::new();
    let receipts = orchestrator.submit(&ctx.api, &mut cart, &ctx.store).await?;

    for receipt in &receipts {
        println!(
            "Purchased {} x{} for {} ({} left in stock)",
            receipt.sweet_name,
            receipt.quantity_purchased,
            receipt.total_price,
            receipt.remaining_stock
        );
    }
    println!();
    println!("Payment complete. Amount charged: {}", summary.total);
    Ok(())
}
