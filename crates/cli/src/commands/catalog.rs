//! Catalog browsing and searching.

use rust_decimal::Decimal;

use sweetshop_client::Catalog;
use sweetshop_client::api::CatalogFilter;
use sweetshop_core::Rupees;

use super::{CliError, Context, require_session};

/// Fetch and render the catalog listing, optionally filtered.
pub async fn browse(
    ctx: &Context,
    name: Option<String>,
    category: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
) -> Result<(), CliError> {
    require_session(ctx)?;

    let filter = CatalogFilter {
        name,
        category,
        min_price: min_price.map(Rupees::new),
        max_price: max_price.map(Rupees::new),
    };

    let mut catalog = Catalog::new();
    catalog.refresh(&ctx.api, &filter).await?;

    if catalog.is_empty() {
        println!("No sweets found matching your criteria.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<24} {:<12} {:>12}  {}",
        "ID", "NAME", "CATEGORY", "PRICE/100g", "STOCK"
    );
    for entry in catalog.entries() {
        let sweet = &entry.sweet;
        let stock = if sweet.in_stock() {
            format!("{} in stock", sweet.quantity)
        } else {
            "out of stock".to_string()
        };
        println!(
            "{:>4}  {:<24} {:<12} {:>12}  {}",
            sweet.id, sweet.name, sweet.category, sweet.price, stock
        );
    }
    Ok(())
}
