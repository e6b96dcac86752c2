//! Catalog administration.
//!
//! Every endpoint here requires the admin role; the server rejects
//! non-admin tokens with 403, which surfaces as a plain API error.

use rust_decimal::Decimal;

use sweetshop_client::api::{NewSweet, SweetPatch};
use sweetshop_core::{Rupees, SweetId};

use super::{CliError, Context, require_session};

/// Add a new sweet to the catalog.
pub async fn add(
    ctx: &Context,
    name: String,
    category: String,
    price: Decimal,
    quantity: u32,
    img: String,
    description: Option<String>,
) -> Result<(), CliError> {
    require_session(ctx)?;

    let sweet = ctx
        .api
        .create_sweet(&NewSweet {
            name,
            category,
            price: Rupees::new(price),
            quantity,
            img,
            description,
        })
        .await?;

    println!(
        "Added {} (id {}) at {}/100g, {} in stock.",
        sweet.name, sweet.id, sweet.price, sweet.quantity
    );
    Ok(())
}

/// Update a sweet; only the fields given on the command line change.
#[allow(clippy::too_many_arguments)]
pub async fn update(
    ctx: &Context,
    sweet_id: i64,
    name: Option<String>,
    category: Option<String>,
    price: Option<Decimal>,
    quantity: Option<u32>,
    img: Option<String>,
    description: Option<String>,
) -> Result<(), CliError> {
    require_session(ctx)?;

    let patch = SweetPatch {
        name,
        category,
        price: price.map(Rupees::new),
        quantity,
        img,
        description,
    };
    let sweet = ctx.api.update_sweet(SweetId::new(sweet_id), &patch).await?;

    println!(
        "Updated {} (id {}): {}/100g, {} in stock.",
        sweet.name, sweet.id, sweet.price, sweet.quantity
    );
    Ok(())
}

/// Delete a sweet from the catalog.
pub async fn delete(ctx: &Context, sweet_id: i64) -> Result<(), CliError> {
    require_session(ctx)?;
    ctx.api.delete_sweet(SweetId::new(sweet_id)).await?;

    println!("Deleted sweet {sweet_id}.");
    Ok(())
}

/// Add stock to a sweet.
pub async fn restock(ctx: &Context, sweet_id: i64, quantity: u32) -> Result<(), CliError> {
    require_session(ctx)?;
    let receipt = ctx
        .api
        .restock_sweet(SweetId::new(sweet_id), quantity)
        .await?;

    println!(
        "Restocked {}: +{} units, {} now in stock.",
        receipt.sweet_name, receipt.quantity_added, receipt.new_stock
    );
    Ok(())
}

/// Show the restock history, newest first.
pub async fn restock_history(ctx: &Context) -> Result<(), CliError> {
    require_session(ctx)?;
    let history = ctx.api.restock_history().await?;

    if history.is_empty() {
        println!("No restock history found.");
        return Ok(());
    }

    for record in &history {
        println!(
            "{}  {:<24} +{}",
            record.restock_date.format("%Y-%m-%d %H:%M"),
            record.sweet_name,
            record.quantity_added
        );
    }
    Ok(())
}
