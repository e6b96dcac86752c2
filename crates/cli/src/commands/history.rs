//! Purchase history.

use super::{CliError, Context, require_session};

/// List the authenticated user's past purchases, newest first.
pub async fn purchases(ctx: &Context) -> Result<(), CliError> {
    require_session(ctx)?;
    let history = ctx.api.purchase_history().await?;

    if history.is_empty() {
        println!("No purchase history found.");
        return Ok(());
    }

    for record in &history {
        println!(
            "{}  {:<24} x{:<3} {}",
            record.purchase_date.format("%Y-%m-%d %H:%M"),
            record.sweet_name,
            record.quantity,
            record.total_price
        );
    }
    Ok(())
}
