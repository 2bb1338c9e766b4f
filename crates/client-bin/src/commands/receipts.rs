//! Receipts commands.

use super::App;
use anyhow::Result;
use auth_gateway::GatewayError;

/// List the authenticated user's receipts.
pub async fn list(app: &App) -> Result<()> {
    let session = app.bootstrap().await?;
    if !super::require_authenticated(&session, "/receipts") {
        return Ok(());
    }

    match app.gateway.list_receipts().await {
        Ok(receipts) if receipts.is_empty() => println!("No receipts uploaded yet"),
        Ok(receipts) => {
            for receipt in receipts {
                let store = receipt.store_name.as_deref().unwrap_or("(unknown store)");
                let total = receipt
                    .total_amount
                    .map(|t| format!("{:.2}", t))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "#{:<6} {}  {:>10}  {}",
                    receipt.id,
                    receipt.upload_date.format("%Y-%m-%d"),
                    total,
                    store
                );
            }
        }
        Err(GatewayError::Unauthorized(_)) => {
            // The credential died mid-session; tear the session down the
            // same way an explicit logout would.
            app.controller.invalidate_session();
            println!("Session expired. Run `shopsense login` again.");
        }
        Err(e) => println!("Failed to list receipts: {}", e),
    }

    Ok(())
}
